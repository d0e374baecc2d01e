// src/cli.rs
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};
use tracing::{info, warn};

use crate::auth::AdminGate;
use crate::config::consts::*;
use crate::config::options::{AdminOptions, AppOptions, StoreOptions};
use crate::directory::ListingView;
use crate::enrich::{Enricher, EnrichmentPatch};
use crate::file::export_listings;
use crate::listing::{Listing, FIELD_NAMES};
use crate::parse::sample_csv;
use crate::router::path_for;
use crate::session::Session;
use crate::store::Gateway;

#[derive(Debug, Parser)]
#[command(name = "bizdir", version, about = "Business listing directory: CSV ingest, slug links, layered storage")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Local cache directory
    #[arg(long, global = true, env = ENV_STORE_DIR, default_value = STORE_DIR)]
    pub store_dir: PathBuf,

    /// Remote document URL; unset keeps everything local
    #[arg(long, global = true, env = ENV_REMOTE_URL)]
    pub remote_url: Option<String>,

    #[arg(long, global = true, env = ENV_REMOTE_TOKEN, hide_env_values = true)]
    pub remote_token: Option<String>,

    /// Remote request timeout in seconds
    #[arg(long, global = true, default_value_t = REMOTE_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Admin secret for mutating commands
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Log to stderr only
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print or write a one-row example CSV
    Sample {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that open the stored directory.
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Merge a CSV file into the directory (admin)
    Ingest { file: PathBuf },
    /// Search listings, one page at a time
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value = "")]
        location: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = PAGE_SIZE)]
        per_page: usize,
    },
    /// Most recently added listings
    Newest {
        #[arg(short = 'n', long, default_value_t = NEWEST_COUNT)]
        count: usize,
    },
    /// States present in the directory
    Locations,
    /// Resolve a path like `/ace-gutters-austin-tx` and show what it points to
    Show { path: String },
    /// Link path for every listing
    Links,
    /// Admin table, optionally filtered by name, city or state (admin)
    Admin {
        #[arg(short, long, default_value = "")]
        filter: String,
    },
    /// Set fields on one listing: `edit comp-1 name="Ace Gutters" rating=4.5` (admin)
    Edit {
        id: String,
        #[arg(required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Merge a JSON patch (`description`, `services`) into a listing (admin)
    Enrich {
        id: String,
        #[arg(long)]
        patch: PathBuf,
    },
    /// Remove listings by id (admin)
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Empty the directory in every tier (admin)
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Write the directory as CSV
    Export { out: PathBuf },
}

impl StoreCommand {
    fn needs_admin(&self) -> bool {
        matches!(
            self,
            StoreCommand::Ingest { .. }
                | StoreCommand::Admin { .. }
                | StoreCommand::Edit { .. }
                | StoreCommand::Enrich { .. }
                | StoreCommand::Remove { .. }
                | StoreCommand::Reset { .. }
        )
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in `{s}`"));
    }
    Ok((s!(key), s!(value)))
}

impl GlobalArgs {
    fn options(&self) -> AppOptions {
        AppOptions {
            store: StoreOptions {
                store_dir: self.store_dir.clone(),
                remote_url: self.remote_url.clone().filter(|u| !u.trim().is_empty()),
                remote_token: self.remote_token.clone().filter(|t| !t.trim().is_empty()),
                remote_timeout_secs: self.timeout,
            },
            admin: AdminOptions::from_env(),
        }
    }
}

/// Patch read from a JSON file on disk.
struct PatchFile(PathBuf);

#[async_trait]
impl Enricher for PatchFile {
    async fn enrich(&self, _listing: &Listing) -> crate::Result<EnrichmentPatch> {
        let text = tokio::fs::read_to_string(&self.0).await?;
        Ok(EnrichmentPatch::from_text(&text))
    }
}

pub async fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    let opts = cli.global.options();

    let log_file = (!cli.global.no_log_file).then(|| opts.store.log_path());
    crate::log::init(log_file.as_deref());

    match cli.command {
        // Needs no stored state.
        Command::Sample { out } => write_sample(out.as_deref()),
        Command::Store(cmd) => {
            if cmd.needs_admin() {
                AdminGate::from_options(&opts.admin).authorize(cli.global.secret.as_deref())?;
            }
            run_store(cmd, &opts).await
        }
    }
}

async fn run_store(cmd: StoreCommand, opts: &AppOptions) -> color_eyre::Result<()> {
    let gateway = Gateway::from_options(&opts.store)?;
    let mut session = Session::open(gateway).await;
    info!(source = ?session.source(), count = session.directory().len(), "directory opened");

    match cmd {
        StoreCommand::Ingest { file } => {
            let text = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("reading {}", file.display()))?;
            let outcome = session.ingest(&text).await;
            println!("{}", outcome.report.message());
            if outcome.saved == Some(false) {
                warn!("remote save failed; changes are kept locally only");
            }
        }

        StoreCommand::List { search, location, page, per_page } => {
            let dir = session.directory();
            let view = dir.search(&search, &location);
            print_page(&view, page, per_page);
        }

        StoreCommand::Newest { count } => {
            for l in session.directory().newest(count) {
                print_row(l);
            }
        }

        StoreCommand::Locations => {
            for state in session.directory().locations() {
                println!("{state}");
            }
        }

        StoreCommand::Show { path } => {
            let (canonical, pending) = session.navigate(&path);
            if canonical.trim_start_matches('/') != path.trim_start_matches('/') {
                println!("-> {canonical}");
            }
            match session.directory().selected() {
                Some(listing) => {
                    print_profile(listing);
                    let related = session.directory().related(listing, RELATED_COUNT);
                    if !related.is_empty() {
                        println!("\nRelated:");
                        for r in related {
                            println!("  {}  {}", path_for(r), r.display_location());
                        }
                    }
                }
                None => println!("[{}] {} listings", session.directory().view(), session.directory().len()),
            }
            if let Some(handle) = pending {
                // Let the view-state write land before the runtime shuts down.
                let _ = handle.await;
            }
        }

        StoreCommand::Links => {
            for l in session.directory().listings() {
                println!("{}\t{}", path_for(l), l.name);
            }
        }

        StoreCommand::Admin { filter } => {
            let view = session.directory().admin_filter(&filter);
            for l in view.iter() {
                println!("{}\t{}\t{}\t{}", l.id, l.name, l.city, l.state);
            }
            println!("{} of {}", view.len(), session.directory().len());
        }

        StoreCommand::Edit { id, fields } => {
            let mut listing = session
                .directory()
                .get(&id)
                .cloned()
                .ok_or_else(|| eyre!("no listing with id {id}"))?;
            for (key, value) in &fields {
                if !FIELD_NAMES.contains(&key.as_str()) {
                    warn!(field = %key, "not a listing field; stored as an extra column");
                }
                if !listing.set_field(key, value) {
                    bail!("field `{key}` cannot be edited");
                }
            }
            let saved = session.replace(listing).await?;
            report_saved("Updated", &id, saved);
        }

        StoreCommand::Enrich { id, patch } => {
            match session.enrich(&id, &PatchFile(patch)).await? {
                Some(saved) => report_saved("Enriched", &id, saved),
                None => println!("Nothing to apply for {id}"),
            }
        }

        StoreCommand::Remove { ids } => {
            let (removed, saved) = session.remove(&ids).await;
            println!("Removed {removed} of {} listings", ids.len());
            if !saved {
                warn!("remote save failed; changes are kept locally only");
            }
        }

        StoreCommand::Reset { yes } => {
            if !yes {
                bail!("reset deletes every listing; pass --yes to confirm");
            }
            let cleared = session.reset().await;
            report_saved("Cleared", "directory", cleared);
        }

        StoreCommand::Export { out } => {
            let path = export_listings(&out, session.directory().listings())
                .wrap_err_with(|| format!("exporting to {}", out.display()))?;
            println!("Exported {} listings to {}", session.directory().len(), path.display());
        }
    }

    Ok(())
}

fn write_sample(out: Option<&std::path::Path>) -> color_eyre::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, sample_csv())
                .wrap_err_with(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", sample_csv()),
    }
    Ok(())
}

fn report_saved(verb: &str, what: &str, saved: bool) {
    println!("{verb} {what}");
    if !saved {
        warn!("remote save failed; changes are kept locally only");
    }
}

fn print_row(l: &Listing) {
    let rating = l.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| s!("-"));
    println!("{:<40} {:<30} {:>4}  {}", l.name, l.display_location(), rating, path_for(l));
}

fn print_page(view: &ListingView<'_>, page: usize, per_page: usize) {
    let pages = view.page_count(per_page);
    for l in view.page(page, per_page) {
        print_row(l);
    }
    println!("Page {page} of {pages} ({} results)", view.len());
}

fn print_profile(l: &Listing) {
    println!("{}", l.name);
    println!("  {}", l.display_location());
    for (label, value) in [
        ("Phone", &l.phone),
        ("Email", &l.email),
        ("Website", &l.website),
    ] {
        if !value.trim().is_empty() {
            println!("  {label}: {value}");
        }
    }
    if let Some(r) = l.rating {
        println!("  Rating: {r:.1}");
    }
    println!("  Services: {}", l.services.join(", "));
    if let Some(d) = &l.description {
        println!("\n{d}");
    }
}
