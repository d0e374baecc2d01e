// src/store/mod.rs
//! # Persistence gateway
//!
//! Two tiers plus a built-in fallback:
//!
//! ```text
//! load:  remote (if configured) ─empty/error→ local cache ─empty→ builtin
//! save:  local cache (best-effort, never blocks) → remote (result = bool)
//! clear: local keys removed; remote overwritten with an empty collection
//! ```
//!
//! View state (screen + selected id) is local-only; it is not expected to
//! follow the collection across machines.
//!
//! Only the local tier gives read-after-write. A save against the remote
//! tier may still be in flight when the next load runs.

pub mod defaults;
pub mod http;
pub mod local;
pub mod remote;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::options::StoreOptions;
use crate::error::Result;
use crate::listing::{Listing, ViewState};

pub use defaults::builtin_listings;
pub use http::HttpRemote;
pub use local::{FileCache, LocalCache, MemoryCache};
pub use remote::{MemoryRemote, RemoteDocument, RemoteStore};

/// Everything the gateway persists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub listings: Vec<Listing>,
    pub view: ViewState,
    pub selected_id: Option<String>,
}

/// Which tier the collection came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Remote,
    Local,
    Builtin,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedState {
    pub snapshot: Snapshot,
    pub source: Source,
}

#[derive(Clone)]
pub struct Gateway {
    local: Arc<dyn LocalCache>,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl Gateway {
    /// Local tier only.
    pub fn new(local: impl LocalCache + 'static) -> Self {
        Self { local: Arc::new(local), remote: None }
    }

    pub fn with_remote(mut self, remote: impl RemoteStore + 'static) -> Self {
        self.remote = Some(Arc::new(remote));
        self
    }

    /// Shared handle variant, for callers that keep their own reference.
    pub fn with_remote_arc(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// File cache under `store_dir`, plus an HTTP remote when a url is set.
    pub fn from_options(opts: &StoreOptions) -> Result<Self> {
        let gw = Self::new(FileCache::new(&opts.store_dir));
        Ok(match HttpRemote::from_options(opts)? {
            Some(remote) => gw.with_remote(remote),
            None => gw,
        })
    }

    pub fn has_remote(&self) -> bool { self.remote.is_some() }

    /// Persist a snapshot.
    ///
    /// The local write always happens first and its failure is only logged.
    /// Returns the remote outcome; `true` when no remote is configured.
    pub async fn save(&self, snap: &Snapshot) -> bool {
        self.save_local(snap);

        let Some(remote) = &self.remote else { return true };
        match remote.store(&RemoteDocument::now(snap.listings.clone())).await {
            Ok(()) => {
                info!(count = snap.listings.len(), remote = %remote.describe(), "saved to remote");
                true
            }
            Err(e) => {
                error!(remote = %remote.describe(), "remote save failed: {e}");
                false
            }
        }
    }

    fn save_local(&self, snap: &Snapshot) {
        if let Err(e) = self.local.write_listings(&snap.listings) {
            warn!("local cache write failed, continuing: {e}");
        }
        if let Err(e) = self.local.write_view(snap.view) {
            warn!("local view write failed: {e}");
        }
        if let Err(e) = self.local.write_selected(snap.selected_id.as_deref()) {
            warn!("local selection write failed: {e}");
        }
    }

    /// Load the collection by tier precedence, and the view state from local.
    /// Never fails: remote and local errors are logged and fall through.
    pub async fn load(&self) -> LoadedState {
        let (mut listings, source) = match self.load_remote().await {
            Some(l) => (l, Source::Remote),
            None => match self.load_local() {
                Some(l) => (l, Source::Local),
                None => (builtin_listings(), Source::Builtin),
            },
        };
        listings.iter_mut().for_each(Listing::normalize);
        debug!(?source, count = listings.len(), "collection loaded");

        let view = self.local.read_view().unwrap_or_else(|e| {
            warn!("local view read failed: {e}");
            None
        });
        let selected_id = self.local.read_selected().unwrap_or_else(|e| {
            warn!("local selection read failed: {e}");
            None
        });

        LoadedState {
            snapshot: Snapshot {
                // Collection is never empty here, so default to the directory.
                view: view.unwrap_or(ViewState::Directory),
                listings,
                selected_id,
            },
            source,
        }
    }

    async fn load_remote(&self) -> Option<Vec<Listing>> {
        let remote = self.remote.as_ref()?;
        match remote.fetch().await {
            Ok(Some(doc)) if !doc.listings.is_empty() => Some(doc.listings),
            Ok(_) => {
                debug!(remote = %remote.describe(), "remote empty, falling back to local");
                None
            }
            Err(e) => {
                error!(remote = %remote.describe(), "remote load failed, falling back to local: {e}");
                None
            }
        }
    }

    fn load_local(&self) -> Option<Vec<Listing>> {
        match self.local.read_listings() {
            Ok(Some(l)) if !l.is_empty() => Some(l),
            Ok(_) => None,
            Err(e) => {
                warn!("local load failed: {e}");
                None
            }
        }
    }

    /// Empty both tiers. The remote is overwritten with an empty collection,
    /// not deleted, so a later load cannot pick up a stale document.
    /// Returns the remote outcome; `true` when no remote is configured.
    pub async fn clear(&self) -> bool {
        if let Err(e) = self.local.clear() {
            warn!("local clear failed: {e}");
        }
        let Some(remote) = &self.remote else { return true };
        match remote.store(&RemoteDocument::now(Vec::new())).await {
            Ok(()) => true,
            Err(e) => {
                error!(remote = %remote.describe(), "remote clear failed: {e}");
                false
            }
        }
    }
}
