// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::consts::ENV_LOG;
use crate::file::ensure_directory;

/// Install the global subscriber: stderr, plus an append-only log file when
/// `log_file` is given and can be opened. Level comes from `BIZDIR_LOG`
/// (default `info`). Lines carry time since start, like `00:00:01.234`.
pub fn init(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime())
        .with_target(false);

    let file_layer = log_file.and_then(open_append).map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_timer(fmt::time::uptime())
            .with_ansi(false)
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

fn open_append(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
