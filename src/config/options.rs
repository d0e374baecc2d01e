// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppOptions {
    pub store: StoreOptions,
    pub admin: AdminOptions,
}

/// Where the two persistence tiers live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Local fallback cache directory.
    pub store_dir: PathBuf,
    /// Remote document URL. `None` leaves the remote tier unconfigured.
    pub remote_url: Option<String>,
    /// Bearer token sent to the remote tier, if any.
    pub remote_token: Option<String>,
    pub remote_timeout_secs: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(STORE_DIR),
            remote_url: None,
            remote_token: None,
            remote_timeout_secs: REMOTE_TIMEOUT_SECS,
        }
    }
}

impl StoreOptions {
    /// Defaults overridden by `BIZDIR_*` environment variables.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(dir) = env_nonempty(ENV_STORE_DIR) {
            opts.store_dir = PathBuf::from(dir);
        }
        opts.remote_url = env_nonempty(ENV_REMOTE_URL);
        opts.remote_token = env_nonempty(ENV_REMOTE_TOKEN);
        opts
    }

    pub fn remote_configured(&self) -> bool {
        self.remote_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    pub fn log_path(&self) -> PathBuf {
        self.store_dir.join(LOG_FILE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AdminOptions {
    /// Shared secret for mutating commands. `None` locks them entirely.
    pub secret: Option<String>,
}

impl AdminOptions {
    pub fn from_env() -> Self {
        Self { secret: env_nonempty(ENV_ADMIN_SECRET) }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
