// src/config/consts.rs

// Local cache
pub const STORE_DIR: &str = ".store";
pub const LISTINGS_FILE: &str = "listings.json";
pub const VIEW_FILE: &str = "view";
pub const SELECTED_ID_FILE: &str = "selected_id";
pub const LOG_FILE: &str = "debug.log";

// Remote
pub const REMOTE_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("bizdir/", env!("CARGO_PKG_VERSION"));

// Parsing
pub const ID_PREFIX: &str = "comp-";
pub const PLACEHOLDER_NAME_PREFIX: &str = "Entity";
/// Prefix for extra columns whose header is also a typed field's wire name.
pub const EXTRA_CLASH_PREFIX: &str = "csv:";
pub const DEFAULT_SERVICES: &[&str] = &["Gutter Installation", "Gutter Repair", "Cleaning"];

// Identity
pub const SIGNATURE_SEP: char = '|';

// Routing
pub const DIRECTORY_SEGMENT: &str = "directory";

// Views
pub const PAGE_SIZE: usize = 12;
pub const NEWEST_COUNT: usize = 12;
pub const RELATED_COUNT: usize = 3;
pub const RELATED_MIN_RATING: f64 = 4.0;

// Env
pub const ENV_STORE_DIR: &str = "BIZDIR_STORE_DIR";
pub const ENV_REMOTE_URL: &str = "BIZDIR_REMOTE_URL";
pub const ENV_REMOTE_TOKEN: &str = "BIZDIR_REMOTE_TOKEN";
pub const ENV_ADMIN_SECRET: &str = "BIZDIR_ADMIN_SECRET";
pub const ENV_LOG: &str = "BIZDIR_LOG";
