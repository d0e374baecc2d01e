// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;

pub mod auth;
pub mod csv;
pub mod dedup;
pub mod directory;
pub mod enrich;
pub mod file;
pub mod listing;
pub mod parse;
pub mod router;
pub mod session;
pub mod slug;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod log;

pub use directory::{Directory, IngestReport, ListingView};
pub use error::{Error, Result};
pub use listing::{Listing, ViewState};
pub use session::Session;
pub use store::{Gateway, Source};
