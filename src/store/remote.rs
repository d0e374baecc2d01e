// src/store/remote.rs
//
// Remote durable tier. Consulted first on load when configured; written
// after the local cache on save.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::Result;
use crate::listing::Listing;

/// The single document the remote tier holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    #[serde(default, alias = "companies")]
    pub listings: Vec<Listing>,
    #[serde(default, rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl RemoteDocument {
    /// Document stamped with the current UTC time.
    pub fn now(listings: Vec<Listing>) -> Self {
        let last_updated = OffsetDateTime::now_utc().format(&Rfc3339).ok();
        Self { listings, last_updated }
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    async fn fetch(&self) -> Result<Option<RemoteDocument>>;

    /// Replace the stored document.
    async fn store(&self, doc: &RemoteDocument) -> Result<()>;

    /// Short name for logs.
    fn describe(&self) -> String { s!("remote") }
}

/// In-process remote, mostly for tests and offline runs.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    doc: Mutex<Option<RemoteDocument>>,
}

impl MemoryRemote {
    pub fn new() -> Self { Self::default() }

    pub fn seeded(listings: Vec<Listing>) -> Self {
        Self { doc: Mutex::new(Some(RemoteDocument::now(listings))) }
    }

    /// Current stored document, if any.
    pub fn document(&self) -> Option<RemoteDocument> {
        self.doc.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch(&self) -> Result<Option<RemoteDocument>> {
        Ok(self.document())
    }

    async fn store(&self, doc: &RemoteDocument) -> Result<()> {
        *self.doc.lock().unwrap_or_else(|p| p.into_inner()) = Some(doc.clone());
        Ok(())
    }

    fn describe(&self) -> String { s!("memory") }
}
