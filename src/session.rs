// src/session.rs
//
// Orchestration: one Directory (the in-memory truth) bound to one Gateway.
//
// Persistence policy per call site:
// - must await `persist`: ingest, remove, replace, enrich, reset. The caller
//   reports the remote outcome.
// - fire-and-forget (`persist_detached`): navigation. Losing a view-state
//   write costs nothing but the restored screen.
//
// Every mutator takes `&mut self`, so two ingests can never race on the same
// collection snapshot.

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::directory::{Directory, IngestReport};
use crate::enrich::Enricher;
use crate::error::{Error, Result};
use crate::listing::Listing;
use crate::store::{Gateway, Source};

/// Ingest result plus whether the remote tier took the save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestOutcome {
    pub report: IngestReport,
    /// `None` when nothing was added and nothing was saved.
    pub saved: Option<bool>,
}

pub struct Session {
    dir: Directory,
    gateway: Gateway,
    source: Source,
}

impl Session {
    /// Load state through the gateway. Never fails; see `Gateway::load`.
    pub async fn open(gateway: Gateway) -> Self {
        let loaded = gateway.load().await;
        Self {
            dir: Directory::from_snapshot(loaded.snapshot),
            gateway,
            source: loaded.source,
        }
    }

    pub fn directory(&self) -> &Directory { &self.dir }
    pub fn gateway(&self) -> &Gateway { &self.gateway }

    /// Tier the collection was loaded from.
    pub fn source(&self) -> Source { self.source }

    /// Save the current state and wait for the remote outcome.
    pub async fn persist(&self) -> bool {
        self.gateway.save(&self.dir.snapshot()).await
    }

    /// Save in the background. The local write still happens before the
    /// remote call inside the task. `None` outside a tokio runtime.
    pub fn persist_detached(&self) -> Option<JoinHandle<bool>> {
        let handle = match Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("no async runtime; background save skipped");
                return None;
            }
        };
        let gateway = self.gateway.clone();
        let snap = self.dir.snapshot();
        Some(handle.spawn(async move { gateway.save(&snap).await }))
    }

    pub async fn ingest(&mut self, text: &str) -> IngestOutcome {
        let report = self.dir.ingest(text);
        let saved = if report.changed() { Some(self.persist().await) } else { None };
        IngestOutcome { report, saved }
    }

    /// Returns how many were removed and the remote outcome.
    pub async fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> (usize, bool) {
        let removed = self.dir.remove(ids);
        let saved = if removed > 0 { self.persist().await } else { true };
        (removed, saved)
    }

    pub async fn replace(&mut self, listing: Listing) -> Result<bool> {
        self.dir.replace(listing)?;
        Ok(self.persist().await)
    }

    /// Empty the collection and both tiers.
    pub async fn reset(&mut self) -> bool {
        self.dir.reset();
        self.gateway.clear().await
    }

    /// Move to `path`; misses land on home. Returns the canonical path.
    pub fn navigate(&mut self, path: &str) -> (String, Option<JoinHandle<bool>>) {
        let canonical = self.dir.navigate(path);
        debug!(%path, %canonical, view = %self.dir.view(), "navigate");
        (canonical, self.persist_detached())
    }

    /// Ask `enricher` for a patch and merge it. Enricher failures count as
    /// an empty patch. `None` when the listing did not change, otherwise
    /// the remote outcome of the save.
    pub async fn enrich(&mut self, id: &str, enricher: &dyn Enricher) -> Result<Option<bool>> {
        let mut listing = self
            .dir
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(s!(id)))?;

        let patch = enricher.enrich(&listing).await.unwrap_or_else(|e| {
            warn!(%id, "enrichment failed: {e}");
            Default::default()
        });
        if !listing.apply_patch(patch) {
            return Ok(None);
        }
        self.dir.replace(listing)?;
        Ok(Some(self.persist().await))
    }
}
