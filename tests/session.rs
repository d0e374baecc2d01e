// tests/session.rs
//
// End-to-end flows through Session: upload, edit, navigate, reset.

use std::sync::Arc;

use async_trait::async_trait;

use bizdir::enrich::{EnrichmentPatch, Enricher};
use bizdir::error::{Error, Result};
use bizdir::listing::{Listing, ViewState};
use bizdir::store::{
    FileCache, Gateway, LocalCache, MemoryCache, MemoryRemote, RemoteDocument, RemoteStore, Source,
};
use bizdir::Session;

const UPLOAD: &str = "Company Name,City,State,Rating\nAce Gutters,Austin,TX,4.8\nBest Gutters,Austin,TX,3.9\n";

struct FixedPatch(EnrichmentPatch);

#[async_trait]
impl Enricher for FixedPatch {
    async fn enrich(&self, _listing: &Listing) -> Result<EnrichmentPatch> {
        Ok(self.0.clone())
    }
}

struct BrokenEnricher;

#[async_trait]
impl Enricher for BrokenEnricher {
    async fn enrich(&self, _listing: &Listing) -> Result<EnrichmentPatch> {
        Err(Error::Remote("model unavailable".into()))
    }
}

/// Remote that is never reachable.
struct DownRemote;

#[async_trait]
impl RemoteStore for DownRemote {
    async fn fetch(&self) -> Result<Option<RemoteDocument>> {
        Err(Error::Remote("offline".into()))
    }

    async fn store(&self, _doc: &RemoteDocument) -> Result<()> {
        Err(Error::Remote("offline".into()))
    }
}

async fn empty_session() -> (Session, Arc<MemoryRemote>) {
    let remote = Arc::new(MemoryRemote::new());
    let gw = Gateway::new(MemoryCache::new()).with_remote_arc(remote.clone());
    let mut session = Session::open(gw).await;
    // Start from nothing rather than the built-in seeds.
    session.reset().await;
    (session, remote)
}

#[tokio::test]
async fn upload_twice_adds_nothing_the_second_time() {
    let (mut session, remote) = empty_session().await;

    let first = session.ingest(UPLOAD).await;
    assert_eq!((first.report.added, first.report.duplicates), (2, 0));
    assert_eq!(first.saved, Some(true));
    assert_eq!(remote.document().expect("saved").listings.len(), 2);

    let second = session.ingest(UPLOAD).await;
    assert_eq!((second.report.added, second.report.duplicates), (0, 2));
    assert_eq!(second.saved, None);
    assert_eq!(session.directory().len(), 2);
}

#[tokio::test]
async fn reopen_sees_saved_collection_and_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = FileCache::new(dir.path());

    {
        let mut session = Session::open(Gateway::new(cache.clone())).await;
        assert_eq!(session.source(), Source::Builtin);
        session.reset().await;
        session.ingest(UPLOAD).await;
        let (path, pending) = session.navigate("/ace-gutters-austin-tx");
        assert_eq!(path, "/ace-gutters-austin-tx");
        assert!(pending.expect("runtime present").await.expect("join"));
    }

    let session = Session::open(Gateway::new(cache)).await;
    assert_eq!(session.source(), Source::Local);
    assert_eq!(session.directory().len(), 2);
    assert_eq!(session.directory().view(), ViewState::Profile);
    assert_eq!(session.directory().selected().map(|l| l.name.as_str()), Some("Ace Gutters"));
}

#[tokio::test]
async fn edit_and_remove_persist() {
    let (mut session, remote) = empty_session().await;
    session.ingest(UPLOAD).await;

    let mut best = session
        .directory()
        .listings()
        .iter()
        .find(|l| l.name == "Best Gutters")
        .cloned()
        .expect("best");
    best.set_field("rating", "4.4 stars");
    assert!(session.replace(best.clone()).await.expect("replace"));
    let stored = remote.document().expect("doc");
    assert_eq!(stored.listings.iter().find(|l| l.id == best.id).and_then(|l| l.rating), Some(4.4));

    let (removed, saved) = session.remove(&[best.id.as_str()]).await;
    assert_eq!((removed, saved), (1, true));
    assert_eq!(remote.document().expect("doc").listings.len(), 1);

    let ghost = Listing::new("comp-ghost", "Ghost");
    assert!(matches!(session.replace(ghost).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn enrichment_is_additive_and_failure_tolerant() {
    let (mut session, _remote) = empty_session().await;
    session.ingest(UPLOAD).await;
    let id = session.directory().listings()[0].id.clone();
    let services = session.directory().listings()[0].services.clone();

    assert_eq!(session.enrich(&id, &BrokenEnricher).await.expect("enrich"), None);

    let patch = EnrichmentPatch { description: Some("Family run since 1990.".into()), services: None };
    assert_eq!(session.enrich(&id, &FixedPatch(patch)).await.expect("enrich"), Some(true));

    let l = session.directory().get(&id).expect("listing");
    assert_eq!(l.description.as_deref(), Some("Family run since 1990."));
    assert_eq!(l.services, services);

    assert!(session.enrich("missing", &BrokenEnricher).await.is_err());
}

#[tokio::test]
async fn enrichment_reports_failed_remote_save() {
    let local = MemoryCache::new();
    local.write_listings(&[Listing::new("comp-1", "Ace").located("Austin", "TX")]).expect("seed");
    let gw = Gateway::new(local).with_remote(DownRemote);
    let mut session = Session::open(gw).await;
    assert_eq!(session.source(), Source::Local);

    let patch = EnrichmentPatch { description: Some("Seamless gutters.".into()), services: None };
    assert_eq!(session.enrich("comp-1", &FixedPatch(patch)).await.expect("enrich"), Some(false));
    assert_eq!(
        session.directory().get("comp-1").and_then(|l| l.description.as_deref()),
        Some("Seamless gutters.")
    );
}

#[tokio::test]
async fn reset_empties_every_tier() {
    let (mut session, remote) = empty_session().await;
    session.ingest(UPLOAD).await;

    assert!(session.reset().await);
    assert!(session.directory().is_empty());
    assert_eq!(session.directory().view(), ViewState::Upload);
    assert!(remote.document().expect("doc").listings.is_empty());
}
