// tests/store.rs
//
// Tier precedence and failure handling of the persistence gateway.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bizdir::error::{Error, Result};
use bizdir::listing::{Listing, ViewState};
use bizdir::parse::parse_listings;
use bizdir::store::{
    builtin_listings, FileCache, Gateway, LocalCache, MemoryCache, MemoryRemote, RemoteDocument,
    RemoteStore, Snapshot, Source,
};

/// Remote that fails every call and counts attempts.
#[derive(Default)]
struct FailingRemote {
    calls: AtomicUsize,
}

#[async_trait]
impl RemoteStore for FailingRemote {
    async fn fetch(&self) -> Result<Option<RemoteDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Remote("unreachable".into()))
    }

    async fn store(&self, _doc: &RemoteDocument) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Remote("unreachable".into()))
    }
}

fn snapshot(names: &[&str]) -> Snapshot {
    Snapshot {
        listings: names
            .iter()
            .enumerate()
            .map(|(i, n)| Listing::new(format!("comp-{i}"), *n).located("Austin", "TX"))
            .collect(),
        view: ViewState::Directory,
        selected_id: None,
    }
}

fn names(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(|l| l.name.as_str()).collect()
}

#[tokio::test]
async fn empty_tiers_fall_back_to_builtin() {
    let gw = Gateway::new(MemoryCache::new());
    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Builtin);
    assert_eq!(loaded.snapshot.listings, builtin_listings());
    assert_eq!(loaded.snapshot.view, ViewState::Directory);
}

#[tokio::test]
async fn failing_remote_falls_back_to_local() {
    let local = MemoryCache::new();
    local.write_listings(&snapshot(&["Cached"]).listings).expect("seed local");
    let gw = Gateway::new(local).with_remote(FailingRemote::default());

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Local);
    assert_eq!(names(&loaded.snapshot.listings), ["Cached"]);
}

#[tokio::test]
async fn non_empty_remote_wins() {
    let local = MemoryCache::new();
    local.write_listings(&snapshot(&["Cached"]).listings).expect("seed local");
    let remote = MemoryRemote::seeded(snapshot(&["Remote"]).listings);
    let gw = Gateway::new(local).with_remote(remote);

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Remote);
    assert_eq!(names(&loaded.snapshot.listings), ["Remote"]);
}

#[tokio::test]
async fn empty_remote_document_falls_through_to_local() {
    let local = MemoryCache::new();
    local.write_listings(&snapshot(&["Cached"]).listings).expect("seed local");
    let gw = Gateway::new(local).with_remote(MemoryRemote::seeded(vec![]));

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Local);
    assert_eq!(names(&loaded.snapshot.listings), ["Cached"]);
}

#[tokio::test]
async fn upload_with_id_column_survives_save_and_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gw = Gateway::new(FileCache::new(dir.path()));

    let parsed = parse_listings("id,locationLabel,Company Name,City,State\n7,Downtown,Ace Gutters,Austin,TX\n");
    let snap = Snapshot { listings: parsed.listings, view: ViewState::Directory, selected_id: None };
    assert!(gw.save(&snap).await);

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Local);
    let ace = &loaded.snapshot.listings[0];
    assert_eq!(ace.id, "comp-1");
    assert_eq!(ace.location_label.as_deref(), Some("Downtown"));
    assert_eq!(ace.extra_text("csv:id").as_deref(), Some("7"));
}

#[tokio::test]
async fn remote_extras_of_any_json_type_load() {
    let doc: RemoteDocument =
        serde_json::from_str(r#"{"listings":[{"id":"a","name":"A","reviewCount":12}]}"#).expect("parse");
    let gw = Gateway::new(MemoryCache::new()).with_remote(MemoryRemote::seeded(doc.listings));

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Remote);
    assert_eq!(loaded.snapshot.listings[0].field("reviewCount").as_deref(), Some("12"));
}

#[tokio::test]
async fn save_writes_local_even_when_remote_fails() {
    let remote = Arc::new(FailingRemote::default());
    let gw = Gateway::new(MemoryCache::new()).with_remote_arc(remote.clone());

    assert!(!gw.save(&snapshot(&["Ace"])).await);
    assert_eq!(remote.calls.load(Ordering::SeqCst), 1);

    let loaded = gw.load().await;
    assert_eq!(loaded.source, Source::Local);
    assert_eq!(names(&loaded.snapshot.listings), ["Ace"]);
}

#[tokio::test]
async fn local_quota_is_swallowed() {
    let remote = Arc::new(MemoryRemote::new());
    let gw = Gateway::new(MemoryCache::new().with_quota(8)).with_remote_arc(remote.clone());

    assert!(gw.save(&snapshot(&["Too Big For Eight Bytes"])).await);
    let doc = remote.document().expect("remote written");
    assert_eq!(names(&doc.listings), ["Too Big For Eight Bytes"]);
    assert!(doc.last_updated.is_some());
}

#[tokio::test]
async fn clear_overwrites_remote_with_empty() {
    let remote = Arc::new(MemoryRemote::seeded(snapshot(&["Old"]).listings));
    let gw = Gateway::new(MemoryCache::new()).with_remote_arc(remote.clone());
    gw.save(&snapshot(&["Old"])).await;

    assert!(gw.clear().await);
    assert!(remote.document().expect("doc kept").listings.is_empty());

    // Both tiers empty again.
    assert_eq!(gw.load().await.source, Source::Builtin);
}

#[tokio::test]
async fn file_cache_round_trips_view_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = FileCache::new(dir.path().join("store"));
    let gw = Gateway::new(cache.clone());

    let mut snap = snapshot(&["Ace"]);
    snap.view = ViewState::Profile;
    snap.selected_id = Some("comp-0".into());
    assert!(gw.save(&snap).await);

    let loaded = Gateway::new(cache).load().await;
    assert_eq!(loaded.source, Source::Local);
    assert_eq!(loaded.snapshot, snap);
}

#[test]
fn remote_document_accepts_legacy_key() {
    let doc: RemoteDocument =
        serde_json::from_str(r#"{"companies":[{"id":"comp-1","name":"Ace"}],"lastUpdated":"2024-01-01T00:00:00Z"}"#)
            .expect("parse");
    assert_eq!(doc.listings.len(), 1);
    assert_eq!(doc.listings[0].services.len(), 3);
}
