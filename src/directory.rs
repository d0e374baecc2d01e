// src/directory.rs
//
// In-memory owner of the collection.
//
// - Directory: the authoritative, ordered listing collection plus the current
//              view. Only its methods mutate the collection (ingest, remove,
//              id-keyed replace, reset).
// - ListingView: borrowed, filtered projection (row indices) for display and
//                pagination. Never owns or clones listings.

use tracing::{debug, info};

use crate::config::consts::RELATED_MIN_RATING;
use crate::core::sanitize::fold;
use crate::dedup::partition;
use crate::error::{Error, Result};
use crate::listing::{Listing, ViewState};
use crate::parse::parse_listings;
use crate::router::{resolve, Route};
use crate::slug::slug_for;
use crate::store::Snapshot;

/// What one upload did to the collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows the parser produced.
    pub parsed: usize,
    pub added: usize,
    pub duplicates: usize,
}

impl IngestReport {
    /// The message shown to whoever uploaded the file.
    pub fn message(&self) -> String {
        if self.parsed == 0 {
            s!("No valid listings found in CSV.")
        } else if self.added == 0 {
            format!("No new listings added. Duplicates: {}", self.duplicates)
        } else {
            format!("Added {} new listings, skipped {} duplicates.", self.added, self.duplicates)
        }
    }

    pub fn changed(&self) -> bool { self.added > 0 }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directory {
    listings: Vec<Listing>,
    view: ViewState,
    selected_id: Option<String>,
}

impl Directory {
    pub fn new() -> Self { Self::default() }

    pub fn from_snapshot(snap: Snapshot) -> Self {
        Self { listings: snap.listings, view: snap.view, selected_id: snap.selected_id }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            listings: self.listings.clone(),
            view: self.view,
            selected_id: self.selected_id.clone(),
        }
    }

    /// Read-only view of the collection, in insertion order.
    pub fn listings(&self) -> &[Listing] { &self.listings }
    pub fn len(&self) -> usize { self.listings.len() }
    pub fn is_empty(&self) -> bool { self.listings.is_empty() }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn view(&self) -> ViewState { self.view }

    pub fn selected(&self) -> Option<&Listing> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    /* ---------------- Mutation ---------------- */

    /// Parse an upload and merge it in.
    pub fn ingest(&mut self, text: &str) -> IngestReport {
        let outcome = parse_listings(text);
        let parsed = outcome.rows;
        let mut report = self.merge(outcome.listings);
        report.parsed = parsed;
        info!(parsed, added = report.added, duplicates = report.duplicates, "ingest finished");
        report
    }

    /// Merge already-parsed listings; duplicates by signature are skipped.
    pub fn merge(&mut self, batch: Vec<Listing>) -> IngestReport {
        let parsed = batch.len();
        let outcome = partition(&self.listings, batch);
        let report = IngestReport { parsed, added: outcome.added(), duplicates: outcome.duplicates };
        self.listings.extend(outcome.accepted);
        report
    }

    /// Remove listings by id. Returns how many were removed.
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.listings.len();
        self.listings.retain(|l| !ids.iter().any(|id| id.as_ref() == l.id));
        if self.selected_id.is_some() && self.selected().is_none() {
            self.selected_id = None;
            if self.view == ViewState::Profile {
                self.view = ViewState::Directory;
            }
        }
        before - self.listings.len()
    }

    /// Replace the listing with the same id.
    pub fn replace(&mut self, updated: Listing) -> Result<()> {
        let slot = self
            .listings
            .iter_mut()
            .find(|l| l.id == updated.id)
            .ok_or_else(|| Error::NotFound(updated.id.clone()))?;

        let (old, new) = (slug_for(slot), slug_for(&updated));
        if old != new {
            // Old links stop resolving; there is no alias table.
            debug!(id = %updated.id, %old, %new, "listing slug changed");
        }
        *slot = updated;
        slot.normalize();
        Ok(())
    }

    /// Drop everything and go back home.
    pub fn reset(&mut self) {
        self.listings.clear();
        self.view = ViewState::Upload;
        self.selected_id = None;
    }

    /* ---------------- Navigation ---------------- */

    pub fn route(&self, path: &str) -> Route<'_> {
        resolve(path, &self.listings)
    }

    /// Resolve `path` and move the current view there. Misses land on home.
    /// Returns the canonical path now shown.
    pub fn navigate(&mut self, path: &str) -> String {
        let (view, selected, canonical) = {
            let route = self.route(path);
            (route.view(), route.listing().map(|l| l.id.clone()), route.path())
        };
        self.view = view;
        self.selected_id = selected;
        canonical
    }

    /* ---------------- Queries ---------------- */

    /// Last `n` listings, newest first.
    pub fn newest(&self, n: usize) -> Vec<&Listing> {
        self.listings.iter().rev().take(n).collect()
    }

    /// Sorted, de-duplicated states.
    pub fn locations(&self) -> Vec<String> {
        let mut states: Vec<String> = self
            .listings
            .iter()
            .map(|l| l.state.clone())
            .filter(|s| !s.trim().is_empty())
            .collect();
        states.sort();
        states.dedup();
        states
    }

    /// Name or any service contains `term`; city or state contains `location`.
    /// Both are case-insensitive; empty matches everything.
    pub fn search(&self, term: &str, location: &str) -> ListingView<'_> {
        let term = fold(term);
        let location = fold(location);
        ListingView::filter(&self.listings, |l| {
            let matches_term = term.is_empty()
                || l.name.to_lowercase().contains(&term)
                || l.services.iter().any(|s| s.to_lowercase().contains(&term));
            let matches_location = location.is_empty()
                || l.city.to_lowercase().contains(&location)
                || l.state.to_lowercase().contains(&location);
            matches_term && matches_location
        })
    }

    /// Admin table filter: name, city or state contains `term`.
    pub fn admin_filter(&self, term: &str) -> ListingView<'_> {
        let term = fold(term);
        ListingView::filter(&self.listings, |l| {
            term.is_empty()
                || l.name.to_lowercase().contains(&term)
                || l.city.to_lowercase().contains(&term)
                || l.state.to_lowercase().contains(&term)
        })
    }

    /// Up to `n` other listings, nearest first: same city +10, same state +5,
    /// well rated +2. Ties keep collection order.
    pub fn related(&self, listing: &Listing, n: usize) -> Vec<&Listing> {
        let mut scored: Vec<(u32, &Listing)> = self
            .listings
            .iter()
            .filter(|c| c.id != listing.id)
            .map(|c| {
                let mut score = 0;
                if c.city == listing.city { score += 10; }
                if c.state == listing.state { score += 5; }
                if c.rating.is_some_and(|r| r >= RELATED_MIN_RATING) { score += 2; }
                (score, c)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(n).map(|(_, l)| l).collect()
    }
}

/// Zero-copy filtered view over a listing slice.
#[derive(Clone, Debug)]
pub struct ListingView<'a> {
    /// Positions of kept listings in the collection
    pub row_ix: Vec<usize>,
    raw: &'a [Listing],
}

impl<'a> ListingView<'a> {
    pub fn all(raw: &'a [Listing]) -> Self {
        Self { row_ix: (0..raw.len()).collect(), raw }
    }

    pub fn filter(raw: &'a [Listing], mut keep: impl FnMut(&Listing) -> bool) -> Self {
        let row_ix = raw.iter().enumerate().filter(|(_, l)| keep(*l)).map(|(i, _)| i).collect();
        Self { row_ix, raw }
    }

    pub fn len(&self) -> usize { self.row_ix.len() }
    pub fn is_empty(&self) -> bool { self.row_ix.is_empty() }

    pub fn get(&self, i: usize) -> Option<&'a Listing> {
        self.row_ix.get(i).and_then(|&ix| self.raw.get(ix))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        self.row_ix.iter().filter_map(|&ix| self.raw.get(ix))
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 { return 0; }
        self.len().div_ceil(per_page)
    }

    /// 1-based page. Out of range gives an empty page.
    pub fn page(&self, page: usize, per_page: usize) -> Vec<&'a Listing> {
        if page == 0 || per_page == 0 { return Vec::new(); }
        self.iter().skip((page - 1) * per_page).take(per_page).collect()
    }
}
