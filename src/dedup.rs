// src/dedup.rs
//
// Content identity for listings and the accept/reject split used when an
// upload is merged into an existing collection.

use std::collections::HashSet;

use uuid::Uuid;

use crate::config::consts::{ID_PREFIX, SIGNATURE_SEP};
use crate::core::sanitize::fold;
use crate::listing::Listing;

/// Dedup key: folded `name|city|state`.
pub fn signature(listing: &Listing) -> String {
    let mut sig = fold(&listing.name);
    sig.push(SIGNATURE_SEP);
    sig.push_str(&fold(&listing.city));
    sig.push(SIGNATURE_SEP);
    sig.push_str(&fold(&listing.state));
    sig
}

/// Accepted listings (already re-keyed) and the number of rejects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub accepted: Vec<Listing>,
    pub duplicates: usize,
}

impl MergeOutcome {
    pub fn added(&self) -> usize { self.accepted.len() }
}

/// Generate an id not present in `taken`.
pub fn fresh_id(taken: &HashSet<String>) -> String {
    loop {
        let id = join!(ID_PREFIX, &Uuid::new_v4().simple().to_string());
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Split `batch` into listings to append to `existing` and a duplicate count.
///
/// A listing is a duplicate when its signature matches anything in
/// `existing` or anything accepted earlier from the same batch. Accepted
/// listings get fresh ids that collide with neither. `existing` is only read.
pub fn partition(existing: &[Listing], batch: Vec<Listing>) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(signature).collect();
    let mut taken: HashSet<String> = existing.iter().map(|l| l.id.clone()).collect();
    let mut out = MergeOutcome::default();

    for mut listing in batch {
        if !seen.insert(signature(&listing)) {
            out.duplicates += 1;
            continue;
        }
        let id = fresh_id(&taken);
        taken.insert(id.clone());
        listing.id = id;
        out.accepted.push(listing);
    }
    out
}
