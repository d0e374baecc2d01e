// src/slug.rs
//
// Listing <-> URL path segment.
//
// The slug is recomputed from name/city/state on every lookup; there is no
// stored alias. Editing one of those fields moves the listing to a new
// slug and the old one stops resolving.

use crate::core::sanitize::{hyphenate, keep_slug_chars};
use crate::listing::Listing;

/// Canonical path segment for a listing, e.g. `ace-gutters-austin-tx`.
pub fn slug_for(listing: &Listing) -> String {
    let raw = format!("{}-{}-{}", listing.name, listing.city, listing.state);
    let lowered = raw.to_lowercase();
    hyphenate(&keep_slug_chars(lowered.trim()))
}

/// First listing (collection order) whose slug equals `slug`.
pub fn find_by_slug<'a>(listings: &'a [Listing], slug: Option<&str>) -> Option<&'a Listing> {
    let slug = slug.filter(|s| !s.is_empty())?;
    listings.iter().find(|l| slug_for(l) == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_collapses() {
        let l = Listing::new("1", "Joe's  Gutters & Co.").located("St. Louis", "MO");
        assert_eq!(slug_for(&l), "joes-gutters-co-st-louis-mo");
    }

    #[test]
    fn empty_city_and_state_do_not_leave_dangling_hyphens() {
        let l = Listing::new("1", "Ace");
        assert_eq!(slug_for(&l), "ace");
    }

    #[test]
    fn underscores_become_hyphens() {
        let l = Listing::new("1", "ace_gutters").located("", "TX");
        assert_eq!(slug_for(&l), "ace-gutters-tx");
    }

    #[test]
    fn empty_or_missing_slug_is_not_found() {
        let list = vec![Listing::new("1", "")];
        assert!(find_by_slug(&list, None).is_none());
        assert!(find_by_slug(&list, Some("")).is_none());
    }
}
