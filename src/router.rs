// src/router.rs
//
// Path → screen. Reserved segments are matched before slug lookup.

use crate::config::consts::DIRECTORY_SEGMENT;
use crate::listing::{Listing, ViewState};
use crate::slug::{find_by_slug, slug_for};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route<'a> {
    Home,
    Directory,
    Listing(&'a Listing),
    /// Unknown segment; callers redirect to `Home`.
    NotFound,
}

impl<'a> Route<'a> {
    /// Screen to show; a miss falls back to home.
    pub fn view(&self) -> ViewState {
        match self {
            Route::Home | Route::NotFound => ViewState::Upload,
            Route::Directory => ViewState::Directory,
            Route::Listing(_) => ViewState::Profile,
        }
    }

    pub fn listing(&self) -> Option<&'a Listing> {
        match self {
            Route::Listing(l) => Some(l),
            _ => None,
        }
    }

    /// Canonical `/`-prefixed path. `NotFound` redirects to `/`.
    pub fn path(&self) -> String {
        match self {
            Route::Home | Route::NotFound => s!("/"),
            Route::Directory => join!("/", DIRECTORY_SEGMENT),
            Route::Listing(l) => path_for(l),
        }
    }
}

/// `/`-prefixed link for a listing.
pub fn path_for(listing: &Listing) -> String {
    join!("/", &slug_for(listing))
}

/// Resolve a request path (leading `/` optional) against the collection.
pub fn resolve<'a>(path: &str, listings: &'a [Listing]) -> Route<'a> {
    let segment = path.strip_prefix('/').unwrap_or(path);
    match segment {
        "" => Route::Home,
        DIRECTORY_SEGMENT => Route::Directory,
        slug => find_by_slug(listings, Some(slug)).map_or(Route::NotFound, Route::Listing),
    }
}
