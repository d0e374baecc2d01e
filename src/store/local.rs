// src/store/local.rs
//
// Local fallback cache: synchronous, always written first, always read for
// view state.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::config::consts::{LISTINGS_FILE, SELECTED_ID_FILE, VIEW_FILE};
use crate::error::Result;
use crate::file::{read_optional, remove_if_exists, write_atomic};
use crate::listing::{Listing, ViewState};

/// Key/value-ish local storage for the collection and the last view.
pub trait LocalCache: Send + Sync {
    fn read_listings(&self) -> Result<Option<Vec<Listing>>>;
    fn write_listings(&self, listings: &[Listing]) -> Result<()>;

    fn read_view(&self) -> Result<Option<ViewState>>;
    fn write_view(&self, view: ViewState) -> Result<()>;

    fn read_selected(&self) -> Result<Option<String>>;
    /// `None` removes the stored id.
    fn write_selected(&self, id: Option<&str>) -> Result<()>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;
}

fn quota_exceeded(len: usize, quota: usize) -> io::Error {
    io::Error::new(
        ErrorKind::StorageFull,
        format!("local cache quota exceeded: {len} > {quota} bytes"),
    )
}

/* ---------------- On-disk cache ---------------- */

/// One file per key under a cache directory (`.store/` by default).
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), quota: None }
    }

    /// Refuse collection writes larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path(&self, key: &str) -> PathBuf { self.dir.join(key) }
}

impl LocalCache for FileCache {
    fn read_listings(&self) -> Result<Option<Vec<Listing>>> {
        match read_optional(&self.path(LISTINGS_FILE))? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write_listings(&self, listings: &[Listing]) -> Result<()> {
        let bytes = serde_json::to_vec(listings)?;
        if let Some(q) = self.quota.filter(|q| bytes.len() > *q) {
            return Err(quota_exceeded(bytes.len(), q).into());
        }
        write_atomic(&self.path(LISTINGS_FILE), &bytes)?;
        Ok(())
    }

    fn read_view(&self) -> Result<Option<ViewState>> {
        let text = read_optional(&self.path(VIEW_FILE))?;
        // Unknown values read as "nothing stored".
        Ok(text.and_then(|t| t.parse().ok()))
    }

    fn write_view(&self, view: ViewState) -> Result<()> {
        write_atomic(&self.path(VIEW_FILE), view.as_str().as_bytes())?;
        Ok(())
    }

    fn read_selected(&self) -> Result<Option<String>> {
        let text = read_optional(&self.path(SELECTED_ID_FILE))?;
        Ok(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
    }

    fn write_selected(&self, id: Option<&str>) -> Result<()> {
        let path = self.path(SELECTED_ID_FILE);
        match id {
            Some(id) => write_atomic(&path, id.as_bytes())?,
            None => remove_if_exists(&path)?,
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in [LISTINGS_FILE, VIEW_FILE, SELECTED_ID_FILE] {
            remove_if_exists(&self.path(key))?;
        }
        Ok(())
    }
}

/* ---------------- In-memory cache ---------------- */

#[derive(Debug, Default)]
struct MemoryState {
    listings: Option<String>,
    view: Option<ViewState>,
    selected: Option<String>,
}

/// Process-local cache. Stores the collection serialized, like the disk
/// cache, so the quota applies to the same byte count.
#[derive(Debug, Default)]
pub struct MemoryCache {
    state: Mutex<MemoryState>,
    quota: Option<usize>,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }

    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalCache for MemoryCache {
    fn read_listings(&self) -> Result<Option<Vec<Listing>>> {
        match self.state().listings.as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    fn write_listings(&self, listings: &[Listing]) -> Result<()> {
        let text = serde_json::to_string(listings)?;
        if let Some(q) = self.quota.filter(|q| text.len() > *q) {
            return Err(quota_exceeded(text.len(), q).into());
        }
        self.state().listings = Some(text);
        Ok(())
    }

    fn read_view(&self) -> Result<Option<ViewState>> {
        Ok(self.state().view)
    }

    fn write_view(&self, view: ViewState) -> Result<()> {
        self.state().view = Some(view);
        Ok(())
    }

    fn read_selected(&self) -> Result<Option<String>> {
        Ok(self.state().selected.clone())
    }

    fn write_selected(&self, id: Option<&str>) -> Result<()> {
        self.state().selected = id.map(String::from);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.state() = MemoryState::default();
        Ok(())
    }
}
