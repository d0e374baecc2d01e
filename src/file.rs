// src/file.rs

use std::{
    collections::BTreeSet,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use crate::csv::rows_to_string;
use crate::listing::Listing;

/// Export headers and the listing field each one reads. The header text is
/// chosen so that re-uploading an export maps every column back.
pub const EXPORT_COLUMNS: &[(&str, &str)] = &[
    ("Company Name", "name"),
    ("Website URL", "website"),
    ("Email", "email"),
    ("Phone", "phone"),
    ("Address", "address"),
    ("City", "city"),
    ("State", "state"),
    ("Zip", "zip"),
    ("Location", "locationLabel"),
    ("Rating", "rating"),
    ("Services", "services"),
    ("Company Description", "description"),
    ("Facebook URL", "facebookUrl"),
    ("Instagram URL", "instagramUrl"),
    ("LinkedIn URL", "linkedinUrl"),
    ("X (Twitter) URL", "twitterUrl"),
];

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Write via a sibling temp file + rename, so readers never see half a file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

/// `Ok(None)` when the file does not exist.
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Listings as CSV text: the fixed export columns, then every extra column
/// any listing carries (sorted).
pub fn listings_to_csv(listings: &[Listing]) -> String {
    let extras: BTreeSet<&str> = listings
        .iter()
        .flat_map(|l| l.extra.keys().map(String::as_str))
        .collect();

    let mut headers: Vec<String> = EXPORT_COLUMNS.iter().map(|(h, _)| s!(*h)).collect();
    headers.extend(extras.iter().map(|k| s!(*k)));

    let rows: Vec<Vec<String>> = listings
        .iter()
        .map(|l| {
            EXPORT_COLUMNS
                .iter()
                .map(|(_, key)| l.field(key).unwrap_or_default())
                .chain(extras.iter().map(|k| l.extra_text(k).unwrap_or_default()))
                .collect()
        })
        .collect();

    rows_to_string(&headers, &rows)
}

/// Write the export to `path`. Returns the path written.
pub fn export_listings(path: &Path, listings: &[Listing]) -> io::Result<PathBuf> {
    ensure_parent(path)?;
    fs::write(path, listings_to_csv(listings))?;
    Ok(path.to_path_buf())
}
