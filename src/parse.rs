// src/parse.rs
//! # Upload parser
//!
//! Turns the text of an uploaded CSV into [`Listing`]s.
//!
//! Parsing is total: short input gives an empty outcome, a bad rating
//! becomes `0`, a missing name becomes a placeholder, and a row with no
//! services gets the default list. No row is ever dropped.
//!
//! ## Column mapping
//! Header cells are matched in three passes, most specific first:
//! 1. exact names (`company name`, `website url`, `city`, …),
//! 2. substring rules that always win (`zip`/`postal`, `rat`/`star`, social URLs, …),
//! 3. fuzzy rules that only fill a still-empty field. Description (`desc`/`about`)
//!    is tried before the generic `name` rule so "Business Description" never
//!    lands in `name`.
//!
//! Anything left over is kept verbatim in [`Listing::extra`].

use crate::config::consts::{ID_PREFIX, PLACEHOLDER_NAME_PREFIX};
use crate::core::sanitize::{clean_cell, fold};
use crate::csv::{split_cells, split_lines};
use crate::listing::{default_services, extra_key, Listing};

/// Result of one parse: listings in row order, plus how many data rows were read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseOutcome {
    pub listings: Vec<Listing>,
    pub rows: usize,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool { self.listings.is_empty() }
}

/// Canonical destination of one input column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    City,
    State,
    Zip,
    Phone,
    Email,
    Website,
    LocationLabel,
    Rating,
    Services,
    Description,
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
    /// Unrecognized; value kept under the original header text.
    Extra(String),
}

/// One classified header cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    /// Fuzzy matches only fill a field that is still empty.
    pub fuzzy: bool,
}

impl Column {
    fn exact(field: Field) -> Self { Self { field, fuzzy: false } }
    fn fuzzy(field: Field) -> Self { Self { field, fuzzy: true } }
}

/// Map one raw header cell to its column. Order matters; see module docs.
pub fn classify(raw_header: &str) -> Column {
    let original = clean_cell(raw_header);
    let h = fold(&original);
    let has = |needle: &str| h.contains(needle);

    // 1. exact names
    match h.as_str() {
        "company name" | "name" | "business name" => return Column::exact(Field::Name),
        "company description" | "description" => return Column::exact(Field::Description),
        "website url" | "website" => return Column::exact(Field::Website),
        "email" => return Column::exact(Field::Email),
        "phone" => return Column::exact(Field::Phone),
        "address" => return Column::exact(Field::Address),
        "city" => return Column::exact(Field::City),
        "state" => return Column::exact(Field::State),
        "location" | "locationlabel" | "location label" => return Column::exact(Field::LocationLabel),
        _ => {}
    }

    // 2. substring rules
    if has("zip") || has("postal") { return Column::exact(Field::Zip); }
    if has("rat") || has("star") { return Column::exact(Field::Rating); }
    if has("service") || has("offer") { return Column::exact(Field::Services); }
    if has("facebook") { return Column::exact(Field::Facebook); }
    if has("instagram") { return Column::exact(Field::Instagram); }
    if has("linkedin") { return Column::exact(Field::Linkedin); }
    if has("twitter") || has("(x)") { return Column::exact(Field::Twitter); }

    // 3. fuzzy rules; description before name
    if has("desc") || has("about") { return Column::fuzzy(Field::Description); }
    if has("web") || has("url") { return Column::fuzzy(Field::Website); }
    if has("street") { return Column::fuzzy(Field::Address); }
    if has("mail") { return Column::fuzzy(Field::Email); }
    if has("phone") || has("tel") { return Column::fuzzy(Field::Phone); }
    if has("city") { return Column::fuzzy(Field::City); }
    if has("state") || has("province") { return Column::fuzzy(Field::State); }
    if has("name") { return Column::fuzzy(Field::Name); }

    Column::exact(Field::Extra(extra_key(&original)))
}

/// Parse a rating the way a lenient float reader would: take the longest
/// leading numeric prefix (`"4.5 stars"` → 4.5). Anything else is `0`.
pub fn parse_rating(text: &str) -> f64 {
    let t = text.trim();
    let bytes = t.as_bytes();
    let mut end = 0;
    let mut best = None;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    while end < bytes.len() {
        let b = bytes[end];
        match b {
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
        if seen_digit {
            if let Ok(v) = t[..end].parse::<f64>() {
                best = Some(v);
            }
        }
    }

    best.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Split a services cell on `;` or `,`. Empty input gives the default list.
pub fn split_services(text: &str) -> Vec<String> {
    let list: Vec<String> = text
        .split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if list.is_empty() { default_services() } else { list }
}

fn set_opt(slot: &mut Option<String>, value: &str, fuzzy: bool) {
    if fuzzy && slot.as_deref().is_some_and(|v| !v.is_empty()) { return; }
    *slot = Some(s!(value));
}

fn set_str(slot: &mut String, value: &str, fuzzy: bool) {
    if fuzzy && !slot.is_empty() { return; }
    *slot = s!(value);
}

fn apply(listing: &mut Listing, col: &Column, value: &str) {
    let fz = col.fuzzy;
    match &col.field {
        Field::Name => set_str(&mut listing.name, value, fz),
        Field::Address => set_str(&mut listing.address, value, fz),
        Field::City => set_str(&mut listing.city, value, fz),
        Field::State => set_str(&mut listing.state, value, fz),
        Field::Zip => set_str(&mut listing.zip, value, fz),
        Field::Phone => set_str(&mut listing.phone, value, fz),
        Field::Email => set_str(&mut listing.email, value, fz),
        Field::Website => set_str(&mut listing.website, value, fz),
        Field::LocationLabel => set_opt(&mut listing.location_label, value, fz),
        Field::Description => set_opt(&mut listing.description, value, fz),
        Field::Facebook => set_opt(&mut listing.facebook_url, value, fz),
        Field::Instagram => set_opt(&mut listing.instagram_url, value, fz),
        Field::Linkedin => set_opt(&mut listing.linkedin_url, value, fz),
        Field::Twitter => set_opt(&mut listing.twitter_url, value, fz),
        Field::Rating => listing.rating = Some(parse_rating(value)),
        Field::Services => listing.services = split_services(value),
        Field::Extra(key) => listing.set_extra(key, value),
    }
}

/// Parse uploaded CSV text into listings.
///
/// Ids are `comp-<n>` by data row position (1-based); the caller replaces
/// them when merging into a collection.
pub fn parse_listings(text: &str) -> ParseOutcome {
    let lines = split_lines(text);
    if lines.len() < 2 {
        return ParseOutcome::default();
    }

    let columns: Vec<Column> = split_cells(lines[0]).iter().map(|h| classify(h)).collect();
    let mut listings = Vec::with_capacity(lines.len() - 1);

    for (i, line) in lines.iter().enumerate().skip(1) {
        let cells = split_cells(line);
        let mut listing = Listing::new(format!("{ID_PREFIX}{i}"), s!());

        for (ix, col) in columns.iter().enumerate() {
            let value = cells.get(ix).map(String::as_str).unwrap_or("");
            apply(&mut listing, col, value);
        }

        if listing.name.trim().is_empty() {
            listing.name = format!("{PLACEHOLDER_NAME_PREFIX} {i}");
        }
        listing.normalize();
        listings.push(listing);
    }

    let rows = listings.len();
    ParseOutcome { listings, rows }
}

/// One-row demo upload in the canonical column layout.
pub fn sample_csv() -> &'static str {
    concat!(
        "Company Name,Website URL,Email,Phone,Address,City,State,Location,",
        "Facebook URL,Instagram URL,LinkedIn URL,X (Twitter) URL,Company Description\n",
        "\"LeafGuard Gutters\",\"https://www.leafguard.com\",\"info@leafguard.com\",",
        "\"+1-800-290-6106\",\"1595 Georgetown Rd\",\"Hudson\",\"OH\",\"Hudson, Ohio, USA\",",
        "\"https://www.facebook.com/LeafGuard\",\"https://www.instagram.com/leafguard\",",
        "\"https://www.linkedin.com/company/leafguard\",\"\",",
        "\"LeafGuard Gutters is a nationally recognized gutter installation company...\"",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_prefix_parse() {
        assert_eq!(parse_rating("4.5"), 4.5);
        assert_eq!(parse_rating(" 4.8 stars"), 4.8);
        assert_eq!(parse_rating("4.8/5"), 4.8);
        assert_eq!(parse_rating("-2"), -2.0);
        assert_eq!(parse_rating("1e1"), 10.0);
        assert_eq!(parse_rating("3."), 3.0);
        assert_eq!(parse_rating("n/a"), 0.0);
        assert_eq!(parse_rating(""), 0.0);
        assert_eq!(parse_rating("."), 0.0);
        assert_eq!(parse_rating("1e999"), 0.0);
    }

    #[test]
    fn description_is_not_mistaken_for_name() {
        assert_eq!(classify("Business Description").field, Field::Description);
        assert_eq!(classify("About the Company Name").field, Field::Description);
        assert_eq!(classify("Owner Name").field, Field::Name);
        assert!(classify("Owner Name").fuzzy);
    }

    #[test]
    fn socials_beat_website_fuzzy() {
        assert_eq!(classify("Facebook URL").field, Field::Facebook);
        assert_eq!(classify("X (Twitter) URL").field, Field::Twitter);
        assert_eq!(classify("Homepage URL").field, Field::Website);
    }

    #[test]
    fn substring_rules() {
        assert_eq!(classify("Postal Code").field, Field::Zip);
        assert_eq!(classify("Stars").field, Field::Rating);
        assert_eq!(classify("Services Offered").field, Field::Services);
        assert_eq!(classify("\"Location\"").field, Field::LocationLabel);
    }

    #[test]
    fn unknown_header_keeps_original_text() {
        assert_eq!(classify(" Years In Business ").field, Field::Extra(s!("Years In Business")));
    }

    #[test]
    fn wire_name_headers_do_not_become_clashing_extras() {
        assert_eq!(classify("id").field, Field::Extra(s!("csv:id")));
        assert_eq!(classify("locationLabel").field, Field::LocationLabel);

        let out = parse_listings("id,Company Name,City,State\n7,Ace Gutters,Austin,TX\n");
        let l = &out.listings[0];
        assert_eq!(l.id, "comp-1");
        assert_eq!(l.extra_text("csv:id").as_deref(), Some("7"));
        let back: Listing = serde_json::from_str(&serde_json::to_string(l).unwrap()).unwrap();
        assert_eq!(&back, l);
    }

    #[test]
    fn services_split_and_default() {
        assert_eq!(split_services("Repair; Guards , ,Cleaning"), strings!["Repair", "Guards", "Cleaning"]);
        assert_eq!(split_services(" ; "), default_services());
    }

    #[test]
    fn sample_parses_into_one_listing() {
        let out = parse_listings(sample_csv());
        assert_eq!(out.rows, 1);
        let l = &out.listings[0];
        assert_eq!(l.name, "LeafGuard Gutters");
        assert_eq!(l.location_label.as_deref(), Some("Hudson, Ohio, USA"));
        assert_eq!(l.twitter_url.as_deref(), Some(""));
    }
}
