// src/listing.rs
//
// The listing record and the small amount of view state persisted next to it.
//
// Known columns are typed fields; anything else an upload carries lives in
// `extra` and is flattened back out on the wire under its original name.
// An extra key never equals a typed wire name, or the flattened object
// would carry the key twice and fail to load.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::consts::{DEFAULT_SERVICES, EXTRA_CLASH_PREFIX};
use crate::parse::{parse_rating, split_services};

/// Unrecognized columns, keyed by original header text. Values are JSON so
/// documents written by other clients (numbers, flags) still load.
pub type Extras = BTreeMap<String, Value>;

/// One business listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default = "default_services", deserialize_with = "services_or_default")]
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extras,
}

pub fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect()
}

fn services_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let list = Option::<Vec<String>>::deserialize(d)?.unwrap_or_default();
    let list: Vec<String> = list
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(if list.is_empty() { default_services() } else { list })
}

/// Wire names of the typed fields, in canonical column order.
pub const FIELD_NAMES: &[&str] = &[
    "id", "name", "address", "city", "state", "zip", "phone", "email", "website",
    "locationLabel", "rating", "services", "description",
    "facebookUrl", "instagramUrl", "linkedinUrl", "twitterUrl",
];

/// Key under which an extra column is stored: the header itself, or
/// `csv:<header>` when the header is a typed wire name such as `id`.
pub fn extra_key(header: &str) -> String {
    if FIELD_NAMES.contains(&header) {
        join!(EXTRA_CLASH_PREFIX, header)
    } else {
        s!(header)
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => s!(),
        other => other.to_string(),
    }
}

impl Listing {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: s!(),
            city: s!(),
            state: s!(),
            zip: s!(),
            phone: s!(),
            email: s!(),
            website: s!(),
            location_label: None,
            rating: None,
            services: default_services(),
            description: None,
            facebook_url: None,
            instagram_url: None,
            linkedin_url: None,
            twitter_url: None,
            extra: Extras::new(),
        }
    }

    /// Builder shorthand for city + state.
    pub fn located(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    /// Read a field by wire name; unknown names fall through to `extra`.
    pub fn field(&self, key: &str) -> Option<String> {
        let opt = |v: &Option<String>| v.clone();
        match key {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "address" => Some(self.address.clone()),
            "city" => Some(self.city.clone()),
            "state" => Some(self.state.clone()),
            "zip" => Some(self.zip.clone()),
            "phone" => Some(self.phone.clone()),
            "email" => Some(self.email.clone()),
            "website" => Some(self.website.clone()),
            "locationLabel" => opt(&self.location_label),
            "rating" => self.rating.map(|r| r.to_string()),
            "services" => Some(self.services.join("; ")),
            "description" => opt(&self.description),
            "facebookUrl" => opt(&self.facebook_url),
            "instagramUrl" => opt(&self.instagram_url),
            "linkedinUrl" => opt(&self.linkedin_url),
            "twitterUrl" => opt(&self.twitter_url),
            other => self.extra_text(other),
        }
    }

    /// Set a field by wire name from text, applying the same coercions as
    /// the upload parser. `id` is immutable and is ignored.
    /// Returns false only for the `id` attempt.
    pub fn set_field(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        let opt = || if value.is_empty() { None } else { Some(s!(value)) };
        match key {
            "id" => return false,
            "name" => self.name = s!(value),
            "address" => self.address = s!(value),
            "city" => self.city = s!(value),
            "state" => self.state = s!(value),
            "zip" => self.zip = s!(value),
            "phone" => self.phone = s!(value),
            "email" => self.email = s!(value),
            "website" => self.website = s!(value),
            "locationLabel" => self.location_label = opt(),
            "rating" => self.rating = Some(parse_rating(value)),
            "services" => self.services = split_services(value),
            "description" => self.description = opt(),
            "facebookUrl" => self.facebook_url = opt(),
            "instagramUrl" => self.instagram_url = opt(),
            "linkedinUrl" => self.linkedin_url = opt(),
            "twitterUrl" => self.twitter_url = opt(),
            other => self.set_extra(other, value),
        }
        true
    }

    /// Store a text extra column under `extra_key(header)`.
    pub fn set_extra(&mut self, header: &str, value: &str) {
        self.extra.insert(extra_key(header), Value::String(s!(value)));
    }

    /// Extra column as text; non-string JSON values are rendered as JSON.
    pub fn extra_text(&self, key: &str) -> Option<String> {
        self.extra.get(key).map(value_text)
    }

    /// Street address, else the free-text location label, else "city, state".
    pub fn display_location(&self) -> String {
        if !self.address.trim().is_empty() {
            return self.address.clone();
        }
        if let Some(label) = self.location_label.as_deref().filter(|l| !l.trim().is_empty()) {
            return s!(label);
        }
        match (self.city.trim(), self.state.trim()) {
            ("", st) => s!(st),
            (c, "") => s!(c),
            (c, st) => format!("{c}, {st}"),
        }
    }

    /// Restore invariants on records that came from outside the parser.
    pub fn normalize(&mut self) {
        self.services.retain(|s| !s.trim().is_empty());
        if self.services.is_empty() {
            self.services = default_services();
        }

        let clashing: Vec<String> = self
            .extra
            .keys()
            .filter(|k| FIELD_NAMES.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in clashing {
            if let Some(v) = self.extra.remove(&key) {
                self.extra.insert(extra_key(&key), v);
            }
        }
    }
}

/* ---------------- View state ---------------- */

/// Which screen the app was last showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewState {
    #[default]
    Upload,
    Directory,
    Profile,
}

impl ViewState {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewState::Upload => "UPLOAD",
            ViewState::Directory => "DIRECTORY",
            ViewState::Profile => "PROFILE",
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPLOAD" => Ok(ViewState::Upload),
            "DIRECTORY" => Ok(ViewState::Directory),
            "PROFILE" => Ok(ViewState::Profile),
            other => Err(format!("unknown view state: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_services_deserialize_to_defaults() {
        let l: Listing = serde_json::from_str(r#"{"id":"a","name":"A"}"#).unwrap();
        assert_eq!(l.services, default_services());
        assert_eq!(l.city, "");

        let l: Listing = serde_json::from_str(r#"{"id":"a","name":"A","services":[" "]}"#).unwrap();
        assert_eq!(l.services, default_services());
    }

    #[test]
    fn extras_flatten_on_the_wire() {
        let mut l = Listing::new("x1", "Ace");
        l.set_extra("Years In Business", "12");
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v["Years In Business"], "12");
        assert_eq!(v["name"], "Ace");

        let back: Listing = serde_json::from_value(v).unwrap();
        assert_eq!(back.extra_text("Years In Business").as_deref(), Some("12"));
    }

    #[test]
    fn non_string_extras_load_and_read_as_text() {
        let list: Vec<Listing> = serde_json::from_str(
            r#"[{"id":"a","name":"A","reviewCount":12,"verified":true,"owner":null}]"#,
        )
        .unwrap();
        assert_eq!(list[0].extra_text("reviewCount").as_deref(), Some("12"));
        assert_eq!(list[0].field("verified").as_deref(), Some("true"));
        assert_eq!(list[0].extra_text("owner").as_deref(), Some(""));

        let again: Vec<Listing> = serde_json::from_str(&serde_json::to_string(&list).unwrap()).unwrap();
        assert_eq!(again, list);
    }

    #[test]
    fn extra_keys_never_shadow_typed_fields() {
        assert_eq!(extra_key("id"), "csv:id");
        assert_eq!(extra_key("locationLabel"), "csv:locationLabel");
        assert_eq!(extra_key("ID"), "ID");

        let mut l = Listing::new("comp-1", "Ace");
        l.extra.insert(s!("id"), Value::from("7"));
        l.normalize();
        assert_eq!(l.extra_text("csv:id").as_deref(), Some("7"));

        let text = serde_json::to_string(&l).unwrap();
        let back: Listing = serde_json::from_str(&text).unwrap();
        assert_eq!(back.id, "comp-1");
    }

    #[test]
    fn set_field_coerces_and_protects_id() {
        let mut l = Listing::new("x1", "Ace");
        assert!(!l.set_field("id", "other"));
        assert_eq!(l.id, "x1");
        l.set_field("rating", "n/a");
        assert_eq!(l.rating, Some(0.0));
        l.set_field("services", "Repair; Guards,");
        assert_eq!(l.services, strings!["Repair", "Guards"]);
        l.set_field("Crew Size", "4");
        assert_eq!(l.field("Crew Size").as_deref(), Some("4"));
    }

    #[test]
    fn display_location_prefers_address_then_label() {
        let mut l = Listing::new("x1", "Ace").located("Austin", "TX");
        assert_eq!(l.display_location(), "Austin, TX");
        l.location_label = Some(s!("Austin, Texas, USA"));
        assert_eq!(l.display_location(), "Austin, Texas, USA");
        l.address = s!("1 Main St");
        assert_eq!(l.display_location(), "1 Main St");
    }

    #[test]
    fn view_state_wire_form() {
        assert_eq!(serde_json::to_string(&ViewState::Directory).unwrap(), "\"DIRECTORY\"");
        assert_eq!("profile".parse::<ViewState>(), Ok(ViewState::Profile));
    }
}
