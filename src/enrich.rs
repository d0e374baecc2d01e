// src/enrich.rs
//
// Optional enrichment collaborator. Whatever generates the text lives
// outside this crate; we only define the seam and how its patch merges in.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::listing::Listing;

/// Partial update an enricher may return. Only these two fields are accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EnrichmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
}

impl EnrichmentPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.services.is_none()
    }

    /// Type-check a loose JSON object. A field of the wrong shape is dropped;
    /// the other one still applies. Content itself is not validated.
    pub fn from_json(value: &Value) -> Self {
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .map(String::from);

        let services = value.get("services").and_then(Value::as_array).and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<String>>>()
        });

        Self { description, services }
    }

    /// `from_json` over raw text; unparseable text is an empty patch.
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str::<Value>(text)
            .map(|v| Self::from_json(&v))
            .unwrap_or_default()
    }
}

impl Listing {
    /// Additive merge: blank description and empty/blank service lists are ignored.
    /// Returns whether anything changed.
    pub fn apply_patch(&mut self, patch: EnrichmentPatch) -> bool {
        let mut changed = false;
        if let Some(desc) = patch.description.filter(|d| !d.trim().is_empty()) {
            self.description = Some(desc);
            changed = true;
        }
        if let Some(services) = patch.services {
            let services: Vec<String> = services
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !services.is_empty() {
                self.services = services;
                changed = true;
            }
        }
        changed
    }
}

#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, listing: &Listing) -> Result<EnrichmentPatch>;
}
