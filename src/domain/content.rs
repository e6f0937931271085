use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::slot::SlotKey;
use crate::domain::types::{
    ContentFormat, ContentId, ContentNotes, ContentStatus, CustomTitle, NetworkCode, ProductName,
};

/// A scheduled (or archived) piece of content occupying one grid slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    /// Encoded slot address; changes only through relocation.
    pub slot_key: SlotKey,
    pub product: ProductName,
    pub custom_title: Option<CustomTitle>,
    /// Display order is kept; duplicates carry no meaning.
    pub networks: Vec<NetworkCode>,
    pub format: Option<ContentFormat>,
    pub status: ContentStatus,
    pub notes: Option<ContentNotes>,
    pub created_at: NaiveDateTime,
    /// Set while the content is archived.
    pub archived_at: Option<NaiveDateTime>,
}

impl Content {
    pub fn is_archived(&self) -> bool {
        self.status.is_archived()
    }

    pub fn has_network(&self, code: &NetworkCode) -> bool {
        self.networks.contains(code)
    }
}

/// User-editable fields of a [`Content`], as submitted from the content form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub product: ProductName,
    pub custom_title: Option<CustomTitle>,
    pub networks: Vec<NetworkCode>,
    pub format: Option<ContentFormat>,
    pub status: ContentStatus,
    pub notes: Option<ContentNotes>,
}

impl ContentDraft {
    pub fn new(product: ProductName) -> Self {
        Self {
            product,
            custom_title: None,
            networks: Vec::new(),
            format: None,
            status: ContentStatus::default(),
            notes: None,
        }
    }

    /// Drops repeated network codes, keeping the first occurrence.
    pub fn dedup_networks(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.networks.len());
        self.networks.retain(|code| {
            if seen.contains(code) {
                false
            } else {
                seen.push(code.clone());
                true
            }
        });
        self
    }
}
