use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catalog::Catalog;
use crate::domain::content::{Content, ContentDraft};
use crate::domain::types::{
    ContentFormat, ContentId, ContentNotes, ContentStatus, CustomTitle, NetworkCode, ProductName,
    TypeConstraintError,
};
use crate::services::query::{ContentFilters, GridQuery};

/// Status choice that deletes the edited content instead of storing it.
pub const DELETE_SENTINEL: &str = "Eliminar";

/// Status choices offered by the content form: every resting state plus the
/// delete sentinel.
pub fn status_choices() -> Vec<&'static str> {
    ContentStatus::ALL
        .iter()
        .map(|status| status.as_str())
        .chain(std::iter::once(DELETE_SENTINEL))
        .collect()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Raw payload of the add/edit content modal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentForm {
    #[validate(length(min = 1))]
    pub product: String,
    #[serde(default)]
    pub custom_title: Option<String>,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&Content> for ContentForm {
    fn from(content: &Content) -> Self {
        Self {
            product: content.product.to_string(),
            custom_title: content.custom_title.as_ref().map(ToString::to_string),
            networks: content.networks.iter().map(ToString::to_string).collect(),
            format: content.format.map(Into::into),
            status: content.status.into(),
            notes: content.notes.as_ref().map(ToString::to_string),
        }
    }
}

/// What a submitted content form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    /// Create or update the content with these fields.
    Store(ContentDraft),
    /// Permanently delete the edited content.
    Delete,
}

#[derive(Debug, Error)]
pub enum ContentFormError {
    #[error("Content form validation failed: {0}")]
    Validation(String),
    #[error("Content form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ContentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ContentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ContentForm> for ContentAction {
    type Error = ContentFormError;

    fn try_from(value: ContentForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let status = value.status.trim();
        if status == DELETE_SENTINEL {
            return Ok(Self::Delete);
        }
        let status = if status.is_empty() {
            ContentStatus::default()
        } else {
            ContentStatus::try_from(status)?
        };

        let networks = value
            .networks
            .into_iter()
            .map(NetworkCode::new)
            .collect::<Result<Vec<_>, _>>()?;

        let draft = ContentDraft {
            product: ProductName::new(value.product)?,
            custom_title: blank_to_none(value.custom_title)
                .map(CustomTitle::new)
                .transpose()?,
            networks,
            format: blank_to_none(value.format)
                .map(ContentFormat::try_from)
                .transpose()?,
            status,
            notes: blank_to_none(value.notes).map(ContentNotes::new).transpose()?,
        };

        Ok(Self::Store(draft.dedup_networks()))
    }
}

/// Adds `code` to the selection, or removes it when already selected.
pub fn toggle_network(networks: &mut Vec<NetworkCode>, code: NetworkCode) {
    if let Some(position) = networks.iter().position(|selected| *selected == code) {
        networks.remove(position);
    } else {
        networks.push(code);
    }
}

/// Selects every catalog network, or clears the selection when all of them
/// are already selected.
pub fn toggle_all_networks(networks: &mut Vec<NetworkCode>, catalog: &Catalog) {
    let all = catalog.network_codes();
    if all.iter().all(|code| networks.contains(code)) {
        networks.clear();
    } else {
        *networks = all;
    }
}

/// Permanent delete request issued from the archive view.
#[derive(Deserialize, Validate)]
pub struct DeleteContentForm {
    #[validate(range(min = 1))]
    pub content_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContentFormPayload {
    pub content_id: ContentId,
}

impl TryFrom<DeleteContentForm> for DeleteContentFormPayload {
    type Error = ContentFormError;

    fn try_from(value: DeleteContentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            content_id: ContentId::new(value.content_id)?,
        })
    }
}

/// Filter bar of the grid. Empty values match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFilterForm {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub search: String,
}

impl TryFrom<ContentFilterForm> for GridQuery {
    type Error = ContentFormError;

    fn try_from(value: ContentFilterForm) -> Result<Self, Self::Error> {
        let mut filters = ContentFilters::default();
        if let Some(product) = blank_to_none(Some(value.product)) {
            filters = filters.product(ProductName::new(product)?);
        }
        if let Some(network) = blank_to_none(Some(value.network)) {
            filters = filters.network(NetworkCode::new(network)?);
        }
        if let Some(status) = blank_to_none(Some(value.status)) {
            filters = filters.status(ContentStatus::try_from(status)?);
        }
        Ok(GridQuery {
            filters,
            search: value.search.trim().to_string(),
        })
    }
}
