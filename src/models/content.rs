use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::content::Content as DomainContent;
use crate::domain::slot::SlotKey;
use crate::domain::types::{
    ContentFormat, ContentNotes, ContentStatus, CustomTitle, NetworkCode, ProductName,
    TypeConstraintError,
};

const NETWORK_SEPARATOR: char = ',';

/// Diesel model representing the `grilla_content` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::grilla_content)]
pub struct Content {
    pub id: i64,
    pub date_key: String,
    pub product: String,
    pub custom_title: Option<String>,
    /// Comma-joined network codes.
    pub networks: String,
    pub format: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub archived_at: Option<NaiveDateTime>,
}

/// Insertable/patchable form of [`Content`]. `None` clears the column.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::grilla_content, treat_none_as_null = true)]
pub struct UpsertContent {
    pub id: i64,
    pub date_key: String,
    pub product: String,
    pub custom_title: Option<String>,
    pub networks: String,
    pub format: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub archived_at: Option<NaiveDateTime>,
}

impl TryFrom<Content> for DomainContent {
    type Error = TypeConstraintError;

    fn try_from(content: Content) -> Result<Self, Self::Error> {
        let networks = content
            .networks
            .split(NETWORK_SEPARATOR)
            .filter(|code| !code.trim().is_empty())
            .map(NetworkCode::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: content.id.try_into()?,
            slot_key: SlotKey::parse(content.date_key)?,
            product: ProductName::new(content.product)?,
            custom_title: non_blank(content.custom_title).map(CustomTitle::new).transpose()?,
            networks,
            format: non_blank(content.format)
                .map(ContentFormat::try_from)
                .transpose()?,
            status: ContentStatus::try_from(content.status)?,
            notes: non_blank(content.notes).map(ContentNotes::new).transpose()?,
            created_at: content.created_at,
            archived_at: content.archived_at,
        })
    }
}

impl From<&DomainContent> for UpsertContent {
    fn from(content: &DomainContent) -> Self {
        Self {
            id: content.id.get(),
            date_key: content.slot_key.as_str().to_string(),
            product: content.product.as_str().to_string(),
            custom_title: content.custom_title.clone().map(Into::into),
            networks: content
                .networks
                .iter()
                .map(NetworkCode::as_str)
                .collect::<Vec<_>>()
                .join(","),
            format: content.format.map(Into::into),
            status: content.status.into(),
            notes: content.notes.clone().map(Into::into),
            created_at: content.created_at,
            archived_at: content.archived_at,
        }
    }
}

/// Older rows store empty strings instead of NULL for unset text fields.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
