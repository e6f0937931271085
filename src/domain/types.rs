//! Strongly-typed value objects used by domain entities.
//!
//! Content records carry these wrappers instead of raw strings so that ids,
//! product names, network codes and statuses are checked once at the
//! boundary and trusted everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A slot key did not follow the `YYYY-MM-DD_HH:MM` layout.
    #[error("invalid slot key: {0}")]
    InvalidSlotKey(String),
    /// A slot time was not a valid `HH:MM` value.
    #[error("invalid slot time: {0}")]
    InvalidSlotTime(String),
    /// A network code contained characters reserved by the storage format.
    #[error("invalid network code: {0}")]
    InvalidNetworkCode(String),
    /// A value is not part of the editorial catalog.
    #[error("unknown {0}: {1}")]
    UnknownCatalogEntry(&'static str, String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i64> for $name {
            fn eq(&self, other: &i64) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

id_newtype!(ContentId, "Unique identifier for a scheduled content item.", "content_id");

non_empty_string_newtype!(
    ProductName,
    "Name of an editorial product from the catalog.",
    "product"
);
non_empty_string_newtype!(
    CustomTitle,
    "Free-text title, or the featured person's name for needs-person products.",
    "custom title"
);
non_empty_string_newtype!(ContentNotes, "Free-text notes attached to a content item.", "notes");

/// Short code of a social network (`IG`, `FB`, ...).
///
/// Codes are stored comma-joined, so a comma is rejected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkCode(String);

impl NetworkCode {
    /// Trims, upper-cases and validates a network code.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "network")?;
        if trimmed.contains(',') || trimmed.chars().any(char::is_whitespace) {
            return Err(TypeConstraintError::InvalidNetworkCode(trimmed));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NetworkCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NetworkCode {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NetworkCode {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NetworkCode> for String {
    fn from(value: NetworkCode) -> Self {
        value.0
    }
}

impl PartialEq<&str> for NetworkCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Resting states of a content item.
///
/// The form-level `Eliminar` choice is not a state and never reaches this
/// type; see [`crate::forms::content::ContentAction`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ContentStatus {
    #[default]
    Programado,
    EnProduccion,
    Listo,
    Publicado,
    Archivado,
}

impl ContentStatus {
    /// Every resting state in display order.
    pub const ALL: [ContentStatus; 5] = [
        Self::Programado,
        Self::EnProduccion,
        Self::Listo,
        Self::Publicado,
        Self::Archivado,
    ];

    /// String representation used in persistence and forms.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Programado => "Programado",
            Self::EnProduccion => "En producción",
            Self::Listo => "Listo",
            Self::Publicado => "Publicado",
            Self::Archivado => "Archivado",
        }
    }

    pub const fn is_archived(self) -> bool {
        matches!(self, Self::Archivado)
    }
}

impl Display for ContentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ContentStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("content status: {value}")))
    }
}

impl TryFrom<String> for ContentStatus {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<ContentStatus> for String {
    fn from(value: ContentStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Publication format of a content item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ContentFormat {
    Post,
    Story,
    Reel,
    Carrusel,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 4] = [Self::Post, Self::Story, Self::Reel, Self::Carrusel];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "Post",
            Self::Story => "Story",
            Self::Reel => "Reel",
            Self::Carrusel => "Carrusel",
        }
    }
}

impl Display for ContentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ContentFormat {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("content format: {value}")))
    }
}

impl TryFrom<String> for ContentFormat {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<ContentFormat> for String {
    fn from(value: ContentFormat) -> Self {
        value.as_str().to_string()
    }
}
