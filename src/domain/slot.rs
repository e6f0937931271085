//! Slot addressing: the mapping between a grid cell and its storage key.
//!
//! A slot key has the textual form `YYYY-MM-DD_HH:MM`. Records that share a
//! cell with an existing occupant live under an overflow key, which is the
//! primary key followed by `_` and the record id. Membership of a slot is
//! decided by string prefix, so the textual layout is load-bearing.

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContentId, TypeConstraintError};

/// Separator between the date, time and discriminator parts of a key.
pub const KEY_SEPARATOR: char = '_';

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Time of day of a slot, at minute precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, TypeConstraintError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TypeConstraintError::InvalidSlotTime(format!("{hour}:{minute}")))
    }

    /// Parses a zero-padded `HH:MM` value.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let value = value.trim();
        if value.len() != 5 {
            return Err(TypeConstraintError::InvalidSlotTime(value.to_string()));
        }
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidSlotTime(value.to_string()))
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

}

impl Display for SlotTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl TryFrom<String> for SlotTime {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

/// A cell of the weekly grid. Never persisted; only used to compute keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotAddress {
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl SlotAddress {
    pub fn new(date: NaiveDate, time: SlotTime) -> Self {
        Self { date, time }
    }

    /// Primary storage key of this cell.
    pub fn key(&self) -> SlotKey {
        encode(self.date, self.time)
    }
}

/// Encoded slot address used as the lookup key of the content store.
///
/// Ordering and equality follow the textual key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    raw: String,
    address: SlotAddress,
}

/// Encodes a cell as `YYYY-MM-DD_HH:MM`.
pub fn encode(date: NaiveDate, time: SlotTime) -> SlotKey {
    SlotKey {
        raw: format!("{}{KEY_SEPARATOR}{time}", date.format(DATE_FORMAT)),
        address: SlotAddress { date, time },
    }
}

/// Decodes the date part of a key: everything before the first `_`.
pub fn decode(key: &str) -> Result<NaiveDate, TypeConstraintError> {
    let date = key
        .split_once(KEY_SEPARATOR)
        .map_or(key, |(date, _)| date);
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| TypeConstraintError::InvalidSlotKey(key.to_string()))
}

/// Keys of `keys` that are overflow entries of `primary`, ordered by their
/// discriminator.
///
/// This is a linear scan over every key; callers go through here so the scan
/// can be swapped for an index without touching them.
pub fn overflow_keys<'a, I>(primary: &SlotKey, keys: I) -> Vec<&'a SlotKey>
where
    I: IntoIterator<Item = &'a SlotKey>,
{
    let mut overflow: Vec<&SlotKey> = keys
        .into_iter()
        .filter(|key| key.is_overflow_of(primary))
        .collect();
    overflow.sort_by(|a, b| discriminator_order(a).cmp(&discriminator_order(b)));
    overflow
}

/// Numeric ids first, by value; a `_n` suffix after the id breaks ties.
/// Foreign discriminators sort last.
fn discriminator_order(key: &SlotKey) -> (bool, Option<i64>, &str) {
    let discriminator = key.discriminator().unwrap_or_default();
    let id = discriminator
        .split(KEY_SEPARATOR)
        .next()
        .and_then(|id| id.parse::<i64>().ok());
    (id.is_none(), id, discriminator)
}

impl SlotKey {
    /// Overflow key for `id` in the cell at `address`.
    pub fn overflow(address: &SlotAddress, id: ContentId) -> Self {
        Self {
            raw: format!("{}{KEY_SEPARATOR}{id}", address.key()),
            address: *address,
        }
    }

    /// Overflow key for `id`, disambiguated with `_<attempt>` when `attempt`
    /// is non-zero.
    pub fn overflow_candidate(address: &SlotAddress, id: ContentId, attempt: u32) -> Self {
        if attempt == 0 {
            return Self::overflow(address, id);
        }
        Self {
            raw: format!("{}{KEY_SEPARATOR}{id}{KEY_SEPARATOR}{attempt}", address.key()),
            address: *address,
        }
    }

    /// Validates a stored key. The date and time parts must be in canonical
    /// zero-padded form; anything after the time is an opaque discriminator.
    pub fn parse<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = value.into();
        let invalid = || TypeConstraintError::InvalidSlotKey(raw.clone());

        let mut parts = raw.splitn(3, KEY_SEPARATOR);
        let date_part = parts.next().unwrap_or_default();
        let time_part = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some_and(str::is_empty) {
            return Err(invalid());
        }

        let date = decode(&raw)?;
        if date.format(DATE_FORMAT).to_string() != date_part {
            return Err(invalid());
        }
        let time = SlotTime::parse(time_part).map_err(|_| invalid())?;

        Ok(Self {
            address: SlotAddress { date, time },
            raw,
        })
    }

    /// Calendar date the key belongs to.
    pub fn date(&self) -> NaiveDate {
        self.address.date
    }

    /// Cell the key belongs to, ignoring any overflow discriminator.
    pub fn address(&self) -> SlotAddress {
        self.address
    }

    /// Overflow discriminator, if this is not a primary key.
    pub fn discriminator(&self) -> Option<&str> {
        self.raw.splitn(3, KEY_SEPARATOR).nth(2)
    }

    pub fn is_primary(&self) -> bool {
        self.discriminator().is_none()
    }

    /// Primary key of the cell this key belongs to.
    pub fn primary(&self) -> SlotKey {
        self.address.key()
    }

    /// `true` when this key namespaces an extra occupant of `primary`.
    pub fn is_overflow_of(&self, primary: &SlotKey) -> bool {
        self.raw
            .strip_prefix(primary.as_str())
            .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR) && rest.len() > 1)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl Display for SlotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl AsRef<str> for SlotKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for SlotKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for SlotKey {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SlotKey> for String {
    fn from(value: SlotKey) -> Self {
        value.raw
    }
}

impl PartialEq<&str> for SlotKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
