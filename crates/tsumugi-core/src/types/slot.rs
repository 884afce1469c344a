use std::fmt;

use serde::{Deserialize, Serialize};

use super::segment::CreditSegment;

/// The three editable fields of an artist credit slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotField {
    /// Artist search box / identifier.
    Artist,
    /// "Artist in this credit" name.
    CreditedAs,
    /// Join phrase after this artist.
    JoinPhrase,
}

impl SlotField {
    /// All fields, in the order they are written.
    pub const ALL: [SlotField; 3] = [Self::Artist, Self::CreditedAs, Self::JoinPhrase];

    /// Picks this field's value out of a segment.
    #[must_use]
    pub fn of(self, segment: &CreditSegment) -> Option<&str> {
        match self {
            Self::Artist => Some(segment.artist.as_str()),
            Self::CreditedAs => segment.credited_as.as_deref(),
            Self::JoinPhrase => segment.join_phrase.as_deref(),
        }
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artist => write!(f, "artist"),
            Self::CreditedAs => write!(f, "credited-as"),
            Self::JoinPhrase => write!(f, "join-phrase"),
        }
    }
}

/// Snapshot of the text currently held by one slot.
///
/// Fields the host has no value for read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValues {
    pub artist: String,
    pub credited_as: String,
    pub join_phrase: String,
}

impl SlotValues {
    /// Returns the value of a single field.
    #[must_use]
    pub fn get(&self, field: SlotField) -> &str {
        match field {
            SlotField::Artist => &self.artist,
            SlotField::CreditedAs => &self.credited_as,
            SlotField::JoinPhrase => &self.join_phrase,
        }
    }

    /// Mutable access to a single field.
    pub fn get_mut(&mut self, field: SlotField) -> &mut String {
        match field {
            SlotField::Artist => &mut self.artist,
            SlotField::CreditedAs => &mut self.credited_as,
            SlotField::JoinPhrase => &mut self.join_phrase,
        }
    }
}

impl From<SlotValues> for CreditSegment {
    /// Every field is surfaced, empty ones as `Some("")`.
    fn from(values: SlotValues) -> Self {
        Self {
            artist: values.artist,
            credited_as: Some(values.credited_as),
            join_phrase: Some(values.join_phrase),
        }
    }
}

/// Python-style slot index: `0` is the first slot, `-1` the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotIndex(pub isize);

impl SlotIndex {
    /// The last slot.
    pub const LAST: SlotIndex = SlotIndex(-1);

    /// Resolves against a collection of `len` slots.
    ///
    /// Returns `None` when the index falls outside the collection.
    #[must_use]
    pub fn resolve(self, len: usize) -> Option<usize> {
        if self.0 >= 0 {
            let idx = self.0.unsigned_abs();
            (idx < len).then_some(idx)
        } else {
            len.checked_sub(self.0.unsigned_abs())
        }
    }
}

impl From<isize> for SlotIndex {
    fn from(index: isize) -> Self {
        Self(index)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
