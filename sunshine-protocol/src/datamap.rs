//! Flat key → value records exchanged with the companion
//!
//! A [`DataItem`] is what the companion publishes: a [`Path`] plus a small
//! [`DataMap`]. Keys are unique within a map. Both sides encode items with
//! `postcard`, so the wire layout follows the serde derive order below.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::frame::FrameError;

/// Longest accepted data path
pub const MAX_PATH_LEN: usize = 32;
/// Longest accepted map key
pub const MAX_KEY_LEN: usize = 24;
/// Longest accepted string value
pub const MAX_TEXT_LEN: usize = 24;
/// Entries per map
pub const MAX_ENTRIES: usize = 8;

/// Logical data path, e.g. `/WEATHER_PATH`
pub type Path = String<MAX_PATH_LEN>;
/// Map key
pub type Key = String<MAX_KEY_LEN>;
/// String value
pub type Text = String<MAX_TEXT_LEN>;

/// Errors that can occur while decoding link payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload bytes are not a valid encoding
    Malformed,
    /// A known key carries a value of the wrong type
    TypeMismatch,
    /// A string or collection exceeds its fixed capacity
    Capacity,
    /// Frame type is not a known message
    UnknownMessage(u8),
    /// Framing layer failure
    Frame(FrameError),
}

impl From<FrameError> for DecodeError {
    fn from(err: FrameError) -> Self {
        DecodeError::Frame(err)
    }
}

/// A single value in a [`DataMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataValue {
    Int(i32),
    Text(Text),
    Bool(bool),
}

impl DataValue {
    /// Build a text value, failing if it does not fit
    pub fn text(s: &str) -> Result<Self, DecodeError> {
        Ok(DataValue::Text(bounded(s)?))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            DataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct DataEntry {
    key: Key,
    value: DataValue,
}

type Entries = Vec<DataEntry, MAX_ENTRIES>;

/// Flat key → value map with unique keys
///
/// Decoding rejects a map that repeats a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Entries", try_from = "Entries")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataMap {
    entries: Entries,
}

impl From<DataMap> for Entries {
    fn from(map: DataMap) -> Self {
        map.entries
    }
}

impl TryFrom<Entries> for DataMap {
    type Error = &'static str;

    fn try_from(entries: Entries) -> Result<Self, Self::Error> {
        let map = DataMap { entries };
        for (i, (key, _)) in map.iter().enumerate() {
            if map.iter().take(i).any(|(earlier, _)| earlier == key) {
                return Err("duplicate key in data map");
            }
        }
        Ok(map)
    }
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value under `key`
    pub fn insert(&mut self, key: &str, value: DataValue) -> Result<(), DecodeError> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            return Ok(());
        }
        let key = bounded(key)?;
        self.entries
            .push(DataEntry { key, value })
            .map_err(|_| DecodeError::Capacity)
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }
}

/// A published record: path plus payload map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataItem {
    pub path: Path,
    pub map: DataMap,
}

impl DataItem {
    pub fn new(path: &str, map: DataMap) -> Result<Self, DecodeError> {
        Ok(Self {
            path: bounded(path)?,
            map,
        })
    }

    /// Encode into `buffer`, returning the used prefix
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], FrameError> {
        postcard::to_slice(self, buffer).map_err(|_| FrameError::BufferTooSmall)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        postcard::from_bytes(bytes).map_err(|_| DecodeError::Malformed)
    }
}

/// Copy `s` into a fixed-capacity string
pub fn bounded<const N: usize>(s: &str) -> Result<String<N>, DecodeError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| DecodeError::Capacity)?;
    Ok(out)
}
