//! Weather payload published by the companion under [`WEATHER_PATH`]
//!
//! Each key is optional. A missing key means "no update" for that field,
//! never "clear it".

use crate::datamap::{bounded, DataMap, Text};

pub use crate::datamap::DecodeError;

/// Well-known path the companion publishes weather on
pub const WEATHER_PATH: &str = "/WEATHER_PATH";

/// Today's high, preformatted by the companion (string)
pub const KEY_HIGH_TEMPERATURE: &str = "HIGH_TEMPERATURE";
/// Today's low, preformatted by the companion (string)
pub const KEY_LOW_TEMPERATURE: &str = "LOW_TEMPERATURE";
/// Weather condition code (integer)
pub const KEY_WEATHER_ID: &str = "WEATHER_ID";

/// How an update relates to the record it updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateKind {
    /// Push notification; carries only the fields that changed
    Partial,
    /// Result of an explicit fetch; the full current record
    Complete,
}

/// Decoded weather fields
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherUpdate {
    pub high_temperature: Option<Text>,
    pub low_temperature: Option<Text>,
    pub condition_code: Option<i32>,
    pub kind: UpdateKind,
}

impl WeatherUpdate {
    /// An update that carries nothing
    pub const fn empty(kind: UpdateKind) -> Self {
        Self {
            high_temperature: None,
            low_temperature: None,
            condition_code: None,
            kind,
        }
    }

    /// Decode the weather keys from a data map
    ///
    /// Unknown keys are ignored. A known key with the wrong value type
    /// rejects the whole update.
    pub fn from_data_map(map: &DataMap, kind: UpdateKind) -> Result<Self, DecodeError> {
        let text = |key| match map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_text()
                .ok_or(DecodeError::TypeMismatch)
                .and_then(bounded)
                .map(Some),
        };

        let condition_code = match map.get(KEY_WEATHER_ID) {
            None => None,
            Some(value) => Some(value.as_int().ok_or(DecodeError::TypeMismatch)?),
        };

        Ok(Self {
            high_temperature: text(KEY_HIGH_TEMPERATURE)?,
            low_temperature: text(KEY_LOW_TEMPERATURE)?,
            condition_code,
            kind,
        })
    }

    pub fn with_high(mut self, high: &str) -> Result<Self, DecodeError> {
        self.high_temperature = Some(bounded(high)?);
        Ok(self)
    }

    pub fn with_low(mut self, low: &str) -> Result<Self, DecodeError> {
        self.low_temperature = Some(bounded(low)?);
        Ok(self)
    }

    pub fn with_condition(mut self, code: i32) -> Self {
        self.condition_code = Some(code);
        self
    }

    /// True if no field is present
    pub fn is_empty(&self) -> bool {
        self.high_temperature.is_none()
            && self.low_temperature.is_none()
            && self.condition_code.is_none()
    }
}
