//! Weather snapshot store
//!
//! Written only by the sync channel, read only by the renderer. Both run on
//! the face's single execution context, so a read always sees a whole
//! update or none of it.

use sunshine_protocol::datamap::Text;
use sunshine_protocol::weather::{UpdateKind, WeatherUpdate};

use super::condition::WeatherIcon;

/// Last-known weather values; each field independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherSnapshot {
    pub high_temperature: Option<Text>,
    pub low_temperature: Option<Text>,
    pub condition_code: Option<i32>,
}

impl WeatherSnapshot {
    pub fn is_empty(&self) -> bool {
        self.high_temperature.is_none()
            && self.low_temperature.is_none()
            && self.condition_code.is_none()
    }

    /// Icon for the current condition, if one is known
    pub fn icon(&self) -> Option<WeatherIcon> {
        self.condition_code.map(WeatherIcon::from_condition_code)
    }
}

/// Holder of the current [`WeatherSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct WeatherStore {
    snapshot: WeatherSnapshot,
    revision: u32,
    received: bool,
}

impl WeatherStore {
    /// Empty store, nothing received yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a decoded update
    ///
    /// Partial updates merge present fields; complete updates replace the
    /// whole record. Returns true if the snapshot changed.
    pub fn apply(&mut self, update: &WeatherUpdate) -> bool {
        self.received = true;

        let next = match update.kind {
            UpdateKind::Complete => WeatherSnapshot {
                high_temperature: update.high_temperature.clone(),
                low_temperature: update.low_temperature.clone(),
                condition_code: update.condition_code,
            },
            UpdateKind::Partial => WeatherSnapshot {
                high_temperature: update
                    .high_temperature
                    .clone()
                    .or_else(|| self.snapshot.high_temperature.clone()),
                low_temperature: update
                    .low_temperature
                    .clone()
                    .or_else(|| self.snapshot.low_temperature.clone()),
                condition_code: update.condition_code.or(self.snapshot.condition_code),
            },
        };

        if next == self.snapshot {
            return false;
        }
        self.snapshot = next;
        self.revision = self.revision.wrapping_add(1);
        true
    }

    /// Copy of the current snapshot
    pub fn read(&self) -> WeatherSnapshot {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    /// Bumped on every change
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// True once any update was decoded, even one that changed nothing
    pub fn has_received(&self) -> bool {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full() -> WeatherUpdate {
        WeatherUpdate::empty(UpdateKind::Partial)
            .with_high("25")
            .unwrap()
            .with_low("16")
            .unwrap()
            .with_condition(800)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = WeatherStore::new();
        assert!(store.read().is_empty());
        assert!(!store.has_received());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_low_only_update_changes_only_low() {
        let mut store = WeatherStore::new();
        store.apply(&full());

        let low_only = WeatherUpdate::empty(UpdateKind::Partial)
            .with_low("12")
            .unwrap();
        assert!(store.apply(&low_only));

        let snap = store.read();
        assert_eq!(snap.high_temperature.as_deref(), Some("25"));
        assert_eq!(snap.low_temperature.as_deref(), Some("12"));
        assert_eq!(snap.condition_code, Some(800));
    }

    #[test]
    fn test_complete_update_replaces() {
        let mut store = WeatherStore::new();
        store.apply(&full());

        let complete = WeatherUpdate::empty(UpdateKind::Complete).with_condition(500);
        assert!(store.apply(&complete));

        let snap = store.read();
        assert_eq!(snap.high_temperature, None);
        assert_eq!(snap.low_temperature, None);
        assert_eq!(snap.icon(), Some(WeatherIcon::Rain));
    }

    #[test]
    fn test_identical_update_is_not_a_change() {
        let mut store = WeatherStore::new();
        assert!(store.apply(&full()));
        let rev = store.revision();

        assert!(!store.apply(&full()));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_empty_update_marks_received() {
        let mut store = WeatherStore::new();
        assert!(!store.apply(&WeatherUpdate::empty(UpdateKind::Partial)));
        assert!(store.has_received());
    }

    #[test]
    fn test_read_is_a_copy() {
        let mut store = WeatherStore::new();
        store.apply(&full());
        let before = store.read();

        store.apply(&WeatherUpdate::empty(UpdateKind::Partial).with_condition(200));
        assert_eq!(before.condition_code, Some(800));
    }

    fn partial_update() -> impl Strategy<Value = WeatherUpdate> {
        (
            proptest::option::of("[0-9]{1,3}"),
            proptest::option::of("[0-9]{1,3}"),
            proptest::option::of(any::<i32>()),
        )
            .prop_map(|(high, low, code)| {
                let mut update = WeatherUpdate::empty(UpdateKind::Partial);
                if let Some(h) = high {
                    update = update.with_high(&h).unwrap();
                }
                if let Some(l) = low {
                    update = update.with_low(&l).unwrap();
                }
                if let Some(c) = code {
                    update = update.with_condition(c);
                }
                update
            })
    }

    proptest! {
        #[test]
        fn test_absent_fields_keep_prior_value(
            updates in proptest::collection::vec(partial_update(), 0..32)
        ) {
            let mut store = WeatherStore::new();
            let mut expected = WeatherSnapshot::default();

            for update in &updates {
                store.apply(update);
                if update.high_temperature.is_some() {
                    expected.high_temperature = update.high_temperature.clone();
                }
                if update.low_temperature.is_some() {
                    expected.low_temperature = update.low_temperature.clone();
                }
                if update.condition_code.is_some() {
                    expected.condition_code = update.condition_code;
                }
                prop_assert_eq!(store.read(), expected.clone());
            }
        }
    }
}
