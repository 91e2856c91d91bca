//! Companion data sync channel
//!
//! The channel never performs I/O itself. Every operation returns the
//! [`LinkCommand`]s the caller must send, and incoming companion messages
//! are fed back in as [`LinkEvent`]s.
//!
//! Connection lifecycle:
//! ```text
//! Disconnected --open--> Connecting --Connected--> Connected
//!      ^                     |                        |
//!      +--- ConnectFailed ---+------ close/Suspended -+
//! ```
//! There is no automatic retry; the next visibility change re-dials.

use heapless::Vec;

use sunshine_protocol::datamap::{DataItem, DecodeError, Path};
use sunshine_protocol::messages::{CompanionMessage, SuspendCause, WatchMessage};
use sunshine_protocol::weather::{UpdateKind, WeatherUpdate, WEATHER_PATH};

use crate::weather::WeatherStore;

/// Commands returned by one sync operation
pub const MAX_COMMANDS: usize = 4;

/// Connection handle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Outbound request toward the companion, always on the weather path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkCommand {
    Connect,
    Subscribe,
    Fetch,
    Unsubscribe,
    Disconnect,
}

impl LinkCommand {
    /// Wire message for this command
    pub fn to_message(self) -> Result<WatchMessage, DecodeError> {
        match self {
            LinkCommand::Connect => Ok(WatchMessage::Connect),
            LinkCommand::Disconnect => Ok(WatchMessage::Disconnect),
            LinkCommand::Subscribe => WatchMessage::subscribe(WEATHER_PATH),
            LinkCommand::Unsubscribe => WatchMessage::unsubscribe(WEATHER_PATH),
            LinkCommand::Fetch => WatchMessage::fetch(WEATHER_PATH),
        }
    }
}

/// Inbound notification from the companion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Connected,
    ConnectFailed,
    Suspended(SuspendCause),
    DataChanged(DataItem),
    DataDeleted(Path),
    FetchResult(Option<DataItem>),
}

impl LinkEvent {
    /// Split a companion message into a sync event
    ///
    /// Returns `None` for messages the channel does not handle (time sync).
    pub fn from_message(msg: CompanionMessage) -> Option<Self> {
        match msg {
            CompanionMessage::Connected => Some(LinkEvent::Connected),
            CompanionMessage::ConnectFailed => Some(LinkEvent::ConnectFailed),
            CompanionMessage::Suspended { cause } => Some(LinkEvent::Suspended(cause)),
            CompanionMessage::DataChanged(item) => Some(LinkEvent::DataChanged(item)),
            CompanionMessage::DataDeleted { path } => Some(LinkEvent::DataDeleted(path)),
            CompanionMessage::FetchResult(item) => Some(LinkEvent::FetchResult(item)),
            CompanionMessage::TimeSync { .. } => None,
        }
    }
}

/// Something the caller should log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// Payload on the weather path could not be decoded; store unchanged
    DroppedPayload(DecodeError),
    /// Event for a path other than the weather path
    ForeignPath,
    /// Data event while not connected
    NotConnected,
    ConnectFailed,
    Suspended(SuspendCause),
    /// Fetch result superseded by a newer push, or unsolicited
    StaleFetch,
    /// Companion reports nothing stored yet
    NothingStored,
    /// Companion deleted the weather record; last values kept
    DeletedIgnored,
    /// Connection completed after teardown; disconnecting
    LateConnect,
}

/// Result of a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncOutcome {
    /// Requests to send, in order
    pub commands: Vec<LinkCommand, MAX_COMMANDS>,
    /// Store contents changed
    pub changed: bool,
    pub notice: Option<Notice>,
}

impl SyncOutcome {
    fn command(cmd: LinkCommand) -> Self {
        let mut outcome = Self::default();
        outcome.push(cmd);
        outcome
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    fn push(&mut self, cmd: LinkCommand) {
        // No operation emits more than MAX_COMMANDS
        let _ = self.commands.push(cmd);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    Idle,
    /// Fetch in flight; tracks fields already written by pushes since
    Pending(PushedFields),
}

/// Weather fields set by pushes while a fetch was in flight
///
/// The fetched record is older than those pushes, so it only fills the
/// remaining fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PushedFields {
    high: bool,
    low: bool,
    condition: bool,
}

impl PushedFields {
    fn record(&mut self, update: &WeatherUpdate) {
        self.high |= update.high_temperature.is_some();
        self.low |= update.low_temperature.is_some();
        self.condition |= update.condition_code.is_some();
    }

    fn any(&self) -> bool {
        self.high || self.low || self.condition
    }

    /// Drop pushed fields from a fetched record
    fn mask(&self, mut fetched: WeatherUpdate) -> WeatherUpdate {
        if !self.any() {
            return fetched;
        }
        if self.high {
            fetched.high_temperature = None;
        }
        if self.low {
            fetched.low_temperature = None;
        }
        if self.condition {
            fetched.condition_code = None;
        }
        fetched.kind = UpdateKind::Partial;
        fetched
    }
}

/// Sync channel toward the companion data service
#[derive(Debug, Clone)]
pub struct DataSyncChannel {
    state: ConnectionState,
    subscribed: bool,
    fetch: FetchState,
}

impl Default for DataSyncChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSyncChannel {
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            subscribed: false,
            fetch: FetchState::Idle,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Begin connecting (face became visible)
    pub fn open(&mut self) -> SyncOutcome {
        match self.state {
            ConnectionState::Disconnected => {
                self.state = ConnectionState::Connecting;
                SyncOutcome::command(LinkCommand::Connect)
            }
            _ => SyncOutcome::default(),
        }
    }

    /// Tear the connection down (face became invisible or destroyed)
    ///
    /// Also abandons an in-flight connect.
    pub fn close(&mut self) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        if self.subscribed {
            outcome.push(LinkCommand::Unsubscribe);
        }
        if self.state != ConnectionState::Disconnected {
            outcome.push(LinkCommand::Disconnect);
        }
        self.reset();
        outcome
    }

    /// Handle a notification from the companion
    pub fn handle(&mut self, event: LinkEvent, store: &mut WeatherStore) -> SyncOutcome {
        match event {
            LinkEvent::Connected => self.on_connected(store),
            LinkEvent::ConnectFailed => {
                self.reset();
                SyncOutcome::notice(Notice::ConnectFailed)
            }
            LinkEvent::Suspended(cause) => {
                self.reset();
                SyncOutcome::notice(Notice::Suspended(cause))
            }
            LinkEvent::DataChanged(item) => {
                if let Err(notice) = self.check_data_event(&item.path) {
                    return SyncOutcome::notice(notice);
                }
                let update = match WeatherUpdate::from_data_map(&item.map, UpdateKind::Partial) {
                    Ok(update) => update,
                    Err(err) => return SyncOutcome::notice(Notice::DroppedPayload(err)),
                };
                // Nothing to merge; also must not count as received
                if update.is_empty() {
                    return SyncOutcome::default();
                }
                if let FetchState::Pending(pushed) = &mut self.fetch {
                    pushed.record(&update);
                }
                SyncOutcome {
                    changed: store.apply(&update),
                    ..SyncOutcome::default()
                }
            }
            LinkEvent::DataDeleted(path) => match self.check_data_event(&path) {
                Err(notice) => SyncOutcome::notice(notice),
                Ok(()) => SyncOutcome::notice(Notice::DeletedIgnored),
            },
            LinkEvent::FetchResult(item) => self.on_fetch_result(item, store),
        }
    }

    fn on_connected(&mut self, store: &WeatherStore) -> SyncOutcome {
        match self.state {
            ConnectionState::Connecting => {
                self.state = ConnectionState::Connected;
                self.subscribed = true;
                let mut outcome = SyncOutcome::command(LinkCommand::Subscribe);
                if !store.has_received() {
                    self.fetch = FetchState::Pending(PushedFields::default());
                    outcome.push(LinkCommand::Fetch);
                }
                outcome
            }
            // Duplicate notification
            ConnectionState::Connected => SyncOutcome::default(),
            ConnectionState::Disconnected => {
                let mut outcome = SyncOutcome::command(LinkCommand::Disconnect);
                outcome.notice = Some(Notice::LateConnect);
                outcome
            }
        }
    }

    fn on_fetch_result(&mut self, item: Option<DataItem>, store: &mut WeatherStore) -> SyncOutcome {
        if self.state != ConnectionState::Connected {
            return SyncOutcome::notice(Notice::NotConnected);
        }

        let pushed = match core::mem::replace(&mut self.fetch, FetchState::Idle) {
            FetchState::Pending(pushed) => pushed,
            FetchState::Idle => return SyncOutcome::notice(Notice::StaleFetch),
        };

        let item = match item {
            None => return SyncOutcome::notice(Notice::NothingStored),
            Some(item) if item.path != WEATHER_PATH => {
                return SyncOutcome::notice(Notice::ForeignPath)
            }
            Some(item) => item,
        };

        let fetched = match WeatherUpdate::from_data_map(&item.map, UpdateKind::Complete) {
            Ok(update) => pushed.mask(update),
            Err(err) => return SyncOutcome::notice(Notice::DroppedPayload(err)),
        };
        if pushed.any() && fetched.is_empty() {
            return SyncOutcome::notice(Notice::StaleFetch);
        }
        SyncOutcome {
            changed: store.apply(&fetched),
            ..SyncOutcome::default()
        }
    }

    fn check_data_event(&self, path: &Path) -> Result<(), Notice> {
        if self.state != ConnectionState::Connected || !self.subscribed {
            return Err(Notice::NotConnected);
        }
        if path != WEATHER_PATH {
            return Err(Notice::ForeignPath);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.subscribed = false;
        self.fetch = FetchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunshine_protocol::datamap::{DataMap, DataValue};

    fn item(path: &str, entries: &[(&str, DataValue)]) -> DataItem {
        let mut map = DataMap::new();
        for (k, v) in entries {
            map.insert(k, v.clone()).unwrap();
        }
        DataItem::new(path, map).unwrap()
    }

    fn weather(high: &str, low: &str, code: i32) -> DataItem {
        item(
            WEATHER_PATH,
            &[
                ("HIGH_TEMPERATURE", DataValue::text(high).unwrap()),
                ("LOW_TEMPERATURE", DataValue::text(low).unwrap()),
                ("WEATHER_ID", DataValue::Int(code)),
            ],
        )
    }

    fn connected(store: &mut WeatherStore) -> DataSyncChannel {
        let mut channel = DataSyncChannel::new();
        channel.open();
        channel.handle(LinkEvent::Connected, store);
        channel
    }

    #[test]
    fn test_open_connects_once() {
        let mut channel = DataSyncChannel::new();
        assert_eq!(channel.open().commands.as_slice(), &[LinkCommand::Connect]);
        assert_eq!(channel.state(), ConnectionState::Connecting);
        assert!(channel.open().commands.is_empty());
    }

    #[test]
    fn test_connected_subscribes_and_fetches_when_empty() {
        let mut store = WeatherStore::new();
        let mut channel = DataSyncChannel::new();
        channel.open();

        let outcome = channel.handle(LinkEvent::Connected, &mut store);
        assert_eq!(
            outcome.commands.as_slice(),
            &[LinkCommand::Subscribe, LinkCommand::Fetch]
        );
        assert_eq!(channel.state(), ConnectionState::Connected);
        assert!(channel.is_subscribed());
    }

    #[test]
    fn test_connected_skips_fetch_when_data_known() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        channel.handle(LinkEvent::DataChanged(weather("25", "16", 800)), &mut store);
        channel.close();

        channel.open();
        let outcome = channel.handle(LinkEvent::Connected, &mut store);
        assert_eq!(outcome.commands.as_slice(), &[LinkCommand::Subscribe]);
    }

    #[test]
    fn test_close_unsubscribes_then_disconnects() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let outcome = channel.close();
        assert_eq!(
            outcome.commands.as_slice(),
            &[LinkCommand::Unsubscribe, LinkCommand::Disconnect]
        );
        assert_eq!(channel.state(), ConnectionState::Disconnected);
        assert!(channel.close().commands.is_empty());
    }

    #[test]
    fn test_close_while_connecting_cancels() {
        let mut channel = DataSyncChannel::new();
        channel.open();
        assert_eq!(
            channel.close().commands.as_slice(),
            &[LinkCommand::Disconnect]
        );
    }

    #[test]
    fn test_late_connect_is_disconnected() {
        let mut store = WeatherStore::new();
        let mut channel = DataSyncChannel::new();
        channel.open();
        channel.close();

        let outcome = channel.handle(LinkEvent::Connected, &mut store);
        assert_eq!(outcome.commands.as_slice(), &[LinkCommand::Disconnect]);
        assert_eq!(outcome.notice, Some(Notice::LateConnect));
        assert_eq!(channel.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_data_changed_applies() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let outcome = channel.handle(LinkEvent::DataChanged(weather("25", "16", 200)), &mut store);
        assert!(outcome.changed);
        assert_eq!(store.snapshot().condition_code, Some(200));
    }

    #[test]
    fn test_foreign_path_ignored() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let other = item("/OTHER", &[("WEATHER_ID", DataValue::Int(200))]);
        let outcome = channel.handle(LinkEvent::DataChanged(other), &mut store);
        assert_eq!(outcome.notice, Some(Notice::ForeignPath));
        assert!(!outcome.changed);
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_malformed_payload_keeps_prior_values() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        channel.handle(LinkEvent::DataChanged(weather("25", "16", 800)), &mut store);

        let bad = item(
            WEATHER_PATH,
            &[
                ("LOW_TEMPERATURE", DataValue::text("3").unwrap()),
                ("WEATHER_ID", DataValue::text("rain").unwrap()),
            ],
        );
        let outcome = channel.handle(LinkEvent::DataChanged(bad), &mut store);

        assert_eq!(
            outcome.notice,
            Some(Notice::DroppedPayload(DecodeError::TypeMismatch))
        );
        assert_eq!(store.snapshot().low_temperature.as_deref(), Some("16"));
        assert_eq!(store.snapshot().condition_code, Some(800));
    }

    #[test]
    fn test_data_while_disconnected_dropped() {
        let mut store = WeatherStore::new();
        let mut channel = DataSyncChannel::new();
        let outcome = channel.handle(LinkEvent::DataChanged(weather("1", "2", 800)), &mut store);
        assert_eq!(outcome.notice, Some(Notice::NotConnected));
        assert!(!store.has_received());
    }

    #[test]
    fn test_fetch_result_replaces() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let fetched = item(WEATHER_PATH, &[("HIGH_TEMPERATURE", DataValue::text("30").unwrap())]);
        let outcome = channel.handle(LinkEvent::FetchResult(Some(fetched)), &mut store);
        assert!(outcome.changed);
        assert_eq!(store.snapshot().high_temperature.as_deref(), Some("30"));
        assert_eq!(store.snapshot().low_temperature, None);
    }

    #[test]
    fn test_undecodable_push_keeps_fetch_pending() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let bad = item(WEATHER_PATH, &[("WEATHER_ID", DataValue::text("rain").unwrap())]);
        let outcome = channel.handle(LinkEvent::DataChanged(bad), &mut store);
        assert_eq!(
            outcome.notice,
            Some(Notice::DroppedPayload(DecodeError::TypeMismatch))
        );

        let outcome = channel.handle(LinkEvent::FetchResult(Some(weather("25", "16", 800))), &mut store);
        assert!(outcome.changed);
        assert_eq!(outcome.notice, None);
        assert_eq!(store.snapshot().high_temperature.as_deref(), Some("25"));
        assert_eq!(store.snapshot().condition_code, Some(800));
    }

    #[test]
    fn test_empty_push_keeps_fetch_pending() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let empty = item(WEATHER_PATH, &[("HUMIDITY", DataValue::Int(40))]);
        let outcome = channel.handle(LinkEvent::DataChanged(empty), &mut store);
        assert!(!outcome.changed);
        assert!(!store.has_received());

        let outcome = channel.handle(LinkEvent::FetchResult(Some(weather("25", "16", 800))), &mut store);
        assert!(outcome.changed);
        assert!(!store.read().is_empty());
    }

    #[test]
    fn test_fetch_fills_fields_not_pushed() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let low = item(WEATHER_PATH, &[("LOW_TEMPERATURE", DataValue::text("12").unwrap())]);
        channel.handle(LinkEvent::DataChanged(low), &mut store);

        let outcome = channel.handle(LinkEvent::FetchResult(Some(weather("25", "16", 800))), &mut store);
        assert!(outcome.changed);
        assert_eq!(outcome.notice, None);

        let snapshot = store.read();
        assert_eq!(snapshot.high_temperature.as_deref(), Some("25"));
        assert_eq!(snapshot.low_temperature.as_deref(), Some("12"));
        assert_eq!(snapshot.condition_code, Some(800));
    }

    #[test]
    fn test_unsolicited_fetch_is_stale() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        channel.handle(LinkEvent::FetchResult(None), &mut store);

        let outcome = channel.handle(LinkEvent::FetchResult(Some(weather("1", "2", 500))), &mut store);
        assert_eq!(outcome.notice, Some(Notice::StaleFetch));
        assert!(!store.has_received());
    }

    #[test]
    fn test_fetch_after_full_push_is_stale() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        channel.handle(LinkEvent::DataChanged(weather("25", "16", 800)), &mut store);

        let old = weather("20", "10", 500);
        let outcome = channel.handle(LinkEvent::FetchResult(Some(old)), &mut store);
        assert_eq!(outcome.notice, Some(Notice::StaleFetch));
        assert_eq!(store.snapshot().condition_code, Some(800));
    }

    #[test]
    fn test_empty_fetch_result() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        let outcome = channel.handle(LinkEvent::FetchResult(None), &mut store);
        assert_eq!(outcome.notice, Some(Notice::NothingStored));
        assert!(!outcome.changed);
    }

    #[test]
    fn test_deleted_keeps_values() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);
        channel.handle(LinkEvent::DataChanged(weather("25", "16", 800)), &mut store);

        let path = item(WEATHER_PATH, &[]).path;
        let outcome = channel.handle(LinkEvent::DataDeleted(path), &mut store);
        assert_eq!(outcome.notice, Some(Notice::DeletedIgnored));
        assert_eq!(store.snapshot().high_temperature.as_deref(), Some("25"));
    }

    #[test]
    fn test_suspension_is_not_redialled() {
        let mut store = WeatherStore::new();
        let mut channel = connected(&mut store);

        let outcome = channel.handle(LinkEvent::Suspended(SuspendCause::NetworkLost), &mut store);
        assert!(outcome.commands.is_empty());
        assert_eq!(
            outcome.notice,
            Some(Notice::Suspended(SuspendCause::NetworkLost))
        );
        assert_eq!(channel.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connect_failed() {
        let mut store = WeatherStore::new();
        let mut channel = DataSyncChannel::new();
        channel.open();
        let outcome = channel.handle(LinkEvent::ConnectFailed, &mut store);
        assert!(outcome.commands.is_empty());
        assert_eq!(channel.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_commands_map_to_weather_path() {
        assert_eq!(
            LinkCommand::Subscribe.to_message().unwrap(),
            WatchMessage::subscribe(WEATHER_PATH).unwrap()
        );
        assert_eq!(
            LinkCommand::Disconnect.to_message().unwrap(),
            WatchMessage::Disconnect
        );
    }

    #[test]
    fn test_time_sync_is_not_a_link_event() {
        let msg = CompanionMessage::TimeSync {
            epoch_ms: 0,
            utc_offset_minutes: 0,
        };
        assert_eq!(LinkEvent::from_message(msg), None);
    }
}
