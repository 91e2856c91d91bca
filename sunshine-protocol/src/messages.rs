//! Message types for the companion link
//!
//! Message types are divided into two categories:
//! - Watch → Companion: connection control, subscriptions, fetch requests
//! - Companion → Watch: connection status, data notifications, time sync

use serde::Serialize;

use crate::datamap::{bounded, DataItem, DecodeError, Path};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Watch → Companion
pub const MSG_CONNECT: u8 = 0x01;
pub const MSG_DISCONNECT: u8 = 0x02;
pub const MSG_SUBSCRIBE: u8 = 0x03;
pub const MSG_UNSUBSCRIBE: u8 = 0x04;
pub const MSG_FETCH: u8 = 0x05;

// Message type IDs: Companion → Watch
pub const MSG_CONNECTED: u8 = 0x40;
pub const MSG_SUSPENDED: u8 = 0x41;
pub const MSG_DATA_CHANGED: u8 = 0x42;
pub const MSG_DATA_DELETED: u8 = 0x43;
pub const MSG_FETCH_RESULT: u8 = 0x44;
pub const MSG_CONNECT_FAILED: u8 = 0x45;
pub const MSG_TIME_SYNC: u8 = 0x46;

/// Messages from the watch to the companion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchMessage {
    /// Open the data service connection
    Connect,
    /// Close the data service connection
    Disconnect,
    /// Start change notifications for a path
    Subscribe { path: Path },
    /// Stop change notifications for a path
    Unsubscribe { path: Path },
    /// Request the current record stored at a path
    Fetch { path: Path },
}

impl WatchMessage {
    pub fn subscribe(path: &str) -> Result<Self, DecodeError> {
        Ok(WatchMessage::Subscribe { path: bounded(path)? })
    }

    pub fn unsubscribe(path: &str) -> Result<Self, DecodeError> {
        Ok(WatchMessage::Unsubscribe { path: bounded(path)? })
    }

    pub fn fetch(path: &str) -> Result<Self, DecodeError> {
        Ok(WatchMessage::Fetch { path: bounded(path)? })
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            WatchMessage::Connect => Ok(Frame::empty(MSG_CONNECT)),
            WatchMessage::Disconnect => Ok(Frame::empty(MSG_DISCONNECT)),
            WatchMessage::Subscribe { path } => serialized_frame(MSG_SUBSCRIBE, path),
            WatchMessage::Unsubscribe { path } => serialized_frame(MSG_UNSUBSCRIBE, path),
            WatchMessage::Fetch { path } => serialized_frame(MSG_FETCH, path),
        }
    }

    /// Parse a watch message (companion side, or for testing)
    pub fn from_frame(frame: &Frame) -> Result<Self, DecodeError> {
        match frame.msg_type {
            MSG_CONNECT => Ok(WatchMessage::Connect),
            MSG_DISCONNECT => Ok(WatchMessage::Disconnect),
            MSG_SUBSCRIBE => Ok(WatchMessage::Subscribe {
                path: deserialize(frame)?,
            }),
            MSG_UNSUBSCRIBE => Ok(WatchMessage::Unsubscribe {
                path: deserialize(frame)?,
            }),
            MSG_FETCH => Ok(WatchMessage::Fetch {
                path: deserialize(frame)?,
            }),
            other => Err(DecodeError::UnknownMessage(other)),
        }
    }
}

/// Why the companion suspended the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SuspendCause {
    ServiceDisconnected,
    NetworkLost,
    Other(u8),
}

impl SuspendCause {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => SuspendCause::ServiceDisconnected,
            2 => SuspendCause::NetworkLost,
            other => SuspendCause::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            SuspendCause::ServiceDisconnected => 1,
            SuspendCause::NetworkLost => 2,
            SuspendCause::Other(other) => other,
        }
    }
}

/// Messages from the companion to the watch
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompanionMessage {
    /// Connection established
    Connected,
    /// Connection attempt failed
    ConnectFailed,
    /// Established connection was suspended
    Suspended { cause: SuspendCause },
    /// A record was created or changed
    DataChanged(DataItem),
    /// A record was deleted
    DataDeleted { path: Path },
    /// Response to a fetch; `None` when nothing is stored at the path
    FetchResult(Option<DataItem>),
    /// Wall clock and zone from the companion
    TimeSync {
        epoch_ms: u64,
        utc_offset_minutes: i16,
    },
}

impl CompanionMessage {
    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, DecodeError> {
        match frame.msg_type {
            MSG_CONNECTED => Ok(CompanionMessage::Connected),
            MSG_CONNECT_FAILED => Ok(CompanionMessage::ConnectFailed),
            MSG_SUSPENDED => {
                let cause = frame.payload.first().ok_or(DecodeError::Malformed)?;
                Ok(CompanionMessage::Suspended {
                    cause: SuspendCause::from_byte(*cause),
                })
            }
            MSG_DATA_CHANGED => Ok(CompanionMessage::DataChanged(deserialize(frame)?)),
            MSG_DATA_DELETED => Ok(CompanionMessage::DataDeleted {
                path: deserialize(frame)?,
            }),
            MSG_FETCH_RESULT => Ok(CompanionMessage::FetchResult(deserialize(frame)?)),
            MSG_TIME_SYNC => {
                let (epoch_ms, utc_offset_minutes) = deserialize(frame)?;
                Ok(CompanionMessage::TimeSync {
                    epoch_ms,
                    utc_offset_minutes,
                })
            }
            other => Err(DecodeError::UnknownMessage(other)),
        }
    }

    /// Encode this message into a frame (companion side, or for testing)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            CompanionMessage::Connected => Ok(Frame::empty(MSG_CONNECTED)),
            CompanionMessage::ConnectFailed => Ok(Frame::empty(MSG_CONNECT_FAILED)),
            CompanionMessage::Suspended { cause } => Frame::new(MSG_SUSPENDED, &[cause.to_byte()]),
            CompanionMessage::DataChanged(item) => serialized_frame(MSG_DATA_CHANGED, item),
            CompanionMessage::DataDeleted { path } => serialized_frame(MSG_DATA_DELETED, path),
            CompanionMessage::FetchResult(item) => serialized_frame(MSG_FETCH_RESULT, item),
            CompanionMessage::TimeSync {
                epoch_ms,
                utc_offset_minutes,
            } => serialized_frame(MSG_TIME_SYNC, &(*epoch_ms, *utc_offset_minutes)),
        }
    }
}

fn serialized_frame<T: Serialize>(msg_type: u8, value: &T) -> Result<Frame, FrameError> {
    let mut buffer = [0u8; MAX_PAYLOAD_SIZE];
    let used = postcard::to_slice(value, &mut buffer).map_err(|_| FrameError::PayloadTooLarge)?;
    Frame::new(msg_type, used)
}

fn deserialize<T>(frame: &Frame) -> Result<T, DecodeError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    postcard::from_bytes(&frame.payload).map_err(|_| DecodeError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamap::{DataMap, DataValue};
    use crate::frame::FrameParser;
    use crate::weather::WEATHER_PATH;

    fn weather_item() -> DataItem {
        let mut map = DataMap::new();
        map.insert("HIGH_TEMPERATURE", DataValue::text("25").unwrap())
            .unwrap();
        map.insert("WEATHER_ID", DataValue::Int(200)).unwrap();
        DataItem::new(WEATHER_PATH, map).unwrap()
    }

    #[test]
    fn test_watch_message_connect() {
        let frame = WatchMessage::Connect.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_CONNECT);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_watch_message_subscribe_carries_path() {
        let msg = WatchMessage::subscribe(WEATHER_PATH).unwrap();
        let frame = msg.to_frame().unwrap();

        assert_eq!(frame.msg_type, MSG_SUBSCRIBE);
        // postcard strings are varint length + bytes
        assert_eq!(frame.payload[0] as usize, WEATHER_PATH.len());
        assert_eq!(&frame.payload[1..], WEATHER_PATH.as_bytes());
        assert_eq!(WatchMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_companion_suspended() {
        let frame = Frame::new(MSG_SUSPENDED, &[2]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&frame).unwrap(),
            CompanionMessage::Suspended {
                cause: SuspendCause::NetworkLost
            }
        );
    }

    #[test]
    fn test_companion_suspended_missing_cause() {
        let frame = Frame::empty(MSG_SUSPENDED);
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_data_changed_through_parser() {
        let msg = CompanionMessage::DataChanged(weather_item());
        let bytes = msg.to_frame().unwrap().encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let frame = parser.feed_bytes(&bytes).unwrap().unwrap();
        assert_eq!(CompanionMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_fetch_result_empty() {
        let frame = CompanionMessage::FetchResult(None).to_frame().unwrap();
        assert_eq!(frame.payload.as_slice(), &[0]);
        assert_eq!(
            CompanionMessage::from_frame(&frame).unwrap(),
            CompanionMessage::FetchResult(None)
        );
    }

    #[test]
    fn test_time_sync() {
        let msg = CompanionMessage::TimeSync {
            epoch_ms: 1_700_000_000_000,
            utc_offset_minutes: -300,
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(CompanionMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_garbage_payload_is_malformed() {
        let frame = Frame::new(MSG_DATA_CHANGED, &[0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(DecodeError::Malformed)
        );
    }

    #[test]
    fn test_unknown_message_type() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            CompanionMessage::from_frame(&frame),
            Err(DecodeError::UnknownMessage(0x7F))
        );
        assert_eq!(
            WatchMessage::from_frame(&frame),
            Err(DecodeError::UnknownMessage(0x7F))
        );
    }
}
