//! Frame encoding and decoding for the companion link.
//!
//! Frame format:
//! - SYNC (1 byte): 0x5A synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_SYNC: u8 = 0x5A;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes a frame adds around its payload (SYNC + LENGTH + TYPE + CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Length byte out of range or unknown message type
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame carrying a copy of `payload`
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        let out = buffer.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();
        out[0] = FRAME_SYNC;
        out[1] = length;
        out[2] = self.msg_type;
        out[3..end].copy_from_slice(&self.payload);
        out[end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Byte-at-a-time frame decoder
///
/// Garbage before a SYNC byte is skipped. After a bad length or checksum
/// the parser drops the frame and hunts for the next SYNC.
#[derive(Debug, Clone, Default)]
pub struct FrameParser {
    expect: Expect,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// Next field the decoder is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Expect {
    #[default]
    Sync,
    Length,
    Type { length: u8 },
    Payload { length: u8, msg_type: u8 },
    Checksum { length: u8, msg_type: u8 },
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial frame and wait for the next SYNC byte
    pub fn reset(&mut self) {
        self.expect = Expect::Sync;
        self.payload.clear();
    }

    /// Feed a single byte
    ///
    /// `Ok(Some(frame))` completes a frame, `Ok(None)` needs more input.
    /// An error means the partial frame was discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.expect = match self.expect {
            Expect::Sync if byte == FRAME_SYNC => Expect::Length,
            Expect::Sync => Expect::Sync,
            Expect::Length if usize::from(byte) > MAX_PAYLOAD_SIZE => {
                self.reset();
                return Err(FrameError::InvalidFrame);
            }
            Expect::Length => Expect::Type { length: byte },
            Expect::Type { length } => {
                self.payload.clear();
                if length == 0 {
                    Expect::Checksum { length, msg_type: byte }
                } else {
                    Expect::Payload { length, msg_type: byte }
                }
            }
            Expect::Payload { length, msg_type } => {
                // length <= MAX_PAYLOAD_SIZE, so the push cannot overflow
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(length) {
                    Expect::Checksum { length, msg_type }
                } else {
                    Expect::Payload { length, msg_type }
                }
            }
            Expect::Checksum { length, msg_type } => {
                let valid = byte == Frame::checksum(length, msg_type, &self.payload);
                let payload = core::mem::take(&mut self.payload);
                self.reset();
                return if valid {
                    Ok(Some(Frame { msg_type, payload }))
                } else {
                    Err(FrameError::InvalidChecksum)
                };
            }
        };
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Bytes after that frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
