use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 1;

/// Largest payload a one-byte length prefix can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Acknowledgement byte the server sends after every complete frame.
pub const ACK: u8 = 0x1F;

/// A single received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The message payload, opaque to the protocol.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Encode a payload into the wire format.
///
/// ```text
/// ┌──────────┬──────────────────┐
/// │ Len (1B) │ Payload          │
/// │ 0..=255  │ (Len bytes)      │
/// └──────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u8::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD,
    })?;
    dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
    dst.put_u8(len);
    dst.put_slice(payload);
    Ok(())
}
