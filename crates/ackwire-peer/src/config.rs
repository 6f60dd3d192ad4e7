use std::time::Duration;

use ackwire_frame::{FrameError, MAX_PAYLOAD};
use bytes::Bytes;

/// Delay between receiving a frame and acknowledging it.
pub const DEFAULT_ACK_DELAY: Duration = Duration::from_secs(1);

/// Message the dialer sends when none is configured.
pub const DEFAULT_MESSAGE: &str = "Hello World!\n";

/// Listener and connection handler behavior.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Time each handler waits after a complete frame before sending the ack.
    pub ack_delay: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ack_delay: DEFAULT_ACK_DELAY,
        }
    }
}

/// Dialer behavior.
#[derive(Debug, Clone)]
pub struct DialerConfig {
    message: Bytes,
    /// Stop after this many acknowledged exchanges. `None` runs until the
    /// connection fails or shutdown is requested.
    pub max_exchanges: Option<u64>,
}

impl DialerConfig {
    /// Build a config sending `message` on every exchange.
    ///
    /// Fails with [`FrameError::PayloadTooLarge`] if the message does not fit
    /// a one-byte length prefix.
    pub fn with_message(message: impl Into<Bytes>) -> Result<Self, FrameError> {
        let message = message.into();
        if message.len() > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge {
                size: message.len(),
                max: MAX_PAYLOAD,
            });
        }
        Ok(Self {
            message,
            max_exchanges: None,
        })
    }

    /// Limit the number of exchanges.
    pub fn with_max_exchanges(mut self, max: u64) -> Self {
        self.max_exchanges = Some(max);
        self
    }

    /// The message sent on every exchange.
    pub fn message(&self) -> &Bytes {
        &self.message
    }
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            message: Bytes::from_static(DEFAULT_MESSAGE.as_bytes()),
            max_exchanges: None,
        }
    }
}
