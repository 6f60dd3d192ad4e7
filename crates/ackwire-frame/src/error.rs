use std::fmt;

/// The part of an exchange an I/O operation was working on when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The one-byte length prefix.
    Length,
    /// The payload bytes following the prefix.
    Payload,
    /// The acknowledgement byte.
    Ack,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Length => "length prefix",
            Stage::Payload => "payload",
            Stage::Ack => "acknowledgement",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while exchanging frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The peer closed the connection before `stage` was fully read.
    #[error("connection closed while reading {stage}")]
    ConnectionClosed { stage: Stage },

    /// Reading `stage` failed.
    #[error("failed reading {stage}: {source}")]
    Read {
        stage: Stage,
        source: std::io::Error,
    },

    /// Writing `stage` failed.
    #[error("failed writing {stage}: {source}")]
    Write {
        stage: Stage,
        source: std::io::Error,
    },

    /// The peer answered with something other than the acknowledgement byte.
    #[error("unexpected acknowledgement byte 0x{0:02x} (expected 0x1f)")]
    UnexpectedAck(u8),

    /// The payload does not fit in a one-byte length prefix.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl FrameError {
    /// Whether this error is the peer going away cleanly between frames.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            FrameError::ConnectionClosed {
                stage: Stage::Length | Stage::Ack
            }
        )
    }

    pub(crate) fn from_read(stage: Stage, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            FrameError::ConnectionClosed { stage }
        } else {
            FrameError::Read { stage, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
