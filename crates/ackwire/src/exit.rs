use std::fmt;

use ackwire_frame::FrameError;
use ackwire_peer::PeerError;

pub const SUCCESS: i32 = 0;
/// Missing, unknown or invalid arguments.
pub const USAGE: i32 = 1;
/// A listen or connect operation failed.
pub const FAILURE: i32 = 2;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::PayloadTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn peer_error(context: &str, err: PeerError) -> CliError {
    match err {
        PeerError::Frame(err) => frame_error(context, err),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ackwire_transport::TransportError;

    use super::*;

    #[test]
    fn transport_failures_map_to_failure() {
        let err = peer_error(
            "connect failed",
            PeerError::Transport(TransportError::Connect {
                path: PathBuf::from("/tmp/x.sock"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("connect failed: transport error"));
    }

    #[test]
    fn oversized_message_maps_to_usage() {
        let err = peer_error(
            "invalid message",
            PeerError::Frame(FrameError::PayloadTooLarge { size: 300, max: 255 }),
        );
        assert_eq!(err.code, USAGE);
    }
}
