/// Errors surfaced by the listener and dialer roles.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Transport setup or accept failed.
    #[error("transport error: {0}")]
    Transport(#[from] ackwire_transport::TransportError),

    /// Frame-level error, including invalid role configuration.
    #[error("frame error: {0}")]
    Frame(#[from] ackwire_frame::FrameError),

    /// The listener was closed because shutdown was requested.
    #[error("listener closed by shutdown request")]
    Shutdown,
}

impl PeerError {
    /// Whether this is the benign shutdown case rather than a failure.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, PeerError::Shutdown)
    }
}

pub type Result<T> = std::result::Result<T, PeerError>;
