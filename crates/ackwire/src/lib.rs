//! Length-prefixed request/acknowledge messaging over Unix domain sockets.
//!
//! A listener acknowledges every one-byte-length-prefixed frame it receives
//! with the byte `0x1F` after a delay; a dialer sends a fixed message over
//! and over, waiting for each acknowledgement.
//!
//! # Crate Structure
//!
//! - [`transport`]: Unix domain socket bind/accept/connect
//! - [`frame`]: One-byte length-prefixed framing and the ack byte
//! - [`peer`]: Listener, connection handler and dialer roles

/// Re-export transport types.
pub mod transport {
    pub use ackwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use ackwire_frame::*;
}

/// Re-export peer types.
pub mod peer {
    pub use ackwire_peer::*;
}
