//! Unix domain socket transport for ackwire.
//!
//! This is the lowest layer of ackwire: binding a filesystem-path socket,
//! accepting connections, and dialing a listening peer. Streams are plain
//! [`tokio::net::UnixStream`] values; everything above this crate is generic
//! over `AsyncRead + AsyncWrite`.

pub mod error;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};

#[cfg(unix)]
pub use uds::{peer_pid, UnixDomainSocket};
