//! Listener, connection handler and dialer roles for ackwire.
//!
//! Both roles take an explicit [`CancellationToken`] instead of reacting to
//! process signals themselves; [`interrupt_token`] produces one that fires on
//! Ctrl-C.
//!
//! The listener spawns one task per accepted connection with no upper bound
//! and no pooling; bounding concurrency is out of scope for this crate.

pub mod config;
pub mod dialer;
pub mod error;
pub mod handler;
pub mod listener;
pub mod shutdown;

pub use config::{DialerConfig, ListenerConfig, DEFAULT_ACK_DELAY, DEFAULT_MESSAGE};
pub use dialer::{connect, DialOutcome, Dialer, StopReason};
pub use error::{PeerError, Result};
pub use handler::{handle_connection, serve_frames};
pub use listener::{listen, Listener};
pub use shutdown::{interrupt_token, spawn_interrupt_watcher};
pub use tokio_util::sync::CancellationToken;
