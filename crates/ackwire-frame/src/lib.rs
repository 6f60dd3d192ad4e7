//! One-byte length-prefixed framing for ackwire.
//!
//! Every request on the wire is a single length byte followed by exactly that
//! many payload bytes. The server answers each complete frame with the single
//! acknowledgement byte [`ACK`].
//!
//! ```text
//! client -> server   [len: u8][payload: len bytes]
//! server -> client   [0x1F]
//! ```

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{encode_frame, Frame, ACK, LENGTH_PREFIX_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result, Stage};
pub use reader::FrameReader;
pub use writer::FrameWriter;
