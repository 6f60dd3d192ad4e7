use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::{encode_frame, ACK, LENGTH_PREFIX_SIZE, MAX_PAYLOAD};
use crate::error::{FrameError, Result, Stage};

/// Writes frames and acknowledgement bytes to any `AsyncWrite` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: AsyncWrite + Unpin> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(LENGTH_PREFIX_SIZE + MAX_PAYLOAD),
        }
    }

    /// Send one frame: the length byte, then the payload.
    ///
    /// The two parts are written separately so a failure reports which one
    /// did not make it onto the wire.
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(payload, &mut self.buf)?;

        let (prefix, body) = self.buf.split_at(LENGTH_PREFIX_SIZE);
        write_stage(&mut self.inner, prefix, Stage::Length).await?;
        write_stage(&mut self.inner, body, Stage::Payload).await
    }

    /// Send the acknowledgement byte.
    pub async fn send_ack(&mut self) -> Result<()> {
        write_stage(&mut self.inner, &[ACK], Stage::Ack).await
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

async fn write_stage<T: AsyncWrite + Unpin>(
    inner: &mut T,
    bytes: &[u8],
    stage: Stage,
) -> Result<()> {
    inner
        .write_all(bytes)
        .await
        .map_err(|source| FrameError::Write { stage, source })?;
    inner
        .flush()
        .await
        .map_err(|source| FrameError::Write { stage, source })
}
