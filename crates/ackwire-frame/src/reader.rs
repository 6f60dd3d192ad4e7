use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{Frame, ACK};
use crate::error::{FrameError, Result, Stage};

/// Reads frames and acknowledgement bytes from any `AsyncRead` stream.
///
/// Reads are exact: a frame consumes its length byte and precisely that many
/// payload bytes, never more, so nothing is buffered between calls.
pub struct FrameReader<T> {
    inner: T,
}

impl<T: AsyncRead + Unpin> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next complete frame.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached before
    /// the frame is complete; a zero-length frame reads no payload bytes.
    pub async fn read_frame(&mut self) -> Result<Frame> {
        let len = self.read_byte(Stage::Length).await? as usize;

        let mut payload = BytesMut::zeroed(len);
        if len > 0 {
            self.inner
                .read_exact(&mut payload)
                .await
                .map_err(|err| FrameError::from_read(Stage::Payload, err))?;
        }

        Ok(Frame::new(payload.freeze()))
    }

    /// Read one acknowledgement byte and check it is [`ACK`].
    pub async fn read_ack(&mut self) -> Result<()> {
        match self.read_byte(Stage::Ack).await? {
            ACK => Ok(()),
            other => Err(FrameError::UnexpectedAck(other)),
        }
    }

    async fn read_byte(&mut self, stage: Stage) -> Result<u8> {
        self.inner
            .read_u8()
            .await
            .map_err(|err| FrameError::from_read(stage, err))
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn read_single_frame() {
        let mock = Builder::new().read(b"\x05hello").build();
        let mut reader = FrameReader::new(mock);

        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.payload.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn read_zero_length_frame() {
        let mock = Builder::new().read(&[0]).build();
        let mut reader = FrameReader::new(mock);

        let frame = reader.read_frame().await.unwrap();
        assert!(frame.is_empty());
    }

    #[tokio::test]
    async fn read_multiple_frames_split_across_chunks() {
        let mock = Builder::new()
            .read(b"\x03o")
            .read(b"ne\x00\x05th")
            .read(b"ree")
            .build();
        let mut reader = FrameReader::new(mock);

        assert_eq!(reader.read_frame().await.unwrap().payload.as_ref(), b"one");
        assert_eq!(reader.read_frame().await.unwrap().payload.as_ref(), b"");
        assert_eq!(reader.read_frame().await.unwrap().payload.as_ref(), b"three");
    }

    #[tokio::test]
    async fn read_max_length_frame() {
        let mut wire = vec![255u8];
        wire.extend(std::iter::repeat(0xAB).take(255));
        let mock = Builder::new().read(&wire).build();
        let mut reader = FrameReader::new(mock);

        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.len(), 255);
        assert!(frame.payload.iter().all(|b| *b == 0xAB));
    }

    #[tokio::test]
    async fn does_not_read_past_payload() {
        let (mut client, server) = tokio::io::duplex(64);
        tokio::io::AsyncWriteExt::write_all(&mut client, b"\x02hi\x01x")
            .await
            .unwrap();

        let mut reader = FrameReader::new(server);
        assert_eq!(reader.read_frame().await.unwrap().payload.as_ref(), b"hi");

        // The next frame is still intact in the stream.
        let mut rest = [0u8; 2];
        reader.into_inner().read_exact(&mut rest).await.unwrap();
        assert_eq!(&rest, b"\x01x");
    }

    #[tokio::test]
    async fn connection_closed_before_length() {
        let mock = Builder::new().build();
        let mut reader = FrameReader::new(mock);

        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                stage: Stage::Length
            }
        ));
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn connection_closed_mid_payload() {
        let mock = Builder::new().read(b"\x10only-part").build();
        let mut reader = FrameReader::new(mock);

        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                stage: Stage::Payload
            }
        ));
        assert!(!err.is_disconnect());
    }

    #[tokio::test]
    async fn read_error_propagates() {
        let mock = Builder::new()
            .read(b"\x04")
            .read_error(std::io::Error::from(ErrorKind::ConnectionReset))
            .build();
        let mut reader = FrameReader::new(mock);

        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::Read { stage: Stage::Payload, ref source }
            if source.kind() == ErrorKind::ConnectionReset));
    }

    #[tokio::test]
    async fn read_ack_accepts_ack_byte() {
        let mock = Builder::new().read(&[ACK, ACK]).build();
        let mut reader = FrameReader::new(mock);

        reader.read_ack().await.unwrap();
        reader.read_ack().await.unwrap();
    }

    #[tokio::test]
    async fn read_ack_rejects_other_bytes() {
        let mock = Builder::new().read(&[0x31]).build();
        let mut reader = FrameReader::new(mock);

        let err = reader.read_ack().await.unwrap_err();
        assert!(matches!(err, FrameError::UnexpectedAck(0x31)));
    }

    #[tokio::test]
    async fn read_ack_on_closed_stream() {
        let mock = Builder::new().build();
        let mut reader = FrameReader::new(mock);

        let err = reader.read_ack().await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed { stage: Stage::Ack }
        ));
    }
}
