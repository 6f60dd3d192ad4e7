use ackwire_frame::{FrameError, FrameReader, FrameWriter};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::ListenerConfig;

/// Serve one accepted connection until the peer goes away or I/O fails.
///
/// Errors end the connection and are logged here; nothing is returned to the
/// listener. The stream is shut down exactly once on the way out.
pub async fn handle_connection<S>(stream: S, config: ListenerConfig)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = FrameReader::new(read_half);
    let mut writer = FrameWriter::new(write_half);

    let (acked, err) = serve_frames(&mut reader, &mut writer, &config).await;
    if err.is_disconnect() {
        debug!(acked, "peer disconnected");
    } else {
        warn!(acked, error = %err, "connection terminated");
    }

    let mut stream = reader.into_inner().unsplit(writer.into_inner());
    if let Err(err) = stream.shutdown().await {
        debug!(error = %err, "error closing connection");
    }
}

/// Run the server side of the exchange: read a frame, wait, acknowledge.
///
/// Loops until an error occurs and returns the number of frames acknowledged
/// together with the error that ended the loop.
pub async fn serve_frames<R, W>(
    reader: &mut FrameReader<R>,
    writer: &mut FrameWriter<W>,
    config: &ListenerConfig,
) -> (u64, FrameError)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut acked = 0u64;
    loop {
        let frame = match reader.read_frame().await {
            Ok(frame) => frame,
            Err(err) => return (acked, err),
        };
        debug!(len = frame.len(), payload = ?frame.payload, "message received");

        tokio::time::sleep(config.ack_delay).await;

        if let Err(err) = writer.send_ack().await {
            return (acked, err);
        }
        acked += 1;
    }
}
