use std::fmt;
use std::path::Path;

use ackwire_frame::{FrameError, FrameReader, FrameWriter};
use ackwire_transport::UnixDomainSocket;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DialerConfig;
use crate::error::Result;

/// Why the dialer loop stopped.
#[derive(Debug)]
pub enum StopReason {
    /// Shutdown was requested.
    Interrupted,
    /// The configured exchange limit was reached.
    LimitReached,
    /// Sending, receiving or validating an exchange failed.
    Frame(FrameError),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Interrupted => f.write_str("interrupted"),
            StopReason::LimitReached => f.write_str("exchange limit reached"),
            StopReason::Frame(err) => write!(f, "{err}"),
        }
    }
}

/// Summary of a finished dialer run.
#[derive(Debug)]
pub struct DialOutcome {
    /// Exchanges that completed with a valid acknowledgement.
    pub exchanges: u64,
    pub reason: StopReason,
}

/// Client side of the protocol over one connection.
pub struct Dialer {
    reader: FrameReader<OwnedReadHalf>,
    writer: FrameWriter<OwnedWriteHalf>,
    config: DialerConfig,
}

impl Dialer {
    /// Connect to a listening socket.
    pub async fn connect(path: impl AsRef<Path>, config: DialerConfig) -> Result<Self> {
        let stream = UnixDomainSocket::connect(path).await?;
        Ok(Self::from_stream(stream, config))
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: UnixStream, config: DialerConfig) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
            config,
        }
    }

    /// Send the configured message and wait for its acknowledgement, over and
    /// over, until something stops the loop. Always closes the connection.
    ///
    /// Every way of stopping is reported through [`DialOutcome`] rather than
    /// as an error.
    pub async fn run(mut self, shutdown: CancellationToken) -> DialOutcome {
        let message = self.config.message().clone();
        let mut exchanges = 0u64;

        let reason = loop {
            if self.config.max_exchanges.is_some_and(|max| exchanges >= max) {
                break StopReason::LimitReached;
            }

            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break StopReason::Interrupted,
                result = exchange(&mut self.reader, &mut self.writer, &message) => result,
            };

            match result {
                Ok(()) => exchanges += 1,
                Err(err) => break StopReason::Frame(err),
            }
        };

        match &reason {
            StopReason::Interrupted => info!(exchanges, "closing connection due to interrupt"),
            StopReason::LimitReached => info!(exchanges, "exchange limit reached"),
            StopReason::Frame(err @ FrameError::UnexpectedAck(_)) => {
                warn!(exchanges, error = %err, "unexpected response")
            }
            StopReason::Frame(err) => warn!(exchanges, error = %err, "exchange failed"),
        }

        let mut write_half = self.writer.into_inner();
        if let Err(err) = write_half.shutdown().await {
            debug!(error = %err, "error closing connection");
        }

        DialOutcome { exchanges, reason }
    }
}

async fn exchange<R, W>(
    reader: &mut FrameReader<R>,
    writer: &mut FrameWriter<W>,
    message: &[u8],
) -> std::result::Result<(), FrameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.send(message).await?;
    reader.read_ack().await
}

/// Connect to `path` and run the dialer loop until it stops.
///
/// Only a failed dial is an error; how the loop ended is in the outcome.
pub async fn connect(
    path: impl AsRef<Path>,
    config: DialerConfig,
    shutdown: CancellationToken,
) -> Result<DialOutcome> {
    Ok(Dialer::connect(path, config).await?.run(shutdown).await)
}
