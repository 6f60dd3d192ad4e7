use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ackwire_transport::{peer_pid, UnixDomainSocket};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::config::ListenerConfig;
use crate::error::{PeerError, Result};
use crate::handler::handle_connection;

/// Accepts connections and hands each one to its own handler task.
pub struct Listener {
    socket: UnixDomainSocket,
    config: ListenerConfig,
    next_conn_id: AtomicU64,
}

impl Listener {
    /// Bind to a Unix domain socket path.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(path: impl AsRef<Path>, config: ListenerConfig) -> Result<Self> {
        let socket = UnixDomainSocket::bind(path)?;
        Ok(Self {
            socket,
            config,
            next_conn_id: AtomicU64::new(1),
        })
    }

    /// Run the accept loop until accept fails or `shutdown` is cancelled.
    ///
    /// Never returns `Ok`: cancellation closes the listening socket and
    /// yields [`PeerError::Shutdown`]; any accept failure is returned as a
    /// transport error. Handler tasks already running are left alone.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        loop {
            let stream = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!(path = ?self.path(), "closing listener due to interrupt");
                    return Err(PeerError::Shutdown);
                }
                accepted = self.socket.accept() => accepted?,
            };

            let id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
            let span = info_span!(
                "conn",
                id = %format!("conn-{id}"),
                peer_pid = ?peer_pid(&stream)
            );
            span.in_scope(|| info!("accepted connection"));
            tokio::spawn(handle_connection(stream, self.config.clone()).instrument(span));
        }
    }

    /// Bound socket path.
    pub fn path(&self) -> &Path {
        self.socket.path()
    }
}

/// Bind `path` and serve connections until shutdown or accept failure.
pub async fn listen(
    path: impl AsRef<Path>,
    config: ListenerConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    Listener::bind(path, config)?.run(shutdown).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use ackwire_frame::ACK;
    use ackwire_transport::TransportError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixStream;

    use super::*;

    fn make_sock_path(tag: &str) -> PathBuf {
        let dir = PathBuf::from(format!(
            "/tmp/ackw-{}-{}-{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir.join("listener.sock")
    }

    fn cleanup(sock_path: &Path) {
        if let Some(parent) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    async fn start(
        tag: &str,
        ack_delay: Duration,
    ) -> (PathBuf, CancellationToken, tokio::task::JoinHandle<Result<()>>) {
        let sock_path = make_sock_path(tag);
        let listener =
            Listener::bind(&sock_path, ListenerConfig { ack_delay }).expect("listener should bind");
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(listener.run(shutdown.clone()));
        (sock_path, shutdown, task)
    }

    async fn exchange(stream: &mut UnixStream, payload: &[u8]) -> u8 {
        stream.write_u8(payload.len() as u8).await.unwrap();
        stream.write_all(payload).await.unwrap();
        stream.read_u8().await.unwrap()
    }

    #[tokio::test]
    async fn serves_multiple_sequential_connections() {
        let (sock_path, shutdown, task) = start("multi", Duration::ZERO).await;

        for _ in 0..3 {
            let mut stream = UnixStream::connect(&sock_path).await.unwrap();
            assert_eq!(exchange(&mut stream, b"Hello World!\n").await, ACK);
        }

        shutdown.cancel();
        assert!(matches!(task.await.unwrap(), Err(PeerError::Shutdown)));
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn failed_connection_does_not_affect_others() {
        let (sock_path, shutdown, task) = start("isolation", Duration::from_millis(50)).await;

        let mut healthy = UnixStream::connect(&sock_path).await.unwrap();
        let mut broken = UnixStream::connect(&sock_path).await.unwrap();

        // Promise ten bytes, deliver three, then hang up.
        broken.write_all(b"\x0aabc").await.unwrap();
        drop(broken);

        for i in 0..5u8 {
            assert_eq!(exchange(&mut healthy, &[i; 4]).await, ACK);
        }

        // A fresh connection is still accepted afterwards.
        let mut late = UnixStream::connect(&sock_path).await.unwrap();
        assert_eq!(exchange(&mut late, b"").await, ACK);

        shutdown.cancel();
        assert!(matches!(task.await.unwrap(), Err(PeerError::Shutdown)));
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn delay_does_not_block_concurrent_connections() {
        let delay = Duration::from_millis(500);
        let (sock_path, shutdown, task) = start("concurrent", delay).await;

        let started = tokio::time::Instant::now();
        let mut clients = Vec::new();
        for i in 0..4u8 {
            let path = sock_path.clone();
            clients.push(tokio::spawn(async move {
                let mut stream = UnixStream::connect(&path).await.unwrap();
                exchange(&mut stream, &[i]).await
            }));
        }
        for client in clients {
            assert_eq!(client.await.unwrap(), ACK);
        }

        let elapsed = started.elapsed();
        assert!(elapsed >= delay);
        assert!(
            elapsed < delay * 3,
            "connections should be delayed in parallel, took {elapsed:?}"
        );

        shutdown.cancel();
        let _ = task.await;
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn shutdown_closes_socket_and_refuses_new_connections() {
        let (sock_path, shutdown, task) = start("shutdown", Duration::ZERO).await;
        assert!(sock_path.exists());

        shutdown.cancel();
        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("accept loop should exit")
            .unwrap();
        assert!(matches!(result, Err(ref err) if err.is_shutdown()));

        assert!(!sock_path.exists(), "socket file should be removed");
        assert!(UnixStream::connect(&sock_path).await.is_err());
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn open_connections_survive_listener_shutdown() {
        let (sock_path, shutdown, task) = start("survive", Duration::ZERO).await;

        let mut stream = UnixStream::connect(&sock_path).await.unwrap();
        assert_eq!(exchange(&mut stream, b"before").await, ACK);

        shutdown.cancel();
        let _ = task.await;

        assert_eq!(exchange(&mut stream, b"after").await, ACK);
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn second_listener_on_live_path_fails_to_bind() {
        let (sock_path, shutdown, task) = start("in-use", Duration::ZERO).await;

        let err = Listener::bind(&sock_path, ListenerConfig::default())
            .err()
            .expect("bind on a live path should fail");
        match err {
            PeerError::Transport(TransportError::Bind { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
            }
            other => panic!("expected bind error, got {other}"),
        }

        let mut stream = UnixStream::connect(&sock_path).await.unwrap();
        assert_eq!(exchange(&mut stream, b"still here").await, ACK);

        shutdown.cancel();
        assert!(matches!(task.await.unwrap(), Err(PeerError::Shutdown)));
        cleanup(&sock_path);
    }

    #[tokio::test]
    async fn listen_reports_bind_failure() {
        let sock_path = make_sock_path("bind-fail");
        std::fs::write(&sock_path, b"not a socket").unwrap();

        let err = listen(&sock_path, ListenerConfig::default(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PeerError::Transport(TransportError::Bind { .. })
        ));
        cleanup(&sock_path);
    }
}
