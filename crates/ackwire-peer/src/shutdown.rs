use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawn a task that cancels `token` on the first interrupt signal.
///
/// The signal handler is registered before this returns, so an interrupt
/// arriving right afterwards is not lost. The task exits after its single
/// action, or without acting once `token` is cancelled by someone else.
/// Must be called from within a Tokio runtime.
pub fn spawn_interrupt_watcher(token: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            received = interrupt.recv() => {
                if received.is_some() {
                    info!("interrupt received, shutting down");
                    token.cancel();
                }
            }
        }
    }))
}

/// A fresh token that is cancelled when the process is interrupted.
pub fn interrupt_token() -> std::io::Result<CancellationToken> {
    let token = CancellationToken::new();
    spawn_interrupt_watcher(token.clone())?;
    Ok(token)
}
