//! Listener and dialer in one process: five acknowledged exchanges.
//!
//! Run with:
//!   cargo run --example loopback

use std::fs;
use std::time::Duration;

use ackwire::peer::{CancellationToken, Dialer, DialerConfig, Listener, ListenerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sock_dir = std::env::temp_dir().join(format!("ackwire-loopback-{}", std::process::id()));
    fs::create_dir_all(&sock_dir)?;
    let sock_path = sock_dir.join("ack.sock");

    let listener = Listener::bind(
        &sock_path,
        ListenerConfig {
            ack_delay: Duration::from_millis(200),
        },
    )?;
    eprintln!("Listening on {}", sock_path.display());

    let shutdown = CancellationToken::new();
    let server = tokio::spawn(listener.run(shutdown.clone()));

    let config = DialerConfig::with_message("ping")?.with_max_exchanges(5);
    let outcome = Dialer::connect(&sock_path, config)
        .await?
        .run(CancellationToken::new())
        .await;
    eprintln!("{} exchanges, stopped: {}", outcome.exchanges, outcome.reason);

    shutdown.cancel();
    match server.await? {
        Err(err) if err.is_shutdown() => eprintln!("Listener closed"),
        other => eprintln!("Listener ended unexpectedly: {other:?}"),
    }

    let _ = fs::remove_dir_all(&sock_dir);
    Ok(())
}
