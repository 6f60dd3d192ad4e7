use ackwire_peer::{interrupt_token, Listener, ListenerConfig, PeerError};
use tracing::info;

use crate::cmd::ListenArgs;
use crate::exit::{peer_error, CliError, CliResult, FAILURE, SUCCESS};

pub fn config_from_args(args: &ListenArgs) -> ListenerConfig {
    ListenerConfig {
        ack_delay: args.ack_delay,
    }
}

pub async fn run(args: ListenArgs) -> CliResult<i32> {
    let listener = Listener::bind(&args.path, config_from_args(&args))
        .map_err(|err| peer_error("bind failed", err))?;

    let shutdown = interrupt_token().map_err(|err| {
        CliError::new(FAILURE, format!("signal handler setup failed: {err}"))
    })?;

    match listener.run(shutdown).await {
        Ok(()) | Err(PeerError::Shutdown) => {
            info!(path = ?args.path, "listener stopped");
            Ok(SUCCESS)
        }
        Err(err) => Err(peer_error("accept failed", err)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn config_carries_ack_delay() {
        let args = ListenArgs {
            path: PathBuf::from("/tmp/test.sock"),
            ack_delay: Duration::from_millis(20),
        };
        assert_eq!(config_from_args(&args).ack_delay, Duration::from_millis(20));
    }
}
