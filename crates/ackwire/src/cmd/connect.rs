use ackwire_peer::{interrupt_token, Dialer, DialerConfig};
use tracing::info;

use crate::cmd::ConnectArgs;
use crate::exit::{frame_error, peer_error, CliError, CliResult, FAILURE, SUCCESS};

pub fn config_from_args(args: &ConnectArgs) -> CliResult<DialerConfig> {
    let config = match &args.message {
        Some(message) => DialerConfig::with_message(message.clone())
            .map_err(|err| frame_error("invalid --message", err))?,
        None => DialerConfig::default(),
    };
    Ok(match args.count {
        Some(count) => config.with_max_exchanges(count),
        None => config,
    })
}

pub async fn run(args: ConnectArgs) -> CliResult<i32> {
    let config = config_from_args(&args)?;
    let dialer = Dialer::connect(&args.path, config)
        .await
        .map_err(|err| peer_error("connect failed", err))?;

    let shutdown = interrupt_token().map_err(|err| {
        CliError::new(FAILURE, format!("signal handler setup failed: {err}"))
    })?;

    // Every way the loop can end counts as a clean exit.
    let outcome = dialer.run(shutdown).await;
    info!(
        exchanges = outcome.exchanges,
        reason = %outcome.reason,
        "dialer stopped"
    );
    Ok(SUCCESS)
}
