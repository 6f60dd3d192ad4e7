use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};

pub mod connect;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept connections and acknowledge every frame after a delay.
    Listen(ListenArgs),
    /// Connect and send a message repeatedly, waiting for each acknowledgement.
    Connect(ConnectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub async fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args).await,
        Command::Connect(args) => connect::run(args).await,
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Delay before acknowledging each frame (e.g. 1s, 250ms).
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub ack_delay: Duration,
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Message to send on every exchange (at most 255 bytes). Default: "Hello World!\n".
    #[arg(long)]
    pub message: Option<String>,
    /// Stop after N acknowledged exchanges.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `<n>ms`, `<n>s`, or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
