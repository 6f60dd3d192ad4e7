mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "ackwire",
    version,
    about = "Length-prefixed request/acknowledge messaging over Unix sockets",
    // Only unambiguous prefixes of a subcommand name match: `l`, `lis` and
    // `con` work, `lx` does not.
    infer_subcommands = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit::USAGE
            } else {
                exit::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(code = err.code, "{err}");
            std::process::exit(err.code);
        }
    }
}
