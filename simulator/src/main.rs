//! Confluent Cloud Simulator CLI

use ccloud_simulator::server;
use clap::{Arg, ArgAction, Command};
use tracing::error;

/// Returns the version of the crate from `CARGO_PKG_VERSION`.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Flag for verbose output. Controls logging level.
const VERBOSE_FLAG: &str = "verbose";

/// Flag for the port to use for the server.
const PORT_FLAG: &str = "port";

/// Flag for the account email accepted at login.
const EMAIL_FLAG: &str = "email";

/// Flag for the account password accepted at login.
const PASSWORD_FLAG: &str = "password";

/// Flag for the address advertised as the API endpoint of clusters.
const API_ENDPOINT_FLAG: &str = "api-endpoint";

/// Entrypoint for the Confluent Cloud Simulator CLI.
#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Define the CLI application and its arguments.
    let matches = Command::new("simulator")
        .version(crate_version())
        .about("Simulate the Confluent Cloud API.")
        .arg_required_else_help(true)
        .arg(
            Arg::new(VERBOSE_FLAG)
                .short('v')
                .long(VERBOSE_FLAG)
                .help("Enable verbose logging.")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new(server::CMD)
                .about("Commands for the simulator server.")
                .arg_required_else_help(true)
                .subcommand(
                    Command::new(server::RUN_CMD)
                        .about("Run the simulator server.")
                        .arg(
                            Arg::new(PORT_FLAG)
                                .long(PORT_FLAG)
                                .help("The port to use for the server.")
                                .default_value("8080")
                                .value_parser(clap::value_parser!(u16))
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(EMAIL_FLAG)
                                .long(EMAIL_FLAG)
                                .help("The account email accepted at login.")
                                .required(true)
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(PASSWORD_FLAG)
                                .long(PASSWORD_FLAG)
                                .help("The account password accepted at login.")
                                .required(true)
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(API_ENDPOINT_FLAG)
                                .long(API_ENDPOINT_FLAG)
                                .help("The address advertised as the API endpoint of clusters. Defaults to the server address.")
                                .action(ArgAction::Set),
                        ),
                ),
        )
        .get_matches();

    // Create a logger with a level determined by the `verbose` flag.
    let level = if matches.get_flag(VERBOSE_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Parse subcommands and run the appropriate logic.
    if let Some(server_matches) = matches.subcommand_matches(server::CMD) {
        match server_matches.subcommand() {
            Some((server::RUN_CMD, matches)) => {
                // Extract arguments for the `run` command.
                let Some(port) = matches.get_one::<u16>(PORT_FLAG) else {
                    error!("--port is required");
                    return std::process::ExitCode::FAILURE;
                };
                let (Some(email), Some(password)) = (
                    matches.get_one::<String>(EMAIL_FLAG),
                    matches.get_one::<String>(PASSWORD_FLAG),
                ) else {
                    error!("--email and --password are required");
                    return std::process::ExitCode::FAILURE;
                };
                let api_endpoint = matches.get_one::<String>(API_ENDPOINT_FLAG).cloned();

                // Run the server.
                if let Err(e) =
                    server::run(port, email.to_string(), password.to_string(), api_endpoint).await
                {
                    error!(error = ?e, "failed to run simulator server");
                } else {
                    return std::process::ExitCode::SUCCESS;
                }
            }
            _ => {
                error!("invalid subcommand");
                return std::process::ExitCode::FAILURE;
            }
        }
    }

    std::process::ExitCode::FAILURE
}
