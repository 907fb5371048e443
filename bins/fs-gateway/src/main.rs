//! fs-gateway: local invocation harness for the Foodshare gateway function.
//!
//! Feeds a single invocation through the same handler the hosting platform
//! triggers, so the function can be exercised without deploying it.

use clap::{Parser, Subcommand};
use foodshare_gateway::{Gateway, Invocation};
use foodshare_gateway_core::error::exit_codes;
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fs-gateway")]
#[command(about = "Invoke the Foodshare gateway function locally")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one invocation through the gateway
    Invoke {
        /// Path to an invocation JSON file (reads stdin if omitted)
        file: Option<PathBuf>,
        /// Print the response compactly
        #[arg(long)]
        compact: bool,
    },
    /// Send a ping invocation
    Ping,
    /// Check that the data store is reachable
    Health {
        /// Include response time and status code
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = foodshare_gateway_telemetry::init() {
        eprintln!("Warning: telemetry init failed: {e}");
    }

    let gateway = match Gateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("{} {e}", "Configuration error:".red());
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    match cli.command {
        Commands::Invoke { file, compact } => {
            let raw = match read_input(file.as_deref()) {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("{} {e}", "Error:".red());
                    std::process::exit(exit_codes::FAILURE);
                }
            };

            let invocation: Invocation = match serde_json::from_str(&raw) {
                Ok(invocation) => invocation,
                Err(e) => {
                    eprintln!("{} invalid invocation JSON: {e}", "Error:".red());
                    std::process::exit(exit_codes::VALIDATION_ERROR);
                }
            };

            let response = gateway.handle(invocation).await;
            print_response(&response, compact);
            std::process::exit(exit_code_for(response.status));
        }

        Commands::Ping => {
            let response = gateway.handle(Invocation::ping()).await;
            print_response(&response, false);
            std::process::exit(exit_code_for(response.status));
        }

        Commands::Health { detailed } => match gateway.store().probe().await {
            Ok(status) => {
                if status.is_healthy {
                    println!("{} {}", "healthy".green(), status.url);
                } else {
                    println!("{} {}", "unhealthy".red(), status.url);
                }
                if detailed {
                    println!("  status code: {}", status.status_code);
                    println!("  response time: {:?}", status.response_time);
                }
                if !status.is_healthy {
                    std::process::exit(exit_codes::FAILURE);
                }
            }
            Err(e) => {
                eprintln!("{} {e}", "Store unreachable:".red());
                std::process::exit(exit_codes::FAILURE);
            }
        },
    }
}

/// Read the invocation source: a file path, or stdin when none is given
fn read_input(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_response(response: &foodshare_gateway::InvocationResponse, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(response)
    } else {
        serde_json::to_string_pretty(response)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{} failed to render response: {e}", "Error:".red()),
    }
}

/// Map a response status to the CLI exit code table
fn exit_code_for(status: u16) -> i32 {
    match status {
        200..=299 => exit_codes::SUCCESS,
        400..=499 => exit_codes::VALIDATION_ERROR,
        _ => exit_codes::FAILURE,
    }
}
