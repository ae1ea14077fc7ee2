use clap::Parser;
use locauto::args::{
    Args, ClientSubcommand, Command, InvoiceSubcommand, LedgerSubcommand, VehicleSubcommand,
};
use locauto::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Client(client_args) => {
            let config = Config::load(home).await?;
            match client_args.entity() {
                ClientSubcommand::Add(args) => {
                    commands::add_client(config, args.clone()).await?.print()
                }
                ClientSubcommand::List => commands::list_clients(config).await?.print(),
                ClientSubcommand::Delete(args) => {
                    commands::delete_clients(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Vehicle(vehicle_args) => {
            let config = Config::load(home).await?;
            match vehicle_args.entity() {
                VehicleSubcommand::Add(args) => {
                    commands::add_vehicle(config, args.clone()).await?.print()
                }
                VehicleSubcommand::List => commands::list_vehicles(config).await?.print(),
                VehicleSubcommand::Delete(args) => {
                    commands::delete_vehicle(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Invoice(invoice_args) => {
            let config = Config::load(home).await?;
            match invoice_args.entity() {
                InvoiceSubcommand::Next => commands::next_invoice_number(config).await?.print(),
                InvoiceSubcommand::Issue(args) => {
                    commands::issue_invoice(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Ledger(ledger_args) => {
            let config = Config::load(home).await?;
            match ledger_args.entity() {
                LedgerSubcommand::Show(args) => {
                    commands::show_ledger(config, args.clone()).await?.print()
                }
                LedgerSubcommand::Add(args) => {
                    commands::add_transaction(config, args.clone())
                        .await?
                        .print()
                }
                LedgerSubcommand::Delete(args) => {
                    commands::delete_transaction(config, args.clone())
                        .await?
                        .print()
                }
                LedgerSubcommand::Chart(args) => {
                    commands::ledger_chart(config, args.clone()).await?.print()
                }
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
