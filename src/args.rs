//! These structs provide the CLI interface for the locauto CLI.

use crate::model::Kind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// locauto: fleet, client and invoice management for a car-rental company.
///
/// Clients, vehicles and per-vehicle transactions are kept as CSV files in a data directory
/// (see --home). Issuing an invoice renders it as HTML and PDF and records the rental income in
/// the vehicle's ledger.
///
/// Amounts are typed the Brazilian way: `2.400,00` or `R$ 2.400,00`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, a default config.json and empty CSV files.
    ///
    /// Running it again on an existing directory is safe: existing files are left untouched.
    /// Edit config.json afterwards to set the company letterhead printed on invoices.
    Init,
    /// Register, list and remove clients.
    Client(ClientArgs),
    /// Register, list and remove vehicles.
    Vehicle(VehicleArgs),
    /// Issue rental invoices.
    Invoice(InvoiceArgs),
    /// Inspect and edit the income and expenses of a vehicle.
    Ledger(LedgerArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where locauto data and configuration is held. Defaults to ~/locauto
    #[arg(long, env = "LOCAUTO_HOME", default_value_t = default_locauto_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

// -----------------------------------------------------------------------------
// Clients
// -----------------------------------------------------------------------------

/// (Not shown): Args for the `locauto client` command.
#[derive(Debug, Parser, Clone)]
pub struct ClientArgs {
    #[command(subcommand)]
    entity: ClientSubcommand,
}

impl ClientArgs {
    pub fn entity(&self) -> &ClientSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClientSubcommand {
    /// Register a new client. The CPF/CNPJ and phone are punctuated before saving.
    Add(AddClientArgs),
    /// List every registered client.
    List,
    /// Remove every client with the given name.
    Delete(DeleteClientArgs),
}

/// (Not shown): Args for the `locauto client add` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddClientArgs {
    /// Full name or company name. Required.
    #[arg(long)]
    pub name: String,

    /// CPF (11 digits) or CNPJ (14 digits), with or without punctuation. Required.
    #[arg(long)]
    pub tax_id: String,

    /// Street, number and district.
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub municipality: Option<String>,

    /// Two letter state abbreviation (UF).
    #[arg(long)]
    pub state: Option<String>,

    /// CEP.
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Phone number with area code.
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

/// (Not shown): Args for the `locauto client delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteClientArgs {
    /// The exact name of the client(s) to remove.
    #[arg(long)]
    pub name: String,
}

// -----------------------------------------------------------------------------
// Vehicles
// -----------------------------------------------------------------------------

/// (Not shown): Args for the `locauto vehicle` command.
#[derive(Debug, Parser, Clone)]
pub struct VehicleArgs {
    #[command(subcommand)]
    entity: VehicleSubcommand,
}

impl VehicleArgs {
    pub fn entity(&self) -> &VehicleSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum VehicleSubcommand {
    /// Register a new vehicle. The plate is uppercased and must not already be registered.
    Add(AddVehicleArgs),
    /// List every registered vehicle.
    List,
    /// Remove a vehicle along with all of its ledger transactions.
    Delete(DeleteVehicleArgs),
}

/// (Not shown): Args for the `locauto vehicle add` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddVehicleArgs {
    /// License plate: letters, digits and `-`. Required.
    #[arg(long)]
    pub plate: String,

    /// Required.
    #[arg(long)]
    pub make: String,

    /// Required.
    #[arg(long)]
    pub model: String,

    /// Model year, from 1980 to next year. Defaults to the current year.
    #[arg(long)]
    pub year: Option<u16>,

    #[arg(long)]
    pub color: Option<String>,
}

/// (Not shown): Args for the `locauto vehicle delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteVehicleArgs {
    #[arg(long)]
    pub plate: String,
}

// -----------------------------------------------------------------------------
// Invoices
// -----------------------------------------------------------------------------

/// (Not shown): Args for the `locauto invoice` command.
#[derive(Debug, Parser, Clone)]
pub struct InvoiceArgs {
    #[command(subcommand)]
    entity: InvoiceSubcommand,
}

impl InvoiceArgs {
    pub fn entity(&self) -> &InvoiceSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum InvoiceSubcommand {
    /// Show the invoice number that will be suggested next.
    Next,
    /// Render an invoice as HTML and PDF and record the rental income in the ledger.
    Issue(IssueInvoiceArgs),
}

/// (Not shown): Args for the `locauto invoice issue` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct IssueInvoiceArgs {
    /// The name of a registered client.
    #[arg(long)]
    pub client: String,

    /// The plate of a registered vehicle.
    #[arg(long)]
    pub plate: String,

    /// The invoice total, e.g. "2.400,00".
    #[arg(long)]
    pub amount: String,

    /// The invoice total spelled out, e.g. "Dois mil e quatrocentos reais".
    #[arg(long)]
    pub amount_in_words: String,

    /// The invoice number. Defaults to the last number used plus one.
    #[arg(long)]
    pub number: Option<u64>,

    /// Defaults to today.
    #[arg(long)]
    pub issue_date: Option<NaiveDate>,

    /// Defaults to today.
    #[arg(long)]
    pub due_date: Option<NaiveDate>,

    /// First day of the rental period. Defaults to today.
    #[arg(long)]
    pub period_start: Option<NaiveDate>,

    /// Last day of the rental period. Defaults to today.
    #[arg(long)]
    pub period_end: Option<NaiveDate>,

    /// The contract installment, e.g. "1/12". Defaults to the value in config.json.
    #[arg(long)]
    pub contract: Option<String>,

    /// The main line item. Defaults to the value in config.json.
    #[arg(long)]
    pub item: Option<String>,

    /// Where to write the documents. Defaults to the invoices directory in config.json.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------------
// Ledger
// -----------------------------------------------------------------------------

/// (Not shown): Args for the `locauto ledger` command.
#[derive(Debug, Parser, Clone)]
pub struct LedgerArgs {
    #[command(subcommand)]
    entity: LedgerSubcommand,
}

impl LedgerArgs {
    pub fn entity(&self) -> &LedgerSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum LedgerSubcommand {
    /// Show a vehicle's transactions, totals, balance and monthly balance.
    Show(ShowLedgerArgs),
    /// Record a manual transaction for a vehicle.
    Add(AddTransactionArgs),
    /// Remove a transaction by its row number, as printed by `ledger show`.
    Delete(DeleteTransactionArgs),
    /// Write the monthly balance bar chart of a vehicle to an HTML file.
    Chart(ChartArgs),
}

/// (Not shown): Args for the `locauto ledger show` command.
#[derive(Debug, Parser, Clone)]
pub struct ShowLedgerArgs {
    #[arg(long)]
    pub plate: String,
}

/// (Not shown): Args for the `locauto ledger add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddTransactionArgs {
    #[arg(long)]
    pub plate: String,

    #[arg(long, value_enum)]
    pub kind: Kind,

    /// A non-negative amount, e.g. "350,00".
    #[arg(long)]
    pub amount: String,

    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Defaults to "Manutenção".
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

/// (Not shown): Args for the `locauto ledger delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteTransactionArgs {
    /// The zero-based row of the transaction in transacoes.csv.
    #[arg(long)]
    pub row: usize,
}

/// (Not shown): Args for the `locauto ledger chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    #[arg(long)]
    pub plate: String,

    /// The HTML file to write. Defaults to grafico_{PLATE}.html in the invoices directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn default_locauto_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("locauto"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or LOCAUTO_HOME instead of relying on the default \
                locauto home directory.",
            );
            PathBuf::from("locauto")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
