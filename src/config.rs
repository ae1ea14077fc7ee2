//! Configuration file handling for locauto.
//!
//! The configuration file is stored at `$LOCAUTO_HOME/config.json`. It carries the company
//! letterhead printed on every invoice and the defaults used when issuing one. The same
//! directory holds the record stores and the invoice output directory.

use crate::model::{Client, Transaction, Vehicle};
use crate::store::{InvoiceCounter, Store};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "locauto";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const CLIENTS_CSV: &str = "clientes.csv";
const VEHICLES_CSV: &str = "veiculos.csv";
const TRANSACTIONS_CSV: &str = "transacoes.csv";
const INVOICE_COUNTER: &str = "ultima_fatura.txt";
const INVOICES_DIR: &str = "faturas";

/// The `Config` object represents the data directory of the app. You instantiate it by
/// providing the path to `$LOCAUTO_HOME` and from there it loads `$LOCAUTO_HOME/config.json`.
/// It hands out the stores that live in that directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory with a default `config.json`, the invoice output directory
    /// and empty stores. Existing stores are left untouched.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the locauto home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        let config = Self {
            root,
            config_path,
            config_file,
        };
        utils::make_dir(&config.invoices_dir()).await?;

        // Loading a missing store creates it with its header row
        config.clients().load().await?;
        config.vehicles().load().await?;
        config.transactions().load().await?;

        Ok(config)
    }

    /// This will
    /// - validate that the `locauto_home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(locauto_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = locauto_home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The locauto home directory '{}' is missing, run 'locauto init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'locauto init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn company(&self) -> &Company {
        &self.config_file.company
    }

    pub fn invoice_defaults(&self) -> &InvoiceDefaults {
        &self.config_file.invoice
    }

    /// Where rendered invoices are written. Relative paths are resolved against the home
    /// directory.
    pub fn invoices_dir(&self) -> PathBuf {
        self.resolve(
            self.config_file
                .invoices_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(INVOICES_DIR)),
        )
    }

    /// The logo embedded in the invoice letterhead, if one is configured.
    pub fn logo_path(&self) -> Option<PathBuf> {
        self.config_file
            .logo_path
            .clone()
            .map(|p| self.resolve(p))
    }

    pub(crate) fn clients(&self) -> Store<Client> {
        Store::new(self.root.join(CLIENTS_CSV))
    }

    pub(crate) fn vehicles(&self) -> Store<Vehicle> {
        Store::new(self.root.join(VEHICLES_CSV))
    }

    pub(crate) fn transactions(&self) -> Store<Transaction> {
        Store::new(self.root.join(TRANSACTIONS_CSV))
    }

    pub(crate) fn invoice_counter(&self) -> InvoiceCounter {
        InvoiceCounter::new(self.root.join(INVOICE_COUNTER))
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// The company letterhead printed at the top of every invoice.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Company {
    pub name: String,
    /// Street, city and postal code on a single line.
    pub address: String,
    pub cnpj: String,
    pub phone: String,
    /// The legal note printed at the bottom of the invoice.
    pub footer: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: "HT Locações Auto LTDA".to_string(),
            address: "Rua dos Contabilistas, 184 - PASSOS/MG CEP 37900-114".to_string(),
            cnpj: "05.261.064/0001-60".to_string(),
            phone: "(35)999817121".to_string(),
            footer: "Atividade não sujeita ao ISSQN e à emissão de NF conforme Lei 116/03 - \
                     Item 3.01"
                .to_string(),
        }
    }
}

/// Values used by `invoice issue` when the corresponding argument is not given.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct InvoiceDefaults {
    /// The contract installment label, e.g. `1/12`.
    pub contract: String,
    pub item_description: String,
    /// The ledger category of the income transaction recorded for each invoice.
    pub category: String,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            contract: "1/12".to_string(),
            item_description: "Locação de Veículo".to_string(),
            category: "Aluguel".to_string(),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "locauto",
///   "config_version": 1,
///   "company": {
///     "name": "HT Locações Auto LTDA",
///     "address": "Rua dos Contabilistas, 184 - PASSOS/MG CEP 37900-114",
///     "cnpj": "05.261.064/0001-60",
///     "phone": "(35)999817121",
///     "footer": "Atividade não sujeita ao ISSQN e à emissão de NF conforme Lei 116/03 - Item 3.01"
///   },
///   "invoice": {
///     "contract": "1/12",
///     "item_description": "Locação de Veículo",
///     "category": "Aluguel"
///   },
///   "logo_path": "logo.png",
///   "invoices_dir": "faturas"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "locauto"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    #[serde(default)]
    company: Company,

    #[serde(default)]
    invoice: InvoiceDefaults,

    /// Path to a PNG logo (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo_path: Option<PathBuf>,

    /// Invoice output directory (optional, relative to the home directory or absolute)
    /// Defaults to $LOCAUTO_HOME/faturas if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoices_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            company: Company::default(),
            invoice: InvoiceDefaults::default(),
            logo_path: None,
            invoices_dir: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is unsupported. Is a newer version of locauto available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
