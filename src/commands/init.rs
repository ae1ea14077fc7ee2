use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` with the default company letterhead and invoice defaults
/// - Creates `clientes.csv`, `veiculos.csv` and `transacoes.csv` with only their header rows
/// - Creates the invoice output directory
///
/// Files that already exist are left as they are, so running it twice is harmless.
///
/// # Arguments
/// - `locauto_home` - The directory that will be the root of data directory, e.g. `$HOME/locauto`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(locauto_home: &Path) -> Result<Out<()>> {
    let config = Config::create(locauto_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "The locauto directory is ready at {}. Edit {} to set the company letterhead",
        config.root().display(),
        config.config_path().display()
    )
    .into())
}
