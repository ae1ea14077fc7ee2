use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The last invoice number used, persisted as a single integer in `ultima_fatura.txt`.
///
/// The number is only ever moved forward. Issuing an invoice with a number at or below the
/// stored one leaves the file untouched, so gaps and duplicate numbers are both possible.
#[derive(Debug, Clone)]
pub(crate) struct InvoiceCounter {
    path: PathBuf,
}

impl InvoiceCounter {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// The last number saved. A missing or unparsable file reads as 0.
    pub(crate) async fn last(&self) -> Result<u64> {
        let Some(content) = utils::read_if_exists(&self.path).await? else {
            return Ok(0);
        };
        match content.trim().parse::<u64>() {
            Ok(n) => Ok(n),
            Err(e) => {
                warn!(
                    "Ignoring unreadable invoice counter in {} ({e}), starting from 0",
                    self.path.display()
                );
                Ok(0)
            }
        }
    }

    /// The number suggested for the next invoice.
    ///
    /// # Errors
    /// - Returns an error if the last number saved is `u64::MAX`.
    pub(crate) async fn next(&self) -> Result<u64> {
        let last = self.last().await?;
        last.checked_add(1).with_context(|| {
            format!(
                "The invoice counter in {} is at its maximum ({last}), give --number explicitly",
                self.path.display()
            )
        })
    }

    /// Saves `used` if it is greater than the stored number. Returns whether the file changed.
    pub(crate) async fn advance(&self, used: u64) -> Result<bool> {
        let last = self.last().await?;
        if used <= last {
            debug!("Invoice number {used} does not exceed {last}, counter unchanged");
            return Ok(false);
        }
        utils::write(&self.path, used.to_string()).await?;
        debug!("Invoice counter advanced from {last} to {used}");
        Ok(true)
    }
}
