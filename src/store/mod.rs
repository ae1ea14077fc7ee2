//! Flat CSV record stores.
//!
//! Every store is a single CSV file with a fixed header row. A store is always read in full and
//! written in full: `load` returns every row and `save` overwrites the file. There is no
//! locking, so two processes writing the same store race and the last writer wins.

mod counter;

use crate::{utils, Result};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub(crate) use counter::InvoiceCounter;

/// A row type that can be kept in a `Store`.
pub(crate) trait Record: Serialize + DeserializeOwned + Clone + Debug {
    /// The header row. Column names must match the serde field names of the record.
    const HEADERS: &'static [&'static str];
}

/// A CSV file holding rows of type `R`.
#[derive(Debug, Clone)]
pub(crate) struct Store<R>
where
    R: Record,
{
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R> Store<R>
where
    R: Record,
{
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row. If the file does not exist it is created with only the header row and
    /// an empty list is returned.
    pub(crate) async fn load(&self) -> Result<Vec<R>> {
        let content = match utils::read_if_exists(&self.path).await? {
            Some(content) => content,
            None => {
                debug!("Creating empty store {}", self.path.display());
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
        };

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut rows = Vec::new();
        for (ix, result) in reader.deserialize().enumerate() {
            let row: R = result.with_context(|| {
                format!(
                    "Unable to parse row {} of {}",
                    ix + 2,
                    self.path.display()
                )
            })?;
            rows.push(row);
        }
        trace!("Loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Overwrites the file with the header row followed by `rows`.
    pub(crate) async fn save(&self, rows: &[R]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(R::HEADERS)
            .context("Unable to write the header row")?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Unable to serialize row {row:?}"))?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to flush CSV data: {e}"))?;
        utils::write(&self.path, data).await?;
        trace!("Saved {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }

    /// Loads the store, appends `row` and saves it. Returns the position of the new row.
    pub(crate) async fn append(&self, row: R) -> Result<usize> {
        let mut rows = self.load().await?;
        rows.push(row);
        self.save(&rows).await?;
        Ok(rows.len() - 1)
    }
}
