use crate::model::Amount;
use crate::store::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether money came in or went out. Stored as `Entrada` or `Saída`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Kind {
    #[default]
    #[serde(rename = "Entrada")]
    #[value(alias = "entrada")]
    Income,
    #[serde(rename = "Saída")]
    #[value(alias = "saida")]
    Expense,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

/// Represents a single row of `transacoes.csv`.
///
/// Transactions have no key of their own. They are addressed by their zero-based position in
/// the file, so deleting one shifts the position of every row after it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The vehicle this transaction belongs to. Not checked against `veiculos.csv`.
    #[serde(rename = "Placa")]
    pub plate: String,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Tipo")]
    pub kind: Kind,
    #[serde(rename = "Valor")]
    pub amount: Amount,
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Descricao")]
    pub description: String,
}

impl Record for Transaction {
    const HEADERS: &'static [&'static str] =
        &["Placa", "Data", "Tipo", "Valor", "Categoria", "Descricao"];
}
