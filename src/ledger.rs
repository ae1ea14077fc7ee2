//! The per-vehicle view over the transaction store.

use crate::model::{Amount, Kind, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;

/// A transaction together with its position in `transacoes.csv`, which is how it is addressed
/// for deletion.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Entry {
    pub row: usize,
    pub transaction: Transaction,
}

/// The net result of one calendar month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthlyBalance {
    /// `YYYY-MM`
    pub month: String,
    pub balance: Amount,
}

/// A financial summary of one vehicle.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Ledger {
    pub plate: String,
    /// Newest first.
    pub entries: Vec<Entry>,
    pub income: Amount,
    pub expense: Amount,
    /// `income - expense`
    pub balance: Amount,
    /// Oldest month first.
    pub monthly: Vec<MonthlyBalance>,
}

impl Ledger {
    /// Builds the ledger for `plate` out of every row of the transaction store.
    pub fn new(plate: &str, transactions: &[Transaction]) -> Self {
        let mut entries: Vec<Entry> = transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.plate == plate)
            .map(|(row, t)| Entry {
                row,
                transaction: t.clone(),
            })
            .collect();
        // Stable, so same-day rows keep their file order
        entries.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));

        let income = total(&entries, Kind::Income);
        let expense = total(&entries, Kind::Expense);

        let mut months: BTreeMap<String, Amount> = BTreeMap::new();
        for entry in &entries {
            let t = &entry.transaction;
            let month = months
                .entry(t.date.format("%Y-%m").to_string())
                .or_default();
            *month = match t.kind {
                Kind::Income => *month + t.amount,
                Kind::Expense => *month - t.amount,
            };
        }
        let monthly = months
            .into_iter()
            .map(|(month, balance)| MonthlyBalance { month, balance })
            .collect();

        Self {
            plate: plate.to_string(),
            entries,
            income,
            expense,
            balance: income - expense,
            monthly,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn total(entries: &[Entry], kind: Kind) -> Amount {
    entries
        .iter()
        .filter(|e| e.transaction.kind == kind)
        .map(|e| e.transaction.amount)
        .sum()
}
