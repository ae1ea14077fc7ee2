//! Fleet ledger command handlers.

use crate::args::{AddTransactionArgs, ChartArgs, DeleteTransactionArgs, ShowLedgerArgs};
use crate::commands::{markdown_table, plural, Out};
use crate::error::{invalid, ErrorType, IntoResult};
use crate::ledger::{Entry, Ledger};
use crate::model::{Amount, Transaction, Vehicle};
use crate::render::{chart_page, monthly_balance_chart};
use crate::{utils, Config, Result};
use chrono::Local;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_CATEGORY: &str = "Manutenção";

/// Shows the transactions of one vehicle, newest first, with income and expense totals, the
/// balance and the balance of each month.
///
/// # Errors
/// - Returns a validation error if the plate is not registered.
pub async fn show_ledger(config: Config, args: ShowLedgerArgs) -> Result<Out<Ledger>> {
    let vehicle = find_vehicle(&config, &args.plate).await?;
    let transactions = config
        .transactions()
        .load()
        .await
        .pub_result(ErrorType::Store)?;
    let ledger = Ledger::new(&vehicle.plate, &transactions);

    let mut message = format!(
        "{vehicle}, {} {}\n\n",
        vehicle.year,
        if vehicle.color.is_empty() { "-" } else { vehicle.color.as_str() }
    );
    if ledger.is_empty() {
        message.push_str("No transactions recorded");
        return Ok(Out::new(message, ledger));
    }

    let rows: Vec<Vec<String>> = ledger
        .entries
        .iter()
        .map(|e| {
            let t = &e.transaction;
            vec![
                e.row.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.amount.brl(),
                t.category.clone(),
                t.description.clone(),
            ]
        })
        .collect();
    message.push_str(&markdown_table(
        &["Linha", "Data", "Tipo", "Valor", "Categoria", "Descrição"],
        &rows,
    ));
    message.push_str(&format!(
        "\n\nEntradas: {}\nSaídas: {}\nBalanço: {}\n\nBalanço mensal:",
        ledger.income, ledger.expense, ledger.balance
    ));
    for month in &ledger.monthly {
        message.push_str(&format!("\n  {} {}", month.month, month.balance));
    }
    Ok(Out::new(message, ledger))
}

/// Records a manual transaction for a registered vehicle and returns it with its row.
///
/// The date defaults to today and the category to `Manutenção`.
///
/// # Errors
/// - Returns a validation error if the plate is not registered or the amount does not parse or
///   is negative.
pub async fn add_transaction(config: Config, args: AddTransactionArgs) -> Result<Out<Entry>> {
    let vehicle = find_vehicle(&config, &args.plate).await?;
    let amount = Amount::from_str(&args.amount).pub_result(ErrorType::Validation)?;
    if amount.is_negative() {
        return Err(invalid(format!(
            "The amount must not be negative, got {amount}"
        )));
    }

    let category = args
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let transaction = Transaction {
        plate: vehicle.plate,
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        kind: args.kind,
        amount,
        category,
        description: args.description.unwrap_or_default().trim().to_string(),
    };
    let row = config
        .transactions()
        .append(transaction.clone())
        .await
        .pub_result(ErrorType::Store)?;

    let message = format!(
        "{} of {amount} recorded for {} at row {row}",
        transaction.kind, transaction.plate
    );
    Ok(Out::new(message, Entry { row, transaction }))
}

/// Removes the transaction at `args.row` of `transacoes.csv`. Rows after it move up by one.
///
/// # Errors
/// - Returns a validation error if there is no such row.
pub async fn delete_transaction(
    config: Config,
    args: DeleteTransactionArgs,
) -> Result<Out<Transaction>> {
    let store = config.transactions();
    let mut transactions = store.load().await.pub_result(ErrorType::Store)?;
    if args.row >= transactions.len() {
        return Err(invalid(format!(
            "There is no transaction at row {}, the ledger has {}",
            args.row,
            plural(transactions.len(), "row", "rows")
        )));
    }
    let removed = transactions.remove(args.row);
    store.save(&transactions).await.pub_result(ErrorType::Store)?;
    debug!("Removed row {} of {}", args.row, store.path().display());

    let message = format!(
        "Deleted the {} of {} on {} for {}",
        removed.kind, removed.amount, removed.date, removed.plate
    );
    Ok(Out::new(message, removed))
}

/// Writes the monthly balance chart of a vehicle as a standalone HTML page and returns its path.
///
/// # Errors
/// - Returns a validation error if the plate is not registered or has no transactions.
/// - Returns a render error if the page cannot be written.
pub async fn ledger_chart(config: Config, args: ChartArgs) -> Result<Out<PathBuf>> {
    let vehicle = find_vehicle(&config, &args.plate).await?;
    let transactions = config
        .transactions()
        .load()
        .await
        .pub_result(ErrorType::Store)?;
    let ledger = Ledger::new(&vehicle.plate, &transactions);
    if ledger.is_empty() {
        return Err(invalid(format!(
            "There are no transactions to chart for {}",
            vehicle.plate
        )));
    }

    let chart = monthly_balance_chart(&ledger);
    let page = chart_page(&format!("Balanço {}", vehicle.plate), &chart).into_string();
    let path = match args.out {
        Some(path) => path,
        None => config
            .invoices_dir()
            .join(format!("grafico_{}.html", file_safe(&vehicle.plate))),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::make_dir(parent).await.pub_result(ErrorType::Render)?;
    }
    utils::write(&path, page)
        .await
        .pub_result(ErrorType::Render)?;
    debug!("Chart for {} written", vehicle.plate);

    Ok(Out::new(
        format!(
            "Chart of {} written to {}",
            plural(ledger.monthly.len(), "month", "months"),
            path.display()
        ),
        path,
    ))
}

/// Keeps a plate usable as part of a file name inside the invoices directory.
fn file_safe(plate: &str) -> String {
    plate
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

async fn find_vehicle(config: &Config, plate: &str) -> Result<Vehicle> {
    let plate = Vehicle::normalize_plate(plate);
    let vehicles = config.vehicles().load().await.pub_result(ErrorType::Store)?;
    vehicles
        .into_iter()
        .find(|v| v.plate == plate)
        .ok_or_else(|| invalid(format!("No vehicle with plate '{plate}'")))
}
