//! Invoice command handlers.

use crate::args::IssueInvoiceArgs;
use crate::commands::Out;
use crate::error::{invalid, ErrorType, IntoResult};
use crate::model::{Amount, Kind, Transaction, Vehicle};
use crate::render::{invoice_html, invoice_pdf, Invoice};
use crate::{utils, Config, Result};
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

/// The outcome of `issue_invoice`.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedInvoice {
    pub number: u64,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    /// The income recorded in the ledger for this invoice.
    pub transaction: Transaction,
    /// The row of `transaction` in `transacoes.csv`.
    pub transaction_row: usize,
    /// False when the number did not exceed the last one saved.
    pub counter_advanced: bool,
}

/// Reports the number `issue_invoice` will use when none is given.
pub async fn next_invoice_number(config: Config) -> Result<Out<u64>> {
    let counter = config.invoice_counter();
    let next = counter.next().await.pub_result(ErrorType::Store)?;
    debug!("Next invoice number read from {}", counter.path().display());
    Ok(Out::new(format!("The next invoice number is {next}"), next))
}

/// Issues a rental invoice.
///
/// Writes `fatura_{n}.html` and `fatura_{n}.pdf` to the output directory, records the amount as
/// an `Entrada` in the vehicle's ledger and moves the invoice counter forward when `n` exceeds
/// it. Every input is checked before the first file is written.
///
/// # Arguments
/// - `args.client` is matched against client names exactly. The first match is used.
/// - `args.plate` is matched against plates after trimming and uppercasing.
/// - `args.amount` is a BRL amount such as `2.400,00` or `R$ 2.400,00`.
/// - `args.number` defaults to the last number saved plus one.
/// - Missing dates default to today and missing texts to the invoice defaults in `config.json`.
///
/// # Errors
/// - Returns a validation error if there are no clients or no vehicles, the client or vehicle
///   is unknown, the number is 0 or the amount does not parse.
/// - Returns a render error if a document cannot be produced or written.
pub async fn issue_invoice(config: Config, args: IssueInvoiceArgs) -> Result<Out<IssuedInvoice>> {
    let clients = config.clients().load().await.pub_result(ErrorType::Store)?;
    let vehicles = config.vehicles().load().await.pub_result(ErrorType::Store)?;
    if clients.is_empty() || vehicles.is_empty() {
        return Err(invalid(
            "Register at least one client and one vehicle before issuing an invoice",
        ));
    }

    let client_name = args.client.trim();
    let Some(client) = clients.iter().find(|c| c.name == client_name) else {
        return Err(invalid(format!("No client named '{client_name}'")));
    };
    let plate = Vehicle::normalize_plate(&args.plate);
    let Some(vehicle) = vehicles.iter().find(|v| v.plate == plate) else {
        return Err(invalid(format!("No vehicle with plate '{plate}'")));
    };

    let counter = config.invoice_counter();
    let number = match args.number {
        Some(n) => n,
        None => counter.next().await.pub_result(ErrorType::Store)?,
    };
    if number < 1 {
        return Err(invalid("The invoice number must be at least 1"));
    }

    let amount = Amount::from_str(&args.amount).pub_result(ErrorType::Validation)?;

    let today = Local::now().date_naive();
    let issue_date = args.issue_date.unwrap_or(today);
    let defaults = config.invoice_defaults();
    let logo = match config.logo_path() {
        Some(path) => match utils::read_bytes(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Issuing the invoice without a logo: {e:#}");
                None
            }
        },
        None => None,
    };

    let invoice = Invoice {
        number,
        issue_date,
        due_date: args.due_date.unwrap_or(today),
        period_start: args.period_start.unwrap_or(today),
        period_end: args.period_end.unwrap_or(today),
        contract: args.contract.as_deref().unwrap_or(&defaults.contract),
        item_description: args.item.as_deref().unwrap_or(&defaults.item_description),
        amount,
        amount_in_words: args.amount_in_words.trim(),
        client,
        vehicle,
        company: config.company(),
        logo_png: logo.as_deref(),
    };

    let html = invoice_html(&invoice).into_string();
    let pdf = invoice_pdf(&invoice).pub_result(ErrorType::Render)?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.invoices_dir());
    utils::make_dir(&out_dir)
        .await
        .pub_result(ErrorType::Render)?;
    let html_path = out_dir.join(format!("{}.html", invoice.file_stem()));
    let pdf_path = out_dir.join(format!("{}.pdf", invoice.file_stem()));
    utils::write(&html_path, html)
        .await
        .pub_result(ErrorType::Render)?;
    utils::write(&pdf_path, pdf)
        .await
        .pub_result(ErrorType::Render)?;
    debug!("Wrote {} and {}", html_path.display(), pdf_path.display());

    let transaction = Transaction {
        plate: vehicle.plate.clone(),
        date: issue_date,
        kind: Kind::Income,
        amount,
        category: defaults.category.clone(),
        description: format!("Fatura Nº {number} - Cliente: {}", client.name),
    };
    let transaction_row = config
        .transactions()
        .append(transaction.clone())
        .await
        .pub_result(ErrorType::Store)?;

    let counter_advanced = counter
        .advance(number)
        .await
        .pub_result(ErrorType::Store)?;
    if !counter_advanced {
        warn!("Invoice number {number} is not above the last one saved, the counter was kept");
    }

    let message = format!(
        "Invoice {number} issued for {} ({}), {amount}\n{}\n{}",
        client.name,
        vehicle.plate,
        html_path.display(),
        pdf_path.display()
    );
    Ok(Out::new(
        message,
        IssuedInvoice {
            number,
            html_path,
            pdf_path,
            transaction,
            transaction_row,
            counter_advanced,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PubError;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn args(client: &str, plate: &str, amount: &str) -> IssueInvoiceArgs {
        IssueInvoiceArgs {
            client: client.to_string(),
            plate: plate.to_string(),
            amount: amount.to_string(),
            amount_in_words: "Dois mil e quatrocentos reais".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            period_start: NaiveDate::from_ymd_opt(2025, 3, 1),
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..IssueInvoiceArgs::default()
        }
    }

    async fn env_with_fleet() -> TestEnv {
        let env = TestEnv::new().await;
        env.insert_client("Maria").await;
        env.insert_vehicle("ABC1D23").await;
        env
    }

    #[tokio::test]
    async fn test_next_invoice_number() {
        let env = TestEnv::new().await;
        let out = next_invoice_number(env.config()).await.unwrap();
        assert_eq!(out.structure(), Some(&1));

        env.set_last_invoice(41);
        let out = next_invoice_number(env.config()).await.unwrap();
        assert_eq!(out.structure(), Some(&42));
        assert_eq!(out.message(), "The next invoice number is 42");
    }

    #[tokio::test]
    async fn test_issue_invoice() {
        let env = env_with_fleet().await;
        env.set_last_invoice(6);

        let out = issue_invoice(env.config(), args("Maria", "abc1d23", "R$ 2.400,00"))
            .await
            .unwrap();

        let issued = out.structure().unwrap();
        assert_eq!(issued.number, 7);
        assert!(issued.counter_advanced);
        assert_eq!(env.read_last_invoice().unwrap(), "7");

        assert_eq!(issued.html_path, env.config().invoices_dir().join("fatura_7.html"));
        let html = std::fs::read_to_string(&issued.html_path).unwrap();
        assert!(html.contains("<strong>N°:</strong> 7"));
        assert!(html.contains("Placa Atual: ABC1D23"));
        assert!(html.contains("<strong>R$ 2.400,00</strong>"));
        let pdf = std::fs::read(&issued.pdf_path).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));

        let transactions = env.transactions().await;
        assert_eq!(transactions.len(), 1);
        let txn = &transactions[0];
        assert_eq!(txn, &issued.transaction);
        assert_eq!(issued.transaction_row, 0);
        assert_eq!(txn.plate, "ABC1D23");
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(txn.kind, Kind::Income);
        assert_eq!(txn.amount.plain(), "2400.00");
        assert_eq!(txn.category, "Aluguel");
        assert_eq!(txn.description, "Fatura Nº 7 - Cliente: Maria");
    }

    #[tokio::test]
    async fn test_issue_invoice_with_lower_number_keeps_counter() {
        let env = env_with_fleet().await;
        env.set_last_invoice(10);

        let mut args = args("Maria", "ABC1D23", "100,00");
        args.number = Some(3);
        let out = issue_invoice(env.config(), args).await.unwrap();

        let issued = out.structure().unwrap();
        assert_eq!(issued.number, 3);
        assert!(!issued.counter_advanced);
        assert!(issued.pdf_path.ends_with("fatura_3.pdf"));
        assert_eq!(env.read_last_invoice().unwrap(), "10");
        assert_eq!(env.transactions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_issue_invoice_defaults_and_out_dir() {
        let env = env_with_fleet().await;
        let out_dir = env.config().root().join("elsewhere");

        let mut args = args("Maria", "ABC1D23", "2.400,00");
        args.out_dir = Some(out_dir.clone());
        let out = issue_invoice(env.config(), args).await.unwrap();

        let issued = out.structure().unwrap();
        assert_eq!(issued.number, 1);
        assert_eq!(issued.html_path, out_dir.join("fatura_1.html"));
        let html = std::fs::read_to_string(&issued.html_path).unwrap();
        assert!(html.contains("Contrato: 1/12"));
        assert!(html.contains("Locação de Veículo - R$ 2.400,00"));
    }

    #[tokio::test]
    async fn test_issue_invoice_requires_clients_and_vehicles() {
        let env = TestEnv::new().await;
        env.insert_client("Maria").await;

        let err = issue_invoice(env.config(), args("Maria", "ABC1D23", "10,00"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("at least one client and one vehicle"));
        assert!(env.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_issue_invoice_unknown_client_or_vehicle() {
        let env = env_with_fleet().await;

        let err = issue_invoice(env.config(), args("Pedro", "ABC1D23", "10,00"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No client named 'Pedro'"));

        let err = issue_invoice(env.config(), args("Maria", "ZZZ0Z00", "10,00"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No vehicle with plate 'ZZZ0Z00'"));
    }

    #[tokio::test]
    async fn test_issue_invoice_invalid_amount_writes_nothing() {
        let env = env_with_fleet().await;

        let err = issue_invoice(env.config(), args("Maria", "ABC1D23", "dois mil"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("dois mil"));
        assert_eq!(
            err.downcast_ref::<PubError>().unwrap().error_type(),
            ErrorType::Validation
        );
        assert!(env.transactions().await.is_empty());
        assert!(env.read_last_invoice().is_none());
        let written = std::fs::read_dir(env.config().invoices_dir()).unwrap().count();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_issue_invoice_number_zero() {
        let env = env_with_fleet().await;
        let mut args = args("Maria", "ABC1D23", "10,00");
        args.number = Some(0);

        let err = issue_invoice(env.config(), args).await.unwrap_err();

        assert!(err.to_string().contains("at least 1"));
        assert!(env.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_issue_invoice_embeds_logo() {
        let env = env_with_fleet().await;
        let root = env.config().root().to_path_buf();
        std::fs::write(root.join("logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
        std::fs::write(
            env.config().config_path(),
            r#"{"app_name": "locauto", "config_version": 1, "logo_path": "logo.png"}"#,
        )
        .unwrap();
        let config = Config::load(&root).await.unwrap();

        let out = issue_invoice(config, args("Maria", "ABC1D23", "10,00"))
            .await
            .unwrap();

        let html = std::fs::read_to_string(&out.structure().unwrap().html_path).unwrap();
        assert!(html.contains("data:image/png;base64,iVBORw=="));
    }

    #[tokio::test]
    async fn test_issue_invoice_missing_logo_is_skipped() {
        let env = env_with_fleet().await;
        let root = env.config().root().to_path_buf();
        std::fs::write(
            env.config().config_path(),
            r#"{"app_name": "locauto", "config_version": 1, "logo_path": "missing.png"}"#,
        )
        .unwrap();
        let config = Config::load(&root).await.unwrap();

        let out = issue_invoice(config, args("Maria", "ABC1D23", "10,00"))
            .await
            .unwrap();

        let html = std::fs::read_to_string(&out.structure().unwrap().html_path).unwrap();
        assert!(!html.contains("<img"));
    }
}
