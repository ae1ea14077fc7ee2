//! Rendering of invoices (HTML and PDF) and of the ledger chart.

mod chart;
mod html;
mod pdf;

use crate::config::Company;
use crate::model::{Amount, Client, Vehicle};
use chrono::NaiveDate;

pub(crate) use chart::{chart_page, monthly_balance_chart};
pub(crate) use html::invoice_html;
pub(crate) use pdf::invoice_pdf;

/// Everything printed on a rental invoice.
#[derive(Debug, Clone)]
pub(crate) struct Invoice<'a> {
    pub(crate) number: u64,
    pub(crate) issue_date: NaiveDate,
    pub(crate) due_date: NaiveDate,
    pub(crate) period_start: NaiveDate,
    pub(crate) period_end: NaiveDate,
    /// e.g. `1/12`
    pub(crate) contract: &'a str,
    pub(crate) item_description: &'a str,
    pub(crate) amount: Amount,
    pub(crate) amount_in_words: &'a str,
    pub(crate) client: &'a Client,
    pub(crate) vehicle: &'a Vehicle,
    pub(crate) company: &'a Company,
    /// PNG bytes for the letterhead. Only the HTML document shows it.
    pub(crate) logo_png: Option<&'a [u8]>,
}

impl Invoice<'_> {
    pub(crate) fn file_stem(&self) -> String {
        format!("fatura_{}", self.number)
    }
}

/// Dates are printed the Brazilian way.
pub(crate) fn br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::LazyLock;

    static CLIENT: LazyLock<Client> = LazyLock::new(|| Client {
        name: "Maria & Filhos Transportes".to_string(),
        tax_id: "05.261.064/0001-60".to_string(),
        address: "Av. Brasil, 100".to_string(),
        municipality: "Passos".to_string(),
        state: "MG".to_string(),
        postal_code: "37900-000".to_string(),
        phone: "(35) 99981-7121".to_string(),
        email: "maria@example.com".to_string(),
    });

    static VEHICLE: LazyLock<Vehicle> = LazyLock::new(|| Vehicle {
        plate: "ABC1D23".to_string(),
        make: "Fiat".to_string(),
        model: "Mobi".to_string(),
        year: 2022,
        color: "Branco".to_string(),
    });

    static COMPANY: LazyLock<Company> = LazyLock::new(Company::default);

    pub(crate) fn invoice() -> Invoice<'static> {
        let date = |d: u32| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        Invoice {
            number: 42,
            issue_date: date(1),
            due_date: date(10),
            period_start: date(1),
            period_end: date(31),
            contract: "3/12",
            item_description: "Locação de Veículo",
            amount: Amount::new(rust_decimal::Decimal::new(240000, 2)),
            amount_in_words: "Dois mil e quatrocentos reais",
            client: &CLIENT,
            vehicle: &VEHICLE,
            company: &COMPANY,
            logo_png: None,
        }
    }
}
