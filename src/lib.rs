//! locauto keeps the clients, vehicles and finances of a small car-rental company in flat CSV
//! files and issues rental invoices as HTML and PDF documents.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
mod render;
mod store;
mod utils;

pub use config::{Company, Config, InvoiceDefaults};
pub use error::{Error, ErrorType, PubError, Result};
