//! Types that represent the core data model, such as `Client`, `Vehicle` and `Transaction`.
mod amount;
mod client;
pub mod format;
mod transaction;
mod vehicle;

pub use amount::{Amount, AmountError};
pub use client::Client;
pub use transaction::{Kind, Transaction};
pub use vehicle::Vehicle;
