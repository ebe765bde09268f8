//! Domain types: transactions, the account ledger, and market series.

pub mod account;
pub mod series;
pub mod transaction;

pub use account::{Account, LedgerError};
pub use series::{check_aligned, AssetUniverse, PriceSeries, SeriesError};
pub use transaction::Transaction;
