//! Account — cash balance plus an append-only transaction log.
//!
//! All balance changes go through the typed operations below. Each operation
//! validates its preconditions, constructs the transaction against current
//! cash, appends it, and advances `cash` to the transaction's `post_balance`.
//! There is no rollback: a correction is a new transaction, never a mutation
//! of history.

use chrono::NaiveDate;
use thiserror::Error;

use super::transaction::Transaction;
use crate::fixed::Fixed;

/// A violated transaction precondition. Fatal to the simulation run that
/// raised it — it indicates a strategy or data bug, not a recoverable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Fixed),
    #[error("share count must be positive, got {0}")]
    NonPositiveShares(Fixed),
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Fixed),
    #[error("cannot sell {sold} shares when only {held} are held")]
    Oversell { sold: Fixed, held: Fixed },
    #[error("transaction dated {time} precedes last ledger entry at {last}")]
    NonMonotonicTime { time: NaiveDate, last: NaiveDate },
}

/// Simulated brokerage account.
#[derive(Debug, Clone)]
pub struct Account {
    cash: Fixed,
    log: Vec<Transaction>,
}

impl Account {
    /// Create an account with an Open marker at `time` and zero cash.
    pub fn open(time: NaiveDate) -> Self {
        Self {
            cash: Fixed::ZERO,
            log: vec![Transaction::Open { time }],
        }
    }

    pub fn cash(&self) -> Fixed {
        self.cash
    }

    /// The full transaction log, insertion order = chronological order.
    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.log.last()
    }

    fn check_time(&self, time: NaiveDate) -> Result<(), LedgerError> {
        match self.log.last() {
            Some(prev) if time < prev.time() => Err(LedgerError::NonMonotonicTime {
                time,
                last: prev.time(),
            }),
            _ => Ok(()),
        }
    }

    fn append(&mut self, tx: Transaction) {
        if let Some(post) = tx.post_balance() {
            self.cash = post;
        }
        self.log.push(tx);
    }

    pub fn deposit(
        &mut self,
        time: NaiveDate,
        amount: Fixed,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.check_time(time)?;
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.append(Transaction::Deposit {
            time,
            amount,
            post_balance: self.cash + amount,
            memo: memo.to_string(),
        });
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        time: NaiveDate,
        amount: Fixed,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.check_time(time)?;
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.append(Transaction::Withdraw {
            time,
            amount,
            post_balance: self.cash - amount,
            memo: memo.to_string(),
        });
        Ok(())
    }

    pub fn buy(
        &mut self,
        time: NaiveDate,
        asset: &str,
        shares: Fixed,
        price: Fixed,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.check_time(time)?;
        if !shares.is_positive() {
            return Err(LedgerError::NonPositiveShares(shares));
        }
        if !price.is_positive() {
            return Err(LedgerError::NonPositivePrice(price));
        }
        let value = shares.mul(price);
        self.append(Transaction::Buy {
            time,
            asset: asset.to_string(),
            shares,
            price,
            value,
            post_balance: self.cash - value,
            memo: memo.to_string(),
        });
        Ok(())
    }

    pub fn sell(
        &mut self,
        time: NaiveDate,
        asset: &str,
        shares_held: Fixed,
        shares_sold: Fixed,
        price: Fixed,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.check_time(time)?;
        if !shares_sold.is_positive() {
            return Err(LedgerError::NonPositiveShares(shares_sold));
        }
        if !price.is_positive() {
            return Err(LedgerError::NonPositivePrice(price));
        }
        if shares_sold > shares_held {
            return Err(LedgerError::Oversell {
                sold: shares_sold,
                held: shares_held,
            });
        }
        let value = shares_sold.mul(price);
        self.append(Transaction::Sell {
            time,
            asset: asset.to_string(),
            shares_held,
            shares_sold,
            price,
            value,
            post_balance: self.cash + value,
            memo: memo.to_string(),
        });
        Ok(())
    }

    /// Human-readable statement: one line per transaction.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for tx in &self.log {
            out.push_str(&tx.to_string());
            out.push('\n');
        }
        out
    }
}
