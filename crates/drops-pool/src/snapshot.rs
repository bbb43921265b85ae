//! Point-in-time export of pool state.

use std::fs;
use std::io;
use std::path::Path;

use drops_core::types::Address;
use serde::{Deserialize, Serialize};

/// One account as seen by a [`PoolSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: Address,
    pub raw_balance: u128,
    pub weighted_shares: u128,
    pub in_pool: bool,
    pub debt: i128,
    pub withdrawable: u128,
}

/// Whole-pool state, accounts in address order.
///
/// Two snapshots compare equal exactly when every observable quantity of
/// the pool is the same, which is what rollback tests rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub share_decimals: u8,
    pub cash_decimals: u8,
    pub total_supply: u128,
    pub pool_cash: u128,
    pub distributable_cash: u128,
    pub total_weighted_shares: u128,
    pub member_count: usize,
    pub accounts: Vec<AccountSnapshot>,
}

impl PoolSnapshot {
    /// Find an account by address.
    pub fn account(&self, address: &Address) -> Option<&AccountSnapshot> {
        self.accounts.iter().find(|a| a.address == *address)
    }

    /// Sum of every enrolled account's withdrawable cash.
    pub fn total_withdrawable(&self) -> u128 {
        self.accounts
            .iter()
            .filter(|a| a.in_pool)
            .fold(0u128, |acc, a| acc.saturating_add(a.withdrawable))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the snapshot as JSON to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
