//! Core pool types: addresses and per-account records.
//!
//! All monetary values are integers in base units. Raw balances carry the
//! native unit's precision; weighted shares carry the weighting function's
//! output precision; debts are signed cash amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// A 20-byte account address.
///
/// Displays and parses as `0x`-prefixed lowercase hex, and serializes the
/// same way.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Address with every byte set to `byte`. Handy for fixtures.
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Everything the pool knows about one account.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AccountRecord {
    /// Holding of the native unit.
    pub raw_balance: u128,
    /// Weighted shares derived from `raw_balance`.
    pub weighted_shares: u128,
    /// Whether the account participates in dividend distribution.
    pub in_pool: bool,
    /// Signed accounting basis in cash units.
    pub debt: i128,
}

/// A change in one enrolled account's weighted shares.
///
/// Produced by the token ledger on every balance change and consumed by the
/// dividend engine's settle-then-rebase step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareChange {
    /// The account whose shares changed.
    pub address: Address,
    /// Shares counted toward the pool total before the change.
    pub old_shares: u128,
    /// Shares counted toward the pool total after the change.
    pub new_shares: u128,
}

impl ShareChange {
    /// Whether the change actually moves the account's shares.
    pub fn is_noop(&self) -> bool {
        self.old_shares == self.new_shares
    }
}
