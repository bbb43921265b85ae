//! Pool configuration.
//!
//! Provides [`PoolConfig`] with the reference deployment's defaults: 18
//! decimals for both the native unit and the cash asset. Validation runs
//! before any pool state exists.

use drops_core::constants::{DEFAULT_DECIMALS, DEFAULT_NAME, DEFAULT_SYMBOL, MAX_DECIMALS};
use drops_core::error::ConfigError;
use drops_core::types::Address;
use serde::{Deserialize, Serialize};

/// Construction-time configuration of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Human-readable token name.
    pub name: String,
    /// Token ticker symbol.
    pub symbol: String,
    /// Decimal precision of the native unit. Must be even.
    pub decimals: u8,
    /// Decimal precision of the backing cash asset.
    pub cash_decimals: u8,
    /// Address under which the pool holds cash in the cash asset.
    pub custody: Address,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            cash_decimals: DEFAULT_DECIMALS,
            custody: Address::repeat(0xD0),
        }
    }
}

impl PoolConfig {
    /// Check every construction-time constraint.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::OddDecimals`] if the native precision is odd
    /// - [`ConfigError::PrecisionTooLarge`] if either precision exceeds
    ///   [`MAX_DECIMALS`]
    /// - [`ConfigError::EmptyField`] for an empty name or symbol
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyField("name"));
        }
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptyField("symbol"));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::PrecisionTooLarge(self.decimals));
        }
        if self.cash_decimals > MAX_DECIMALS {
            return Err(ConfigError::PrecisionTooLarge(self.cash_decimals));
        }
        if self.decimals % 2 != 0 {
            return Err(ConfigError::OddDecimals(self.decimals));
        }
        Ok(())
    }
}
