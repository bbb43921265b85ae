//! Error types for the Drops pool.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CashError {
    #[error("insufficient cash balance: have {have}, need {need}")] InsufficientBalance { have: u128, need: u128 },
    #[error("insufficient cash allowance: have {have}, need {need}")] InsufficientAllowance { have: u128, need: u128 },
    #[error("cash balance overflow")] Overflow,
    #[error("cash transfer rejected: {0}")] Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("native unit decimals must be even, got {0}")] OddDecimals(u8),
    #[error("precision of {0} decimals does not fit in 128 bits")] PrecisionTooLarge(u8),
    #[error("cash decimals mismatch: configured {configured}, asset reports {asset}")] CashDecimalsMismatch { configured: u8, asset: u8 },
    #[error("empty configuration field: {0}")] EmptyField(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u128, need: u128 },
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("cash movement failed: {0}")] Cash(#[from] CashError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid length: expected 20 bytes, got {0}")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("empty amount")] Empty,
    #[error("invalid digit in amount: {0:?}")] InvalidDigit(String),
    #[error("too many fractional digits: {got} > {max}")] TooPrecise { got: usize, max: u8 },
    #[error("amount overflows 128 bits")] Overflow,
    #[error("unsupported precision: {0} decimals")] UnsupportedPrecision(u8),
}

#[derive(Error, Debug)]
pub enum DropsError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Cash(#[from] CashError),
    #[error(transparent)] Units(#[from] UnitsError),
    #[error(transparent)] Address(#[from] AddressError),
}
