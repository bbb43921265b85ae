//! # drops-core
//! Foundation types, traits, and errors for the Drops dividend pool.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod units;
