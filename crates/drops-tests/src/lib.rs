//! Scenario and adversarial test suite for the Drops dividend pool.
//!
//! This crate contains integration tests that drive the pool through the
//! deployment scenario, carry-over edge cases, failing cash assets and
//! randomized operation sequences. Accounting invariants are checked after
//! every step.

pub mod helpers;
