//! Thread-safe handle to a pool.
//!
//! [`SharedPool`] serializes every operation behind a `parking_lot::Mutex`,
//! so callers on several threads observe one total order of state
//! transitions.

use std::sync::Arc;

use drops_core::error::LedgerError;
use drops_core::traits::{CashAsset, WeightingFunction};
use drops_core::types::Address;
use parking_lot::Mutex;

use crate::pool::DropsPool;
use crate::snapshot::PoolSnapshot;
use crate::weighting::SqrtWeighting;

/// Cloneable, lock-protected [`DropsPool`].
#[derive(Debug)]
pub struct SharedPool<C, W = SqrtWeighting> {
    inner: Arc<Mutex<DropsPool<C, W>>>,
}

impl<C, W> Clone for SharedPool<C, W> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: CashAsset, W: WeightingFunction> SharedPool<C, W> {
    pub fn new(pool: DropsPool<C, W>) -> Self {
        Self { inner: Arc::new(Mutex::new(pool)) }
    }

    /// Run `f` with exclusive access to the pool.
    pub fn with<R>(&self, f: impl FnOnce(&mut DropsPool<C, W>) -> R) -> R {
        let mut pool = self.inner.lock();
        f(&mut pool)
    }

    pub fn enroll(&self, address: Address) -> Result<bool, LedgerError> {
        self.inner.lock().enroll(address)
    }

    pub fn mint(&self, caller: &Address, to: &Address, cash_amount: u128) -> Result<u128, LedgerError> {
        self.inner.lock().mint(caller, to, cash_amount)
    }

    pub fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        self.inner.lock().transfer(from, to, amount)
    }

    pub fn withdraw(&self, caller: &Address, amount: u128) -> Result<(), LedgerError> {
        self.inner.lock().withdraw(caller, amount)
    }

    pub fn withdrawable_cash_of(&self, address: &Address) -> Result<u128, LedgerError> {
        self.inner.lock().withdrawable_cash_of(address)
    }

    pub fn pool_cash(&self) -> u128 {
        self.inner.lock().pool_cash()
    }

    pub fn snapshot(&self) -> Result<PoolSnapshot, LedgerError> {
        self.inner.lock().snapshot()
    }
}
