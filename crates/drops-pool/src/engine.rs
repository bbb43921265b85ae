//! Dividend engine: pooled cash accounting with live pro-rata claims.
//!
//! An enrolled account's claim is `shares * distributable_cash / total_shares`,
//! recomputed live. Its withdrawable amount is the claim minus a signed debt
//! basis, clamped to `[0, pool_cash]`.
//!
//! Rules:
//! 1. Deposits grow `pool_cash` and `distributable_cash` by the same amount.
//! 2. On a share change the changer's pending claim is settled with its old
//!    shares and carried into a new debt basis against its new shares. The
//!    basis is rounded up, so the change never grows the changer's claim and
//!    shrinks it by at most one base unit.
//! 3. When total shares shrink, `distributable_cash` shrinks in proportion so
//!    no bystander's claim grows.
//! 4. Carry-over: if total shares were zero, the changer's debt is left as is,
//!    making cash deposited while nobody held shares claimable by the first
//!    participant(s).
//! 5. Withdrawals reduce `pool_cash` and raise the withdrawer's debt by the
//!    amount paid out.

use std::collections::BTreeMap;

use drops_core::error::LedgerError;
use drops_core::types::{Address, ShareChange};
use tracing::debug;

use crate::math::{checked_mul_div, checked_mul_div_ceil, to_signed};

/// Pool-wide cash accounting and per-account debt bases.
#[derive(Debug, Clone, Default)]
pub struct DividendEngine {
    debts: BTreeMap<Address, i128>,
    distributable_cash: u128,
    pool_cash: u128,
    total_weighted_shares: u128,
}

/// Engine state of the accounts an operation is about to touch.
#[derive(Debug, Clone)]
pub struct EngineCheckpoint {
    distributable_cash: u128,
    pool_cash: u128,
    total_weighted_shares: u128,
    debts: Vec<(Address, Option<i128>)>,
}

impl DividendEngine {
    /// Create an engine with an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cash held by the pool and not yet withdrawn.
    pub fn pool_cash(&self) -> u128 {
        self.pool_cash
    }

    /// Cash base against which live claims are computed.
    pub fn distributable_cash(&self) -> u128 {
        self.distributable_cash
    }

    /// Sum of enrolled accounts' weighted shares.
    pub fn total_weighted_shares(&self) -> u128 {
        self.total_weighted_shares
    }

    /// Debt basis of `address`; zero for accounts never rebased.
    pub fn debt_of(&self, address: &Address) -> i128 {
        self.debts.get(address).copied().unwrap_or(0)
    }

    /// Accounts with a recorded debt basis, in address order.
    pub fn debts(&self) -> impl Iterator<Item = (&Address, &i128)> {
        self.debts.iter()
    }

    /// Live claim of an enrolled account holding `shares`.
    pub fn claim(&self, shares: u128) -> Result<u128, LedgerError> {
        claim_against(shares, self.distributable_cash, self.total_weighted_shares)
    }

    /// Signed pending claim: live claim minus debt basis.
    pub fn pending(&self, address: &Address, shares: u128) -> Result<i128, LedgerError> {
        let claim = to_signed(self.claim(shares)?)?;
        claim
            .checked_sub(self.debt_of(address))
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Cash an enrolled account holding `shares` may withdraw right now.
    ///
    /// Never negative and never more than the pool holds.
    pub fn withdrawable(&self, address: &Address, shares: u128) -> Result<u128, LedgerError> {
        let pending = self.pending(address, shares)?;
        Ok(u128::try_from(pending).unwrap_or(0).min(self.pool_cash))
    }

    /// Record a cash deposit of `amount`.
    pub fn deposit(&mut self, amount: u128) -> Result<(), LedgerError> {
        let pool_cash = self
            .pool_cash
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let distributable_cash = self
            .distributable_cash
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.pool_cash = pool_cash;
        self.distributable_cash = distributable_cash;
        debug!(
            amount,
            pool_cash,
            distributable_cash,
            total_weighted_shares = self.total_weighted_shares,
            "deposit recorded"
        );
        Ok(())
    }

    /// Settle and rebase every enrolled account whose shares change in one
    /// state transition, then apply the net change to total shares.
    ///
    /// `changes` must list each account at most once, with `old_shares`
    /// equal to what the account currently contributes to the total.
    pub fn rebase(&mut self, changes: &[ShareChange]) -> Result<(), LedgerError> {
        let changes: Vec<&ShareChange> = changes.iter().filter(|c| !c.is_noop()).collect();
        if changes.is_empty() {
            return Ok(());
        }

        let total_before = self.total_weighted_shares;
        let mut total_after = total_before;
        for change in &changes {
            total_after = total_after
                .checked_sub(change.old_shares)
                .and_then(|t| t.checked_add(change.new_shares))
                .ok_or(LedgerError::ArithmeticOverflow)?;
        }

        let distributable_after = if total_after < total_before {
            checked_mul_div(self.distributable_cash, total_after, total_before)?
        } else {
            self.distributable_cash
        };

        let mut new_debts = Vec::with_capacity(changes.len());
        if total_before > 0 {
            for change in &changes {
                let settled = self.pending(&change.address, change.old_shares)?;
                let basis = to_signed(basis_against(
                    change.new_shares,
                    distributable_after,
                    total_after,
                )?)?;
                let debt = basis
                    .checked_sub(settled)
                    .ok_or(LedgerError::ArithmeticOverflow)?;
                new_debts.push((change.address, debt));
            }
        }

        for (address, debt) in new_debts {
            self.debts.insert(address, debt);
        }
        debug!(
            changed = changes.len(),
            total_before,
            total_after,
            distributable_before = self.distributable_cash,
            distributable_after,
            carry_over = total_before == 0,
            "shares rebased"
        );
        self.total_weighted_shares = total_after;
        self.distributable_cash = distributable_after;
        Ok(())
    }

    /// Pay `amount` out of the pool to `address`, an enrolled account
    /// holding `shares`.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] if `amount` exceeds
    /// [`withdrawable`](Self::withdrawable).
    pub fn withdraw(&mut self, address: &Address, shares: u128, amount: u128) -> Result<(), LedgerError> {
        let have = self.withdrawable(address, shares)?;
        if amount > have {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        let debt = self
            .debt_of(address)
            .checked_add(to_signed(amount)?)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.debts.insert(*address, debt);
        self.pool_cash -= amount;
        debug!(%address, amount, pool_cash = self.pool_cash, "withdrawal recorded");
        Ok(())
    }

    /// Capture engine state for a later [`restore`](Self::restore).
    pub fn checkpoint(&self, touched: &[Address]) -> EngineCheckpoint {
        EngineCheckpoint {
            distributable_cash: self.distributable_cash,
            pool_cash: self.pool_cash,
            total_weighted_shares: self.total_weighted_shares,
            debts: touched.iter().map(|a| (*a, self.debts.get(a).copied())).collect(),
        }
    }

    /// Undo every change made since `checkpoint`.
    pub fn restore(&mut self, checkpoint: EngineCheckpoint) {
        self.distributable_cash = checkpoint.distributable_cash;
        self.pool_cash = checkpoint.pool_cash;
        self.total_weighted_shares = checkpoint.total_weighted_shares;
        for (address, debt) in checkpoint.debts.into_iter().rev() {
            match debt {
                Some(d) => {
                    self.debts.insert(address, d);
                }
                None => {
                    self.debts.remove(&address);
                }
            }
        }
    }
}

/// `shares * cash / total`, or zero while nobody holds shares.
fn claim_against(shares: u128, cash: u128, total: u128) -> Result<u128, LedgerError> {
    if total == 0 || shares == 0 {
        return Ok(0);
    }
    checked_mul_div(shares, cash, total)
}

/// Debt basis for `shares`: the live claim rounded up, so a rebase never
/// credits the changer with a fraction the pool does not hold.
fn basis_against(shares: u128, cash: u128, total: u128) -> Result<u128, LedgerError> {
    if total == 0 || shares == 0 {
        return Ok(0);
    }
    checked_mul_div_ceil(shares, cash, total)
}
