//! The Drops pool: token ledger, membership and dividend engine composed
//! over an external cash asset.
//!
//! Every mutating operation runs inside [`DropsPool::atomically`]: the
//! touched accounts are checkpointed, internal state is committed, and the
//! external cash movement runs last. If any step fails the checkpoint is
//! restored, so a failed call leaves no trace in the pool. The cash asset
//! itself is expected to leave its own state untouched on error.

use std::collections::BTreeSet;

use drops_core::error::{ConfigError, LedgerError};
use drops_core::traits::{CashAsset, WeightingFunction};
use drops_core::types::{AccountRecord, Address, ShareChange};
use drops_core::units::rescale;
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::engine::DividendEngine;
use crate::ledger::{SharesMoved, TokenLedger};
use crate::registry::MembershipRegistry;
use crate::snapshot::{AccountSnapshot, PoolSnapshot};
use crate::weighting::SqrtWeighting;

/// A cash-backed token whose enrolled holders share deposits pro rata to
/// their weighted holdings.
#[derive(Debug)]
pub struct DropsPool<C, W = SqrtWeighting> {
    config: PoolConfig,
    weighting: W,
    cash: C,
    ledger: TokenLedger,
    registry: MembershipRegistry,
    engine: DividendEngine,
}

impl<C: CashAsset> DropsPool<C, SqrtWeighting> {
    /// Create a pool with square-root weighting.
    pub fn new(config: PoolConfig, cash: C) -> Result<Self, ConfigError> {
        Self::with_weighting(config, cash, SqrtWeighting::new())
    }
}

impl<C: CashAsset, W: WeightingFunction> DropsPool<C, W> {
    /// Create a pool with a custom weighting function.
    ///
    /// # Errors
    ///
    /// Any [`PoolConfig::validate`] failure, or
    /// [`ConfigError::CashDecimalsMismatch`] if the cash asset's precision
    /// differs from `config.cash_decimals`.
    pub fn with_weighting(config: PoolConfig, cash: C, weighting: W) -> Result<Self, ConfigError> {
        config.validate()?;
        let asset = cash.decimals();
        if asset != config.cash_decimals {
            return Err(ConfigError::CashDecimalsMismatch {
                configured: config.cash_decimals,
                asset,
            });
        }
        info!(
            name = %config.name,
            symbol = %config.symbol,
            decimals = config.decimals,
            cash_decimals = config.cash_decimals,
            custody = %config.custody,
            "pool created"
        );
        Ok(Self {
            config,
            weighting,
            cash,
            ledger: TokenLedger::new(),
            registry: MembershipRegistry::new(),
            engine: DividendEngine::new(),
        })
    }

    // --- Configuration ---

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Decimal precision of the native unit.
    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    /// Decimal precision of weighted shares.
    pub fn share_decimals(&self) -> u8 {
        self.weighting.output_decimals(self.config.decimals)
    }

    pub fn cash_decimals(&self) -> u8 {
        self.config.cash_decimals
    }

    /// Address under which the pool holds its cash.
    pub fn custody(&self) -> Address {
        self.config.custody
    }

    pub fn cash(&self) -> &C {
        &self.cash
    }

    /// Mutable access to the cash asset, for issuing and approvals.
    pub fn cash_mut(&mut self) -> &mut C {
        &mut self.cash
    }

    // --- Queries ---

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.ledger.balance_of(address)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Weighted shares of `address`, enrolled or not.
    pub fn share_balance_of(&self, address: &Address) -> u128 {
        self.ledger.shares_of(address)
    }

    pub fn is_member(&self, address: &Address) -> bool {
        self.registry.is_member(address)
    }

    pub fn member_count(&self) -> usize {
        self.registry.member_count()
    }

    /// Enrolled accounts in address order.
    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.registry.iter()
    }

    /// Cash the pool holds and has not paid out.
    pub fn pool_cash(&self) -> u128 {
        self.engine.pool_cash()
    }

    pub fn distributable_cash(&self) -> u128 {
        self.engine.distributable_cash()
    }

    pub fn total_weighted_shares(&self) -> u128 {
        self.engine.total_weighted_shares()
    }

    /// Cash the custody address holds in the cash asset.
    ///
    /// Equals [`pool_cash`](Self::pool_cash) unless someone transferred cash
    /// to the custody address outside the pool.
    pub fn custody_cash(&self) -> u128 {
        self.cash.balance_of(&self.config.custody)
    }

    /// Cash `address` may withdraw right now. Zero for non-members.
    pub fn withdrawable_cash_of(&self, address: &Address) -> Result<u128, LedgerError> {
        if !self.registry.is_member(address) {
            return Ok(0);
        }
        self.engine.withdrawable(address, self.ledger.shares_of(address))
    }

    /// Full account record of `address`.
    pub fn account(&self, address: &Address) -> AccountRecord {
        let holding = self.ledger.holding(address);
        AccountRecord {
            raw_balance: holding.raw,
            weighted_shares: holding.shares,
            in_pool: self.registry.is_member(address),
            debt: self.engine.debt_of(address),
        }
    }

    /// Capture every observable quantity of the pool.
    ///
    /// Lists every account that ever held a balance or enrolled.
    pub fn snapshot(&self) -> Result<PoolSnapshot, LedgerError> {
        let addresses: BTreeSet<Address> = self
            .ledger
            .accounts()
            .map(|(address, _)| *address)
            .chain(self.registry.iter().copied())
            .collect();
        let mut accounts = Vec::with_capacity(addresses.len());
        for address in addresses {
            let record = self.account(&address);
            accounts.push(AccountSnapshot {
                address,
                raw_balance: record.raw_balance,
                weighted_shares: record.weighted_shares,
                in_pool: record.in_pool,
                debt: record.debt,
                withdrawable: self.withdrawable_cash_of(&address)?,
            });
        }
        Ok(PoolSnapshot {
            name: self.config.name.clone(),
            symbol: self.config.symbol.clone(),
            decimals: self.config.decimals,
            share_decimals: self.share_decimals(),
            cash_decimals: self.config.cash_decimals,
            total_supply: self.ledger.total_supply(),
            pool_cash: self.engine.pool_cash(),
            distributable_cash: self.engine.distributable_cash(),
            total_weighted_shares: self.engine.total_weighted_shares(),
            member_count: self.registry.member_count(),
            accounts,
        })
    }

    // --- Operations ---

    /// Enroll `address` in dividend distribution.
    ///
    /// Returns `false` if it was already a member. The account's current
    /// shares join the total without a claim on cash deposited earlier,
    /// except when nobody held enrolled shares before (carry-over).
    pub fn enroll(&mut self, address: Address) -> Result<bool, LedgerError> {
        if self.registry.is_member(&address) {
            return Ok(false);
        }
        self.atomically("enroll", &[address], |pool| {
            let shares = pool.ledger.shares_of(&address);
            pool.engine.rebase(&[ShareChange {
                address,
                old_shares: 0,
                new_shares: shares,
            }])?;
            pool.registry.enroll(address);
            info!(
                %address,
                shares,
                members = pool.registry.member_count(),
                total_weighted_shares = pool.engine.total_weighted_shares(),
                "account enrolled"
            );
            Ok(true)
        })
    }

    /// Deposit `cash_amount` from `caller` and credit `to` with the
    /// equivalent native amount.
    ///
    /// The deposit is distributed before `to` is credited, so `to` has no
    /// claim on it. `caller` must have approved the custody address for at
    /// least `cash_amount`. Returns the native amount minted.
    pub fn mint(&mut self, caller: &Address, to: &Address, cash_amount: u128) -> Result<u128, LedgerError> {
        let minted = rescale(cash_amount, self.config.cash_decimals, self.config.decimals)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.atomically("mint", &[*caller, *to], |pool| {
            pool.engine.deposit(cash_amount)?;
            let moved = pool.ledger.mint(to, minted, &pool.weighting)?;
            pool.rebase_members(&[(*to, moved)])?;
            let custody = pool.config.custody;
            pool.cash.transfer_from(&custody, caller, &custody, cash_amount)?;
            info!(
                %caller,
                %to,
                cash_amount,
                minted,
                pool_cash = pool.engine.pool_cash(),
                "minted"
            );
            Ok(minted)
        })
    }

    /// Move `amount` of the native unit from `from` to `to`.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] if `from` holds less.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        self.atomically("transfer", &[*from, *to], |pool| {
            let (debited, credited) = pool.ledger.transfer(from, to, amount, &pool.weighting)?;
            if from != to {
                pool.rebase_members(&[(*from, debited), (*to, credited)])?;
            }
            debug!(
                %from,
                %to,
                amount,
                total_weighted_shares = pool.engine.total_weighted_shares(),
                "transferred"
            );
            Ok(())
        })
    }

    /// Pay `amount` of cash out of the pool to `caller`.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] if `amount` exceeds
    /// [`withdrawable_cash_of`](Self::withdrawable_cash_of). Pool cash and
    /// the caller's debt are final before the cash leaves custody.
    pub fn withdraw(&mut self, caller: &Address, amount: u128) -> Result<(), LedgerError> {
        self.atomically("withdraw", &[*caller], |pool| {
            if pool.registry.is_member(caller) {
                let shares = pool.ledger.shares_of(caller);
                pool.engine.withdraw(caller, shares, amount)?;
            } else if amount > 0 {
                return Err(LedgerError::InsufficientBalance { have: 0, need: amount });
            }
            if amount > 0 {
                let custody = pool.config.custody;
                pool.cash.transfer(&custody, caller, amount)?;
            }
            info!(%caller, amount, pool_cash = pool.engine.pool_cash(), "withdrawn");
            Ok(())
        })
    }

    /// Feed share movements of enrolled accounts to the engine as one
    /// transition. Non-members are skipped.
    fn rebase_members(&mut self, moves: &[(Address, SharesMoved)]) -> Result<(), LedgerError> {
        let changes: Vec<ShareChange> = moves
            .iter()
            .filter(|(address, _)| self.registry.is_member(address))
            .map(|(address, moved)| ShareChange {
                address: *address,
                old_shares: moved.old,
                new_shares: moved.new,
            })
            .collect();
        self.engine.rebase(&changes)
    }

    /// Run `op`, restoring the touched state if it fails.
    fn atomically<T>(
        &mut self,
        operation: &'static str,
        touched: &[Address],
        op: impl FnOnce(&mut Self) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let ledger = self.ledger.checkpoint(touched);
        let registry = self.registry.checkpoint(touched);
        let engine = self.engine.checkpoint(touched);
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.ledger.restore(ledger);
                self.registry.restore(registry);
                self.engine.restore(engine);
                warn!(operation, error = %err, "operation rolled back");
                Err(err)
            }
        }
    }
}
