//! Shared test helpers for scenario and adversarial tests.

use drops_core::constants::UNLIMITED_ALLOWANCE;
use drops_core::error::LedgerError;
use drops_core::traits::{CashAsset, WeightingFunction};
use drops_core::types::Address;
use drops_pool::{DropsPool, MemoryCash, PoolConfig};

/// One whole unit at 18 decimals.
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Cash issued to [`admin`] by [`funded_pool`].
pub const ADMIN_CASH: u128 = 1000 * ONE;

/// Simple address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address::repeat(seed)
}

/// The account that deploys the cash asset and mints.
pub fn admin() -> Address {
    addr(0xAD)
}

/// 18-decimal cash asset with [`ADMIN_CASH`] issued to [`admin`] and an
/// unlimited approval to `custody`.
pub fn funded_cash(custody: &Address) -> MemoryCash {
    let mut cash = MemoryCash::new("Kovan Umbrella Cash", "kUCSH", 18);
    cash.issue(&admin(), ADMIN_CASH).expect("issue admin cash");
    cash.approve(&admin(), custody, UNLIMITED_ALLOWANCE);
    cash
}

/// Default square-root pool over [`funded_cash`].
pub fn funded_pool() -> DropsPool<MemoryCash> {
    let config = PoolConfig::default();
    let cash = funded_cash(&config.custody);
    DropsPool::new(config, cash).expect("valid default config")
}

/// Assert every accounting invariant that must hold between operations.
pub fn assert_invariants<C: CashAsset, W: WeightingFunction>(pool: &DropsPool<C, W>, weighting: &W) {
    let snap = pool.snapshot().expect("snapshot");

    let member_shares: u128 = snap
        .accounts
        .iter()
        .filter(|a| a.in_pool)
        .map(|a| a.weighted_shares)
        .sum();
    assert_eq!(snap.total_weighted_shares, member_shares, "total shares drifted");

    let supply: u128 = snap.accounts.iter().map(|a| a.raw_balance).sum();
    assert_eq!(snap.total_supply, supply, "supply drifted");

    for account in &snap.accounts {
        assert_eq!(
            account.weighted_shares,
            weighting.weight(account.raw_balance),
            "stale shares for {}",
            account.address
        );
        assert!(account.withdrawable <= snap.pool_cash, "claim above pool cash");
        if !account.in_pool {
            assert_eq!(account.withdrawable, 0, "non-member claim");
        }
    }

    assert!(
        snap.total_withdrawable() <= snap.pool_cash,
        "claims {} exceed pool cash {}",
        snap.total_withdrawable(),
        snap.pool_cash
    );
    assert_eq!(pool.custody_cash(), snap.pool_cash, "custody out of sync");
}

/// Withdraw everything `account` may withdraw, returning the amount.
pub fn drain<C: CashAsset, W: WeightingFunction>(
    pool: &mut DropsPool<C, W>,
    account: &Address,
) -> Result<u128, LedgerError> {
    let amount = pool.withdrawable_cash_of(account)?;
    pool.withdraw(account, amount)?;
    Ok(amount)
}
