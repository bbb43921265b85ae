//! Token ledger: raw balances of the native unit and their weighted shares.
//!
//! Every balance-changing call recomputes the account's weighted shares and
//! returns the `(old, new)` pair so the caller can feed enrolled accounts'
//! changes to the dividend engine in the same state transition.

use std::collections::BTreeMap;

use drops_core::error::LedgerError;
use drops_core::traits::WeightingFunction;
use drops_core::types::Address;

/// One account's holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Holding {
    /// Native-unit balance.
    pub raw: u128,
    /// `weight(raw)` under the ledger's weighting function.
    pub shares: u128,
}

/// Old and new weighted shares of an account touched by a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharesMoved {
    pub old: u128,
    pub new: u128,
}

/// Balances and total supply of the native unit.
///
/// Accounts appear lazily on first credit. Accounts whose balance returns to
/// zero stay in the map so snapshots keep listing them.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    holdings: BTreeMap<Address, Holding>,
    total_supply: u128,
}

/// Ledger state of the accounts an operation is about to touch.
#[derive(Debug, Clone)]
pub struct LedgerCheckpoint {
    total_supply: u128,
    holdings: Vec<(Address, Option<Holding>)>,
}

impl TokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Native-unit balance of `address`.
    pub fn balance_of(&self, address: &Address) -> u128 {
        self.holding(address).raw
    }

    /// Weighted shares of `address`, whether or not it is enrolled.
    pub fn shares_of(&self, address: &Address) -> u128 {
        self.holding(address).shares
    }

    /// Holding of `address`; zero for unknown accounts.
    pub fn holding(&self, address: &Address) -> Holding {
        self.holdings.get(address).copied().unwrap_or_default()
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Every account the ledger has seen, in address order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Holding)> {
        self.holdings.iter()
    }

    /// Create `amount` new units for `to`.
    pub fn mint<W: WeightingFunction + ?Sized>(
        &mut self,
        to: &Address,
        amount: u128,
        weighting: &W,
    ) -> Result<SharesMoved, LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let moved = self.credit(to, amount, weighting)?;
        self.total_supply = supply;
        Ok(moved)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Returns the share movements of `from` and `to`, in that order.
    /// Fails with [`LedgerError::InsufficientBalance`] without touching any
    /// balance when `from` holds less than `amount`.
    pub fn transfer<W: WeightingFunction + ?Sized>(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
        weighting: &W,
    ) -> Result<(SharesMoved, SharesMoved), LedgerError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from == to {
            let shares = self.shares_of(from);
            let same = SharesMoved { old: shares, new: shares };
            return Ok((same, same));
        }
        // Cannot overflow: the recipient's balance plus `amount` is bounded
        // by the total supply.
        let debited = self.set_balance(from, have - amount, weighting);
        let credited = self.credit(to, amount, weighting)?;
        Ok((debited, credited))
    }

    fn credit<W: WeightingFunction + ?Sized>(
        &mut self,
        to: &Address,
        amount: u128,
        weighting: &W,
    ) -> Result<SharesMoved, LedgerError> {
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(self.set_balance(to, balance, weighting))
    }

    fn set_balance<W: WeightingFunction + ?Sized>(
        &mut self,
        address: &Address,
        raw: u128,
        weighting: &W,
    ) -> SharesMoved {
        let holding = self.holdings.entry(*address).or_default();
        let old = holding.shares;
        holding.raw = raw;
        holding.shares = weighting.weight(raw);
        SharesMoved { old, new: holding.shares }
    }

    /// Capture the holdings of `touched` for a later [`restore`](Self::restore).
    pub fn checkpoint(&self, touched: &[Address]) -> LedgerCheckpoint {
        LedgerCheckpoint {
            total_supply: self.total_supply,
            holdings: touched
                .iter()
                .map(|a| (*a, self.holdings.get(a).copied()))
                .collect(),
        }
    }

    /// Undo every change made to the checkpointed accounts.
    pub fn restore(&mut self, checkpoint: LedgerCheckpoint) {
        self.total_supply = checkpoint.total_supply;
        for (address, holding) in checkpoint.holdings.into_iter().rev() {
            match holding {
                Some(h) => {
                    self.holdings.insert(address, h);
                }
                None => {
                    self.holdings.remove(&address);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighting::{LinearWeighting, SqrtWeighting};

    const ONE: u128 = 1_000_000_000_000_000_000;

    fn addr(seed: u8) -> Address {
        Address::repeat(seed)
    }

    #[test]
    fn unknown_account_is_zero() {
        let l = TokenLedger::new();
        assert_eq!(l.balance_of(&addr(1)), 0);
        assert_eq!(l.shares_of(&addr(1)), 0);
        assert_eq!(l.total_supply(), 0);
    }

    #[test]
    fn mint_credits_and_weights() {
        let mut l = TokenLedger::new();
        let moved = l.mint(&addr(1), 100 * ONE, &SqrtWeighting).unwrap();
        assert_eq!(moved, SharesMoved { old: 0, new: 10_000_000_000 });
        assert_eq!(l.balance_of(&addr(1)), 100 * ONE);
        assert_eq!(l.total_supply(), 100 * ONE);
    }

    #[test]
    fn mint_supply_overflow_leaves_state() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), u128::MAX, &LinearWeighting).unwrap();
        let err = l.mint(&addr(2), 1, &LinearWeighting).unwrap_err();
        assert_eq!(err, LedgerError::ArithmeticOverflow);
        assert_eq!(l.balance_of(&addr(2)), 0);
        assert_eq!(l.total_supply(), u128::MAX);
    }

    #[test]
    fn transfer_moves_balance_and_shares() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), 100 * ONE, &SqrtWeighting).unwrap();
        let (from, to) = l.transfer(&addr(1), &addr(2), ONE, &SqrtWeighting).unwrap();
        assert_eq!(from.old, 10_000_000_000);
        assert_eq!(from.new, (99 * ONE).isqrt());
        assert_eq!(to, SharesMoved { old: 0, new: 1_000_000_000 });
        assert_eq!(l.balance_of(&addr(1)), 99 * ONE);
        assert_eq!(l.balance_of(&addr(2)), ONE);
        assert_eq!(l.total_supply(), 100 * ONE);
    }

    #[test]
    fn transfer_insufficient_balance() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), 5, &LinearWeighting).unwrap();
        let err = l.transfer(&addr(1), &addr(2), 6, &LinearWeighting).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { have: 5, need: 6 });
        assert_eq!(l.balance_of(&addr(1)), 5);
        assert_eq!(l.balance_of(&addr(2)), 0);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), 9, &SqrtWeighting).unwrap();
        let (a, b) = l.transfer(&addr(1), &addr(1), 4, &SqrtWeighting).unwrap();
        assert_eq!(a, SharesMoved { old: 3, new: 3 });
        assert_eq!(a, b);
        assert_eq!(l.balance_of(&addr(1)), 9);
    }

    #[test]
    fn emptied_account_is_still_listed() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), 4, &SqrtWeighting).unwrap();
        l.transfer(&addr(1), &addr(2), 4, &SqrtWeighting).unwrap();
        let listed: Vec<Address> = l.accounts().map(|(a, _)| *a).collect();
        assert_eq!(listed, vec![addr(1), addr(2)]);
        assert_eq!(l.shares_of(&addr(1)), 0);
    }

    #[test]
    fn restore_undoes_transfer() {
        let mut l = TokenLedger::new();
        l.mint(&addr(1), 100, &SqrtWeighting).unwrap();
        let cp = l.checkpoint(&[addr(1), addr(2)]);
        l.transfer(&addr(1), &addr(2), 36, &SqrtWeighting).unwrap();
        l.restore(cp);
        assert_eq!(l.holding(&addr(1)), Holding { raw: 100, shares: 10 });
        assert_eq!(l.accounts().count(), 1);
        assert_eq!(l.total_supply(), 100);
    }

    #[test]
    fn restore_undoes_mint() {
        let mut l = TokenLedger::new();
        let cp = l.checkpoint(&[addr(7)]);
        l.mint(&addr(7), 49, &SqrtWeighting).unwrap();
        l.restore(cp);
        assert_eq!(l.total_supply(), 0);
        assert_eq!(l.accounts().count(), 0);
    }
}
