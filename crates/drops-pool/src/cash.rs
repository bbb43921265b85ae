//! In-memory cash asset.
//!
//! [`MemoryCash`] implements [`CashAsset`] with plain maps and no
//! persistence. It stands in for the external token contract in tests and
//! in the scenario runner.

use std::collections::HashMap;

use drops_core::constants::UNLIMITED_ALLOWANCE;
use drops_core::error::CashError;
use drops_core::traits::CashAsset;
use drops_core::types::Address;
use tracing::trace;

/// A fungible asset with balances and allowances held in memory.
#[derive(Debug, Clone)]
pub struct MemoryCash {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: u128,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
}

impl MemoryCash {
    /// Create an asset with no supply.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Create `amount` new units for `to`.
    pub fn issue(&mut self, to: &Address, amount: u128) -> Result<(), CashError> {
        let supply = self.total_supply.checked_add(amount).ok_or(CashError::Overflow)?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(CashError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Let `spender` pull up to `amount` from `owner`.
    ///
    /// [`UNLIMITED_ALLOWANCE`] is never decremented.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances.insert((*owner, *spender), amount);
    }

    fn move_funds(&mut self, sender: &Address, recipient: &Address, amount: u128) -> Result<(), CashError> {
        let have = self.balance_of(sender);
        if have < amount {
            return Err(CashError::InsufficientBalance { have, need: amount });
        }
        if sender == recipient {
            return Ok(());
        }
        // Cannot overflow: both balances are bounded by total supply.
        let credited = self.balance_of(recipient) + amount;
        self.balances.insert(*sender, have - amount);
        self.balances.insert(*recipient, credited);
        trace!(%sender, %recipient, amount, "cash moved");
        Ok(())
    }
}

impl CashAsset for MemoryCash {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn transfer(&mut self, sender: &Address, recipient: &Address, amount: u128) -> Result<(), CashError> {
        self.move_funds(sender, recipient, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), CashError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(CashError::InsufficientAllowance { have: allowed, need: amount });
        }
        self.move_funds(owner, recipient, amount)?;
        if allowed != UNLIMITED_ALLOWANCE {
            self.allowances.insert((*owner, *spender), allowed - amount);
        }
        Ok(())
    }
}
