//! Membership registry: which accounts participate in dividend distribution.
//!
//! Enrollment is one-way. The registry only records membership; the pool
//! pairs every enrollment with the dividend engine's rebase so the new
//! member's existing shares enter the total without a retroactive claim.

use std::collections::BTreeSet;

use drops_core::types::Address;

/// Set of enrolled accounts, iterated in address order.
#[derive(Debug, Clone, Default)]
pub struct MembershipRegistry {
    members: BTreeSet<Address>,
}

/// Membership of the accounts an operation is about to touch.
#[derive(Debug, Clone)]
pub struct RegistryCheckpoint {
    entries: Vec<(Address, bool)>,
}

impl MembershipRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `address` is enrolled.
    pub fn is_member(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    /// Enroll `address`. Returns `true` if it was not already a member.
    pub fn enroll(&mut self, address: Address) -> bool {
        self.members.insert(address)
    }

    /// Number of enrolled accounts.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Enrolled accounts in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }

    /// Capture membership of `touched` for a later [`restore`](Self::restore).
    pub fn checkpoint(&self, touched: &[Address]) -> RegistryCheckpoint {
        RegistryCheckpoint {
            entries: touched.iter().map(|a| (*a, self.is_member(a))).collect(),
        }
    }

    /// Undo membership changes made since `checkpoint`.
    pub fn restore(&mut self, checkpoint: RegistryCheckpoint) {
        for (address, was_member) in checkpoint.entries.into_iter().rev() {
            if was_member {
                self.members.insert(address);
            } else {
                self.members.remove(&address);
            }
        }
    }
}
