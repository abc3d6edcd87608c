//! Time-bounded operator grants

use std::collections::HashMap;

use shroud_fhe::Address;

/// Expiry for effectively permanent grants (`2^48 - 1`)
pub const MAX_OPERATOR_EXPIRY: u64 = (1 << 48) - 1;

/// (holder, operator) -> exclusive expiry timestamp
#[derive(Debug, Clone, Default)]
pub struct OperatorGrants {
    grants: HashMap<(Address, Address), u64>,
}

impl OperatorGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a grant
    pub fn set(&mut self, holder: Address, operator: Address, until: u64) {
        self.grants.insert((holder, operator), until);
    }

    /// Expiry of a grant, if one was ever set
    pub fn expiry(&self, holder: &Address, operator: &Address) -> Option<u64> {
        self.grants.get(&(*holder, *operator)).copied()
    }

    /// Whether `operator` may act for `holder` at `now`
    pub fn is_valid(&self, holder: &Address, operator: &Address, now: u64) -> bool {
        self.expiry(holder, operator).is_some_and(|until| now < until)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_expires_at_bound() {
        let mut grants = OperatorGrants::new();
        let alice = Address::derive("alice");
        let pool = Address::derive("pool");

        grants.set(alice, pool, 100);
        assert!(grants.is_valid(&alice, &pool, 99));
        assert!(!grants.is_valid(&alice, &pool, 100));
        assert!(!grants.is_valid(&pool, &alice, 50));
    }

    #[test]
    fn test_overwrite_shortens_grant() {
        let mut grants = OperatorGrants::new();
        let alice = Address::derive("alice");
        let pool = Address::derive("pool");

        grants.set(alice, pool, MAX_OPERATOR_EXPIRY);
        grants.set(alice, pool, 0);
        assert!(!grants.is_valid(&alice, &pool, 0));
        assert_eq!(grants.len(), 1);
    }
}
