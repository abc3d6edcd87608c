//! Confidential ledger
//!
//! Balances are backend ciphertexts keyed by address. Every debit moves
//! `transferable(amount, balance)` rather than the requested amount, so an
//! account can never be driven below zero and the engine never learns
//! whether a request was short.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shroud_fhe::{Address, ExternalInput, FheBackend, InputVerifier};
use tracing::{debug, info};

use crate::context::CallContext;
use crate::errors::{LedgerError, LedgerResult};
use crate::operator::OperatorGrants;

/// Default decimals for confidential tokens
pub const DEFAULT_DECIMALS: u8 = 6;

/// Public token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> LedgerResult<Self> {
        let name = name.into();
        let symbol = symbol.into();
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidMetadata("name must not be empty".into()));
        }
        if symbol.trim().is_empty() {
            return Err(LedgerError::InvalidMetadata("symbol must not be empty".into()));
        }
        Ok(Self {
            name,
            symbol,
            decimals: DEFAULT_DECIMALS,
        })
    }

    /// Set the decimals
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Per-token table of encrypted balances and operator grants
pub struct ConfidentialLedger<B: FheBackend> {
    address: Address,
    issuer: Address,
    metadata: TokenMetadata,
    fhe: B,
    verifier: InputVerifier,
    balances: HashMap<Address, B::Uint>,
    operators: OperatorGrants,
    total_supply: B::Uint,
}

impl<B: FheBackend> ConfidentialLedger<B> {
    /// Create an empty ledger deployed at `address`, mintable only by `issuer`
    pub fn new(
        address: Address,
        issuer: Address,
        metadata: TokenMetadata,
        fhe: B,
        verifier: InputVerifier,
    ) -> Self {
        info!(
            "Created confidential token {} ({}) at {} on {} backend",
            metadata.name,
            metadata.symbol,
            address.short(),
            fhe.name()
        );
        let total_supply = fhe.zero();
        Self {
            address,
            issuer,
            metadata,
            fhe,
            verifier,
            balances: HashMap::new(),
            operators: OperatorGrants::new(),
            total_supply,
        }
    }

    /// Ledger's own address (the contract identity inputs are bound to)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Only identity allowed to mint
    pub fn issuer(&self) -> Address {
        self.issuer
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Backend this ledger evaluates with
    pub fn backend(&self) -> &B {
        &self.fhe
    }

    /// Stored balance handle; an encrypted zero for untouched accounts
    pub fn confidential_balance_of(&self, account: &Address) -> B::Uint {
        self.balances
            .get(account)
            .cloned()
            .unwrap_or_else(|| self.fhe.zero())
    }

    /// Encrypted sum of all balances (minted minus burned)
    pub fn confidential_total_supply(&self) -> B::Uint {
        self.total_supply.clone()
    }

    /// Whether `spender` may move `holder`'s funds at `now`
    pub fn is_operator(&self, holder: &Address, spender: &Address, now: u64) -> bool {
        holder == spender || self.operators.is_valid(holder, spender, now)
    }

    /// Grant (or overwrite) `operator`'s right to act for the caller until `until`
    pub fn set_operator(&mut self, ctx: &CallContext, operator: Address, until: u64) {
        self.operators.set(ctx.caller, operator, until);
        debug!(
            "{}: {} set operator {} until {}",
            self.metadata.symbol,
            ctx.caller.short(),
            operator.short(),
            until
        );
    }

    /// Fail unless the caller owns `holder` or holds a live grant from it
    pub fn authorize(&self, ctx: &CallContext, holder: &Address, action: &'static str) -> LedgerResult<()> {
        if self.is_operator(holder, &ctx.caller, ctx.timestamp) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: ctx.caller,
                account: *holder,
                action,
            })
        }
    }

    /// Decode an input the caller bound to this ledger
    pub fn ingest(&self, ctx: &CallContext, input: &ExternalInput) -> LedgerResult<B::Uint> {
        Ok(self.verifier.ingest(&self.fhe, input, &self.address, &ctx.caller)?)
    }

    /// Credit `to` with `amount`; issuer only, wraps on overflow
    pub fn mint(&mut self, ctx: &CallContext, to: Address, amount: &B::Uint) -> LedgerResult<B::Uint> {
        if ctx.caller != self.issuer {
            return Err(LedgerError::Unauthorized {
                caller: ctx.caller,
                account: to,
                action: "mint",
            });
        }

        let balance = self.fhe.add(&self.confidential_balance_of(&to), amount);
        self.balances.insert(to, balance);
        self.total_supply = self.fhe.add(&self.total_supply, amount);

        debug!("{}: minted to {}", self.metadata.symbol, to.short());
        Ok(amount.clone())
    }

    /// Debit up to `amount` from `from`; returns what was actually burned
    pub fn burn(&mut self, ctx: &CallContext, from: Address, amount: &B::Uint) -> LedgerResult<B::Uint> {
        self.authorize(ctx, &from, "burn")?;

        let balance = self.confidential_balance_of(&from);
        let actual = self.fhe.transferable(amount, &balance);
        self.balances.insert(from, self.fhe.sub(&balance, &actual));
        self.total_supply = self.fhe.sub(&self.total_supply, &actual);

        debug!(
            "{}: burned from {} by {}",
            self.metadata.symbol,
            from.short(),
            ctx.caller.short()
        );
        Ok(actual)
    }

    /// Move up to `amount` from `from` to `to`; returns what actually moved
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: &B::Uint,
    ) -> LedgerResult<B::Uint> {
        self.authorize(ctx, &from, "transfer")?;

        let from_balance = self.confidential_balance_of(&from);
        let actual = self.fhe.transferable(amount, &from_balance);
        self.balances.insert(from, self.fhe.sub(&from_balance, &actual));

        let to_balance = self.confidential_balance_of(&to);
        self.balances.insert(to, self.fhe.add(&to_balance, &actual));

        debug!(
            "{}: transfer {} -> {} by {}",
            self.metadata.symbol,
            from.short(),
            to.short(),
            ctx.caller.short()
        );
        Ok(actual)
    }

    /// `mint` with an amount supplied as a proof-bound input
    pub fn mint_input(&mut self, ctx: &CallContext, to: Address, input: &ExternalInput) -> LedgerResult<B::Uint> {
        let amount = self.ingest(ctx, input)?;
        self.mint(ctx, to, &amount)
    }

    /// `burn` with an amount supplied as a proof-bound input
    pub fn burn_input(&mut self, ctx: &CallContext, from: Address, input: &ExternalInput) -> LedgerResult<B::Uint> {
        let amount = self.ingest(ctx, input)?;
        self.burn(ctx, from, &amount)
    }

    /// `transfer` with an amount supplied as a proof-bound input
    pub fn transfer_input(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        input: &ExternalInput,
    ) -> LedgerResult<B::Uint> {
        let amount = self.ingest(ctx, input)?;
        self.transfer(ctx, from, to, &amount)
    }

    /// Number of accounts ever written
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }
}

impl<B: FheBackend> std::fmt::Debug for ConfidentialLedger<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidentialLedger")
            .field("address", &self.address)
            .field("symbol", &self.metadata.symbol)
            .field("accounts", &self.balances.len())
            .field("operators", &self.operators.len())
            .field("total_supply", &"<encrypted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MAX_OPERATOR_EXPIRY;
    use shroud_fhe::{ClearBackend, ClearClient, FheClient, FheError, InputSigner};

    struct Fixture {
        ledger: ConfidentialLedger<ClearBackend>,
        signer: InputSigner,
        deployer: Address,
        alice: Address,
        bob: Address,
    }

    fn fixture() -> Fixture {
        let signer = InputSigner::from_seed([1u8; 32]);
        let deployer = Address::derive("deployer");
        let ledger = ConfidentialLedger::new(
            Address::derive("token"),
            deployer,
            TokenMetadata::new("FHE Token", "FHET").unwrap(),
            ClearBackend::new(),
            signer.verifier(),
        );
        Fixture {
            ledger,
            signer,
            deployer,
            alice: Address::derive("alice"),
            bob: Address::derive("bob"),
        }
    }

    impl Fixture {
        fn input(&self, caller: Address, value: u64) -> ExternalInput {
            self.signer
                .encrypt_for(&ClearClient, value, &self.ledger.address(), &caller)
                .unwrap()
        }

        fn ctx(&self, caller: Address) -> CallContext {
            CallContext::new(caller, 1_000)
        }

        fn mint(&mut self, to: Address, value: u64) {
            let input = self.input(self.deployer, value);
            let ctx = self.ctx(self.deployer);
            self.ledger.mint_input(&ctx, to, &input).unwrap();
        }

        fn balance(&self, account: Address) -> u64 {
            ClearClient
                .decrypt(&self.ledger.confidential_balance_of(&account))
                .unwrap()
        }

        fn supply(&self) -> u64 {
            ClearClient
                .decrypt(&self.ledger.confidential_total_supply())
                .unwrap()
        }
    }

    #[test]
    fn test_mint_credits_recipient() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        assert_eq!(f.balance(f.alice), 1000);
        assert_eq!(f.supply(), 1000);
    }

    #[test]
    fn test_multiple_mints_accumulate() {
        let mut f = fixture();
        f.mint(f.bob, 1000);
        f.mint(f.bob, 2000);
        f.mint(f.bob, 500);
        assert_eq!(f.balance(f.bob), 3500);
    }

    #[test]
    fn test_mint_zero() {
        let mut f = fixture();
        f.mint(f.alice, 0);
        assert_eq!(f.balance(f.alice), 0);
    }

    #[test]
    fn test_mint_requires_issuer() {
        let mut f = fixture();
        let input = f.input(f.alice, 1000);
        let ctx = f.ctx(f.alice);
        let err = f.ledger.mint_input(&ctx, f.alice, &input).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { action: "mint", .. }));
        assert_eq!(f.balance(f.alice), 0);
    }

    #[test]
    fn test_untouched_account_reads_zero() {
        let f = fixture();
        assert_eq!(f.balance(f.alice), 0);
        assert_eq!(f.ledger.account_count(), 0);
    }

    #[test]
    fn test_partial_burns() {
        let mut f = fixture();
        f.mint(f.alice, 10_000);

        for burn in [2000, 3000] {
            let input = f.input(f.alice, burn);
            let ctx = f.ctx(f.alice);
            f.ledger.burn_input(&ctx, f.alice, &input).unwrap();
        }
        assert_eq!(f.balance(f.alice), 5000);
        assert_eq!(f.supply(), 5000);
    }

    #[test]
    fn test_burn_entire_balance() {
        let mut f = fixture();
        f.mint(f.alice, 10_000);
        let input = f.input(f.alice, 10_000);
        let ctx = f.ctx(f.alice);
        f.ledger.burn_input(&ctx, f.alice, &input).unwrap();
        assert_eq!(f.balance(f.alice), 0);
    }

    #[test]
    fn test_over_burn_clamps_to_zero() {
        let mut f = fixture();
        f.mint(f.alice, 300);
        let input = f.input(f.alice, 1_000_000);
        let ctx = f.ctx(f.alice);
        let burned = f.ledger.burn_input(&ctx, f.alice, &input).unwrap();

        assert_eq!(ClearClient.decrypt(&burned).unwrap(), 300);
        assert_eq!(f.balance(f.alice), 0);
        assert_eq!(f.supply(), 0);
    }

    #[test]
    fn test_burn_zero_keeps_balance() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        let input = f.input(f.alice, 0);
        let ctx = f.ctx(f.alice);
        f.ledger.burn_input(&ctx, f.alice, &input).unwrap();
        assert_eq!(f.balance(f.alice), 1000);
    }

    #[test]
    fn test_burn_by_stranger_rejected() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        let input = f.input(f.bob, 1000);
        let ctx = f.ctx(f.bob);
        let err = f.ledger.burn_input(&ctx, f.alice, &input).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { action: "burn", .. }));
        assert_eq!(f.balance(f.alice), 1000);
    }

    #[test]
    fn test_transfer_moves_actual_amount() {
        let mut f = fixture();
        f.mint(f.alice, 400);
        let input = f.input(f.alice, 1000);
        let ctx = f.ctx(f.alice);
        let moved = f.ledger.transfer_input(&ctx, f.alice, f.bob, &input).unwrap();

        assert_eq!(ClearClient.decrypt(&moved).unwrap(), 400);
        assert_eq!(f.balance(f.alice), 0);
        assert_eq!(f.balance(f.bob), 400);
        assert_eq!(f.supply(), 400);
    }

    #[test]
    fn test_self_transfer_is_neutral() {
        let mut f = fixture();
        f.mint(f.alice, 750);
        let input = f.input(f.alice, 500);
        let ctx = f.ctx(f.alice);
        f.ledger.transfer_input(&ctx, f.alice, f.alice, &input).unwrap();
        assert_eq!(f.balance(f.alice), 750);
    }

    #[test]
    fn test_operator_can_transfer_until_expiry() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        let alice_ctx = f.ctx(f.alice);
        f.ledger.set_operator(&alice_ctx, f.bob, 2_000);
        assert!(f.ledger.is_operator(&f.alice, &f.bob, 1_999));
        assert!(!f.ledger.is_operator(&f.alice, &f.bob, 2_000));

        let amount = f.ledger.backend().encrypt_trivial(250);
        let bob_ctx = CallContext::new(f.bob, 1_500);
        f.ledger.transfer(&bob_ctx, f.alice, f.bob, &amount).unwrap();
        assert_eq!(f.balance(f.bob), 250);

        let late = CallContext::new(f.bob, 2_000);
        let err = f.ledger.transfer(&late, f.alice, f.bob, &amount).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert_eq!(f.balance(f.alice), 750);
    }

    #[test]
    fn test_operator_can_burn() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        let alice_ctx = f.ctx(f.alice);
        f.ledger.set_operator(&alice_ctx, f.bob, MAX_OPERATOR_EXPIRY);

        let amount = f.ledger.backend().encrypt_trivial(600);
        let bob_ctx = f.ctx(f.bob);
        f.ledger.burn(&bob_ctx, f.alice, &amount).unwrap();
        assert_eq!(f.balance(f.alice), 400);
    }

    #[test]
    fn test_input_bound_to_other_caller_rejected() {
        let mut f = fixture();
        f.mint(f.alice, 1000);
        // bound to alice but submitted by bob acting as operator
        let alice_ctx = f.ctx(f.alice);
        f.ledger.set_operator(&alice_ctx, f.bob, MAX_OPERATOR_EXPIRY);
        let input = f.input(f.alice, 100);
        let bob_ctx = f.ctx(f.bob);
        let err = f.ledger.transfer_input(&bob_ctx, f.alice, f.bob, &input).unwrap_err();
        assert!(matches!(err, LedgerError::Fhe(FheError::InvalidProof(_))));
        assert_eq!(f.balance(f.alice), 1000);
    }

    #[test]
    fn test_metadata() {
        let f = fixture();
        assert_eq!(f.ledger.name(), "FHE Token");
        assert_eq!(f.ledger.symbol(), "FHET");
        assert_eq!(f.ledger.decimals(), DEFAULT_DECIMALS);
        assert!(TokenMetadata::new("", "X").is_err());
        assert_eq!(TokenMetadata::new("A", "B").unwrap().with_decimals(18).decimals, 18);
    }
}
