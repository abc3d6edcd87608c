//! Confidential token scenarios
//!
//! Mint, burn, transfer and operator delegation on a standalone ledger.

use shroud::prelude::*;

const NOW: u64 = 1_000;

struct Token {
    ledger: ConfidentialLedger<ClearBackend>,
    signer: InputSigner,
    owner: Address,
}

impl Token {
    fn deploy() -> Self {
        let signer = InputSigner::generate();
        let owner = Address::derive("deployer");
        let ledger = ConfidentialLedger::new(
            Address::derive("Zama"),
            owner,
            TokenMetadata::new("Zama", "ZAMA").unwrap(),
            ClearBackend::new(),
            signer.verifier(),
        );
        Self { ledger, signer, owner }
    }

    fn input(&self, caller: Address, value: u64) -> ExternalInput {
        self.signer
            .encrypt_for(&ClearClient, value, &self.ledger.address(), &caller)
            .unwrap()
    }

    fn mint(&mut self, to: Address, value: u64) {
        let input = self.input(self.owner, value);
        self.ledger
            .mint_input(&CallContext::new(self.owner, NOW), to, &input)
            .unwrap();
    }

    fn burn(&mut self, caller: Address, from: Address, value: u64) -> Result<u64, LedgerError> {
        let input = self.input(caller, value);
        let burned = self.ledger.burn_input(&CallContext::new(caller, NOW), from, &input)?;
        Ok(ClearClient.decrypt(&burned).unwrap())
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

fn alice() -> Address {
    Address::derive("alice")
}

fn bob() -> Address {
    Address::derive("bob")
}

#[test]
fn metadata_defaults() {
    let token = Token::deploy();
    assert_eq!(token.ledger.name(), "Zama");
    assert_eq!(token.ledger.symbol(), "ZAMA");
    assert_eq!(token.ledger.decimals(), 6);
    assert_eq!(token.supply(), 0);
}

#[test]
fn mint_then_burn_everything() {
    let mut token = Token::deploy();
    token.mint(alice(), 10_000);

    assert_eq!(token.burn(alice(), alice(), 10_000).unwrap(), 10_000);
    assert_eq!(token.balance(alice()), 0);
    assert_eq!(token.supply(), 0);
}

#[test]
fn over_burn_clamps_without_error() {
    let mut token = Token::deploy();
    token.mint(alice(), 1000);
    token.burn(alice(), alice(), 400).unwrap();

    assert_eq!(token.burn(alice(), alice(), 5000).unwrap(), 600);
    assert_eq!(token.balance(alice()), 0);
}

#[test]
fn issuer_cannot_burn_holder_funds() {
    let mut token = Token::deploy();
    token.mint(alice(), 1000);
    let owner = token.owner;

    let err = token.burn(owner, alice(), 1000).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(token.balance(alice()), 1000);
}

#[test]
fn non_issuer_cannot_mint() {
    let mut token = Token::deploy();
    let input = token.input(bob(), 1_000_000);
    let err = token
        .ledger
        .mint_input(&CallContext::new(bob(), NOW), bob(), &input)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(token.supply(), 0);
}

#[test]
fn operator_transfers_until_expiry() {
    let mut token = Token::deploy();
    token.mint(alice(), 1000);
    token
        .ledger
        .set_operator(&CallContext::new(alice(), NOW), bob(), NOW + 10);
    assert!(token.ledger.is_operator(&alice(), &bob(), NOW));
    assert!(token.ledger.is_operator(&alice(), &alice(), NOW));
    assert!(!token.ledger.is_operator(&bob(), &alice(), NOW));

    let input = token.input(bob(), 300);
    token
        .ledger
        .transfer_input(&CallContext::new(bob(), NOW + 9), alice(), bob(), &input)
        .unwrap();
    assert_eq!(token.balance(alice()), 700);
    assert_eq!(token.balance(bob()), 300);

    let input = token.input(bob(), 300);
    let err = token
        .ledger
        .transfer_input(&CallContext::new(bob(), NOW + 10), alice(), bob(), &input)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(token.balance(alice()), 700);
}

#[test]
fn transfers_conserve_supply() {
    let mut token = Token::deploy();
    token.mint(alice(), 5000);
    token.mint(bob(), 1000);

    for (from, to, value) in [(alice(), bob(), 2000), (bob(), alice(), 9999), (alice(), bob(), 1)] {
        let input = token.input(from, value);
        token
            .ledger
            .transfer_input(&CallContext::new(from, NOW), from, to, &input)
            .unwrap();
    }

    assert_eq!(token.balance(alice()) + token.balance(bob()), 6000);
    assert_eq!(token.supply(), 6000);
}
