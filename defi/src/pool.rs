//! Constant-Sum Pool
//!
//! Two confidential tokens traded 1:1 minus a fixed fee. Reserves and LP
//! balances stay encrypted; the pool never branches on a secret. A swap that
//! asks for more than the pool holds is clamped, and a liquidity removal with
//! a split that does not add up pays out zero.

use serde::{Deserialize, Serialize};
use shroud_fhe::{Address, ExternalInput, FheBackend, FheResult, InputVerifier};
use shroud_token::{CallContext, ConfidentialLedger, TokenMetadata};
use tracing::{debug, info};

use crate::errors::{DeFiError, DeFiResult};

/// Pool configuration parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Share of a swap input paid out, numerator
    pub fee_numerator: u64,
    /// Share of a swap input paid out, denominator
    pub fee_denominator: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_numerator: 997, // 0.3% fee
            fee_denominator: 1000,
        }
    }
}

impl PoolConfig {
    /// Set the payout ratio (`numerator / denominator` of the input)
    pub fn with_fee(mut self, numerator: u64, denominator: u64) -> Self {
        self.fee_numerator = numerator;
        self.fee_denominator = denominator;
        self
    }

    /// Reject a zero denominator or a payout above the input
    pub fn validate(&self) -> DeFiResult<()> {
        if self.fee_denominator == 0 || self.fee_numerator > self.fee_denominator {
            return Err(DeFiError::InvalidFee {
                numerator: self.fee_numerator,
                denominator: self.fee_denominator,
            });
        }
        Ok(())
    }

    /// Encrypted output for an encrypted input
    pub fn amount_after_fee<B: FheBackend>(&self, fhe: &B, amount: &B::Uint) -> FheResult<B::Uint> {
        fhe.scalar_div(&fhe.scalar_mul(amount, self.fee_numerator), self.fee_denominator)
    }
}

/// Pool address for a token pair
pub fn pool_address(token0: &Address, token1: &Address) -> Address {
    let mut id_input = Vec::with_capacity(64);
    id_input.extend_from_slice(b"shroud.pool");
    id_input.extend_from_slice(token0.as_bytes());
    id_input.extend_from_slice(token1.as_bytes());
    Address(blake3::hash(&id_input).into())
}

/// Constant-sum market maker over two confidential ledgers
///
/// The pool owns both token ledgers and its own LP ledger (issued by the
/// pool). Providers and swappers must grant the pool operator rights on the
/// token ledgers before calling in.
pub struct ConstantSumPool<B: FheBackend + Clone> {
    address: Address,
    config: PoolConfig,
    fhe: B,
    verifier: InputVerifier,
    token0: ConfidentialLedger<B>,
    token1: ConfidentialLedger<B>,
    lp: ConfidentialLedger<B>,
    reserve0: B::Uint,
    reserve1: B::Uint,
}

impl<B: FheBackend + Clone> ConstantSumPool<B> {
    /// Create an empty pool over `token0` and `token1`
    pub fn new(
        token0: ConfidentialLedger<B>,
        token1: ConfidentialLedger<B>,
        config: PoolConfig,
        verifier: InputVerifier,
    ) -> DeFiResult<Self> {
        config.validate()?;
        if token0.address() == token1.address() {
            return Err(DeFiError::IdenticalTokens(token0.address().to_string()));
        }

        let address = pool_address(&token0.address(), &token1.address());
        let fhe = token0.backend().clone();
        let lp_metadata = TokenMetadata::new(
            format!("{}-{} Liquidity", token0.symbol(), token1.symbol()),
            format!("{}-{}-LP", token0.symbol(), token1.symbol()),
        )?
        .with_decimals(token0.decimals());
        let lp = ConfidentialLedger::new(address, address, lp_metadata, fhe.clone(), verifier.clone());

        info!(
            "Created pool {} for {}/{} (fee {}/{})",
            address.short(),
            token0.symbol(),
            token1.symbol(),
            config.fee_numerator,
            config.fee_denominator
        );

        let reserve0 = fhe.zero();
        let reserve1 = fhe.zero();
        Ok(Self {
            address,
            config,
            fhe,
            verifier,
            token0,
            token1,
            lp,
            reserve0,
            reserve1,
        })
    }

    /// Pool identity: input binding target and token custody account
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn token0(&self) -> &ConfidentialLedger<B> {
        &self.token0
    }

    pub fn token0_mut(&mut self) -> &mut ConfidentialLedger<B> {
        &mut self.token0
    }

    pub fn token1(&self) -> &ConfidentialLedger<B> {
        &self.token1
    }

    pub fn token1_mut(&mut self) -> &mut ConfidentialLedger<B> {
        &mut self.token1
    }

    /// LP share ledger
    pub fn lp(&self) -> &ConfidentialLedger<B> {
        &self.lp
    }

    pub fn reserve0(&self) -> B::Uint {
        self.reserve0.clone()
    }

    pub fn reserve1(&self) -> B::Uint {
        self.reserve1.clone()
    }

    /// Encrypted LP supply
    pub fn total_shares(&self) -> B::Uint {
        self.lp.confidential_total_supply()
    }

    /// Encrypted LP balance of `account`
    pub fn confidential_balance_of(&self, account: &Address) -> B::Uint {
        self.lp.confidential_balance_of(account)
    }

    fn ingest(&self, ctx: &CallContext, input: &ExternalInput) -> DeFiResult<B::Uint> {
        Ok(self.verifier.ingest(&self.fhe, input, &self.address, &ctx.caller)?)
    }

    /// Fail unless the pool may pull the caller's funds on both tokens
    fn check_pull_rights(&self, ctx: &CallContext) -> DeFiResult<()> {
        let pool_ctx = ctx.as_caller(self.address);
        self.token0.authorize(&pool_ctx, &ctx.caller, "transfer")?;
        self.token1.authorize(&pool_ctx, &ctx.caller, "transfer")?;
        Ok(())
    }

    /// Deposit up to the given amounts; mints LP shares equal to what arrived
    pub fn add_liquidity(
        &mut self,
        ctx: &CallContext,
        amount0: &ExternalInput,
        amount1: &ExternalInput,
    ) -> DeFiResult<B::Uint> {
        let amount0 = self.ingest(ctx, amount0)?;
        let amount1 = self.ingest(ctx, amount1)?;
        self.check_pull_rights(ctx)?;

        let pool_ctx = ctx.as_caller(self.address);
        let actual0 = self.token0.transfer(&pool_ctx, ctx.caller, self.address, &amount0)?;
        let actual1 = self.token1.transfer(&pool_ctx, ctx.caller, self.address, &amount1)?;

        self.reserve0 = self.fhe.add(&self.reserve0, &actual0);
        self.reserve1 = self.fhe.add(&self.reserve1, &actual1);

        let shares = self.fhe.add(&actual0, &actual1);
        let minted = self.lp.mint(&pool_ctx, ctx.caller, &shares)?;

        info!("Pool {}: liquidity added by {}", self.address.short(), ctx.caller.short());
        Ok(minted)
    }

    /// Swap in either or both directions; returns `(out0, out1)` actually paid
    pub fn swap(
        &mut self,
        ctx: &CallContext,
        amount0_in: &ExternalInput,
        amount1_in: &ExternalInput,
    ) -> DeFiResult<(B::Uint, B::Uint)> {
        let amount0_in = self.ingest(ctx, amount0_in)?;
        let amount1_in = self.ingest(ctx, amount1_in)?;
        self.check_pull_rights(ctx)?;

        let pool_ctx = ctx.as_caller(self.address);
        let actual0_in = self.token0.transfer(&pool_ctx, ctx.caller, self.address, &amount0_in)?;
        let actual1_in = self.token1.transfer(&pool_ctx, ctx.caller, self.address, &amount1_in)?;

        let out1 = self.config.amount_after_fee(&self.fhe, &actual0_in)?;
        let out0 = self.config.amount_after_fee(&self.fhe, &actual1_in)?;

        self.reserve0 = self.fhe.add(&self.reserve0, &actual0_in);
        self.reserve1 = self.fhe.add(&self.reserve1, &actual1_in);

        let (sent0, sent1) = self.pay_out(&pool_ctx, ctx.caller, &out0, &out1)?;

        info!("Pool {}: swap by {}", self.address.short(), ctx.caller.short());
        Ok((sent0, sent1))
    }

    /// Burn up to `shares` and pay out the caller's split if it matches
    ///
    /// The burn always stands. The split pays only when both parts are within
    /// the burned amount and sum to it exactly; otherwise nothing is paid.
    pub fn remove_liquidity(
        &mut self,
        ctx: &CallContext,
        shares: &ExternalInput,
        expected_out0: &ExternalInput,
        expected_out1: &ExternalInput,
    ) -> DeFiResult<(B::Uint, B::Uint)> {
        let shares = self.ingest(ctx, shares)?;
        let expected0 = self.ingest(ctx, expected_out0)?;
        let expected1 = self.ingest(ctx, expected_out1)?;

        let burned = self.lp.burn(ctx, ctx.caller, &shares)?;

        let zero = self.fhe.zero();
        let sum_matches = self.fhe.eq(&self.fhe.add(&expected0, &expected1), &burned);
        // both parts bounded so a wrapped sum cannot pass
        let within0 = self.fhe.le(&expected0, &burned);
        let within1 = self.fhe.le(&expected1, &burned);

        let mut payout0 = self.fhe.select(&sum_matches, &expected0, &zero);
        let mut payout1 = self.fhe.select(&sum_matches, &expected1, &zero);
        for within in [&within0, &within1] {
            payout0 = self.fhe.select(within, &payout0, &zero);
            payout1 = self.fhe.select(within, &payout1, &zero);
        }

        let pool_ctx = ctx.as_caller(self.address);
        let sent = self.pay_out(&pool_ctx, ctx.caller, &payout0, &payout1)?;

        info!("Pool {}: liquidity removed by {}", self.address.short(), ctx.caller.short());
        Ok(sent)
    }

    /// Send up to the reserves to `to`, shrinking reserves by what left
    fn pay_out(
        &mut self,
        pool_ctx: &CallContext,
        to: Address,
        amount0: &B::Uint,
        amount1: &B::Uint,
    ) -> DeFiResult<(B::Uint, B::Uint)> {
        let capped0 = self.fhe.transferable(amount0, &self.reserve0);
        let capped1 = self.fhe.transferable(amount1, &self.reserve1);

        let sent0 = self.token0.transfer(pool_ctx, self.address, to, &capped0)?;
        let sent1 = self.token1.transfer(pool_ctx, self.address, to, &capped1)?;

        self.reserve0 = self.fhe.sub_saturating(&self.reserve0, &sent0);
        self.reserve1 = self.fhe.sub_saturating(&self.reserve1, &sent1);

        debug!("Pool {}: paid out to {}", self.address.short(), to.short());
        Ok((sent0, sent1))
    }
}

impl<B: FheBackend + Clone> std::fmt::Debug for ConstantSumPool<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstantSumPool")
            .field("address", &self.address)
            .field("token0", &self.token0.symbol())
            .field("token1", &self.token1.symbol())
            .field("config", &self.config)
            .finish()
    }
}
