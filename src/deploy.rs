//! Deployment of the token pair, pool and calculator
//!
//! Stands up the same set of contracts for any backend: two confidential
//! tokens issued by the deployer, a constant-sum pool over them and an
//! encrypted calculator.

use anyhow::Context;
use shroud_contracts::EncryptedCalculator;
use shroud_defi::ConstantSumPool;
use shroud_fhe::{Address, FheBackend, InputVerifier};
use shroud_token::{ConfidentialLedger, TokenMetadata};
use tracing::info;

use crate::config::{ShroudConfig, TokenInfo};

/// Label the calculator address is derived from
pub const CALCULATOR_LABEL: &str = "FHEMath";

/// Deployed contract set
pub struct Deployment<B: FheBackend + Clone> {
    pub deployer: Address,
    pub pool: ConstantSumPool<B>,
    pub calculator: EncryptedCalculator<B>,
}

impl<B: FheBackend + Clone> Deployment<B> {
    /// Deploy everything described by `config`
    pub fn deploy(
        config: &ShroudConfig,
        fhe: B,
        verifier: InputVerifier,
        deployer: Address,
    ) -> anyhow::Result<Self> {
        config.validate().context("refusing to deploy an invalid config")?;
        config.check_backend(fhe.name())?;

        let token = |info: &TokenInfo| -> anyhow::Result<ConfidentialLedger<B>> {
            let metadata = TokenMetadata::new(info.name.as_str(), info.symbol.as_str())
                .with_context(|| format!("token {}", info.name))?
                .with_decimals(config.token.decimals);
            Ok(ConfidentialLedger::new(
                Address::derive(&info.name),
                deployer,
                metadata,
                fhe.clone(),
                verifier.clone(),
            ))
        };
        let token0 = token(&config.token.token0)?;
        let token1 = token(&config.token.token1)?;

        let pool = ConstantSumPool::new(token0, token1, config.pool.clone(), verifier.clone())
            .context("pool deployment failed")?;
        let calculator = EncryptedCalculator::new(Address::derive(CALCULATOR_LABEL), fhe, verifier);

        info!(
            "Deployed {}/{} pool at {} and calculator at {}",
            config.token.token0.symbol,
            config.token.token1.symbol,
            pool.address().short(),
            calculator.address().short()
        );

        Ok(Self {
            deployer,
            pool,
            calculator,
        })
    }
}
