//! Encrypted calculator
//!
//! Holds one encrypted result. Each call overwrites it with the outcome of a
//! single operation on freshly ingested operands.

use shroud_fhe::{Address, ExternalInput, FheBackend, FheError, FheResult, InputVerifier};
use shroud_token::CallContext;
use tracing::debug;

use crate::errors::{ContractError, ContractResult};
use crate::opcodes::Opcode;

/// Calculator contract with a single encrypted result slot
pub struct EncryptedCalculator<B: FheBackend> {
    address: Address,
    fhe: B,
    verifier: InputVerifier,
    result: B::Uint,
    /// Number of completed operations
    nonce: u64,
    last_op: Option<Opcode>,
}

impl<B: FheBackend> EncryptedCalculator<B> {
    /// Deploy at `address`; the result starts as an encrypted zero
    pub fn new(address: Address, fhe: B, verifier: InputVerifier) -> Self {
        let result = fhe.zero();
        Self {
            address,
            fhe,
            verifier,
            result,
            nonce: 0,
            last_op: None,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Current result handle
    pub fn res(&self) -> B::Uint {
        self.result.clone()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn last_op(&self) -> Option<Opcode> {
        self.last_op
    }

    pub fn add(&mut self, ctx: &CallContext, x: &ExternalInput, y: &ExternalInput) -> ContractResult<B::Uint> {
        self.execute_binary(ctx, Opcode::Add, x, y)
    }

    pub fn sub(&mut self, ctx: &CallContext, x: &ExternalInput, y: &ExternalInput) -> ContractResult<B::Uint> {
        self.execute_binary(ctx, Opcode::Sub, x, y)
    }

    pub fn mul(&mut self, ctx: &CallContext, x: &ExternalInput, y: &ExternalInput) -> ContractResult<B::Uint> {
        self.execute_binary(ctx, Opcode::Mul, x, y)
    }

    /// `x / divisor`; a zero divisor fails before anything is read
    pub fn div(&mut self, ctx: &CallContext, x: &ExternalInput, divisor: u64) -> ContractResult<B::Uint> {
        self.execute_scalar(ctx, Opcode::Div, x, divisor)
    }

    /// `x % divisor`; a zero divisor fails before anything is read
    pub fn rem(&mut self, ctx: &CallContext, x: &ExternalInput, divisor: u64) -> ContractResult<B::Uint> {
        self.execute_scalar(ctx, Opcode::Rem, x, divisor)
    }

    /// Run a two-ciphertext opcode and store its result
    pub fn execute_binary(
        &mut self,
        ctx: &CallContext,
        op: Opcode,
        x: &ExternalInput,
        y: &ExternalInput,
    ) -> ContractResult<B::Uint> {
        let apply: fn(&B, &B::Uint, &B::Uint) -> B::Uint = match op {
            Opcode::Add => B::add,
            Opcode::Sub => B::sub,
            Opcode::Mul => B::mul,
            Opcode::Div | Opcode::Rem => {
                return Err(ContractError::OperandMismatch {
                    op: op.name(),
                    expected: "a plaintext divisor",
                })
            }
        };

        let x = self.ingest(ctx, x)?;
        let y = self.ingest(ctx, y)?;
        let value = apply(&self.fhe, &x, &y);
        Ok(self.store(ctx, op, value))
    }

    /// Run a ciphertext-by-plaintext opcode and store its result
    pub fn execute_scalar(
        &mut self,
        ctx: &CallContext,
        op: Opcode,
        x: &ExternalInput,
        k: u64,
    ) -> ContractResult<B::Uint> {
        let apply: fn(&B, &B::Uint, u64) -> FheResult<B::Uint> = match op {
            Opcode::Div => B::scalar_div,
            Opcode::Rem => B::scalar_rem,
            Opcode::Add | Opcode::Sub | Opcode::Mul => {
                return Err(ContractError::OperandMismatch {
                    op: op.name(),
                    expected: "two encrypted operands",
                })
            }
        };

        // divisor is public: reject zero before touching the input
        if k == 0 {
            return Err(FheError::InvalidScalar(format!("{} by zero", op.name())).into());
        }

        let x = self.ingest(ctx, x)?;
        let value = apply(&self.fhe, &x, k)?;
        Ok(self.store(ctx, op, value))
    }

    fn ingest(&self, ctx: &CallContext, input: &ExternalInput) -> ContractResult<B::Uint> {
        Ok(self.verifier.ingest(&self.fhe, input, &self.address, &ctx.caller)?)
    }

    fn store(&mut self, ctx: &CallContext, op: Opcode, value: B::Uint) -> B::Uint {
        self.result = value;
        self.nonce += 1;
        self.last_op = Some(op);
        debug!(
            "Calculator {}: {} by {} (nonce {})",
            self.address.short(),
            op.name(),
            ctx.caller.short(),
            self.nonce
        );
        self.result.clone()
    }
}

impl<B: FheBackend> std::fmt::Debug for EncryptedCalculator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedCalculator")
            .field("address", &self.address)
            .field("nonce", &self.nonce)
            .field("last_op", &self.last_op)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_fhe::{ClearBackend, ClearClient, FheClient, InputSigner};

    struct Fixture {
        calc: EncryptedCalculator<ClearBackend>,
        signer: InputSigner,
        ctx: CallContext,
    }

    fn fixture() -> Fixture {
        let signer = InputSigner::from_seed([3u8; 32]);
        let calc = EncryptedCalculator::new(Address::derive("fhe-math"), ClearBackend::new(), signer.verifier());
        Fixture {
            calc,
            signer,
            ctx: CallContext::new(Address::derive("alice"), 0),
        }
    }

    impl Fixture {
        fn input(&self, value: u64) -> ExternalInput {
            self.signer
                .encrypt_for(&ClearClient, value, &self.calc.address(), &self.ctx.caller)
                .unwrap()
        }

        fn res(&self) -> u64 {
            ClearClient.decrypt(&self.calc.res()).unwrap()
        }
    }

    #[test]
    fn test_initial_result_is_zero() {
        let f = fixture();
        assert_eq!(f.res(), 0);
        assert_eq!(f.calc.nonce(), 0);
        assert_eq!(f.calc.last_op(), None);
    }

    #[test]
    fn test_binary_ops() {
        let mut f = fixture();
        let cases = [
            (Opcode::Add, 10, 20, 30),
            (Opcode::Sub, 50, 20, 30),
            (Opcode::Mul, 7, 8, 56),
            (Opcode::Sub, 42, 42, 0),
        ];
        for (op, x, y, expected) in cases {
            let (x, y) = (f.input(x), f.input(y));
            let ctx = f.ctx;
            f.calc.execute_binary(&ctx, op, &x, &y).unwrap();
            assert_eq!(f.res(), expected, "{:?}", op);
        }
        assert_eq!(f.calc.nonce(), 4);
    }

    #[test]
    fn test_scalar_ops() {
        let mut f = fixture();
        let ctx = f.ctx;
        let x = f.input(100);
        f.calc.div(&ctx, &x, 5).unwrap();
        assert_eq!(f.res(), 20);

        let x = f.input(23);
        f.calc.rem(&ctx, &x, 5).unwrap();
        assert_eq!(f.res(), 3);
    }

    #[test]
    fn test_sub_wraps() {
        let mut f = fixture();
        let ctx = f.ctx;
        let (x, y) = (f.input(1), f.input(2));
        f.calc.sub(&ctx, &x, &y).unwrap();
        assert_eq!(f.res(), u64::MAX);
    }

    #[test]
    fn test_zero_divisor_keeps_result() {
        let mut f = fixture();
        let ctx = f.ctx;
        let (x, y) = (f.input(10), f.input(20));
        f.calc.add(&ctx, &x, &y).unwrap();

        let err = f.calc.div(&ctx, &x, 0).unwrap_err();
        assert!(matches!(err, ContractError::Fhe(FheError::InvalidScalar(_))));
        let err = f.calc.rem(&ctx, &x, 0).unwrap_err();
        assert!(matches!(err, ContractError::Fhe(FheError::InvalidScalar(_))));
        assert_eq!(f.res(), 30);
        assert_eq!(f.calc.nonce(), 1);
    }

    #[test]
    fn test_res_is_idempotent() {
        let mut f = fixture();
        let ctx = f.ctx;
        let (x, y) = (f.input(6), f.input(7));
        f.calc.mul(&ctx, &x, &y).unwrap();
        assert_eq!(f.res(), 42);
        assert_eq!(f.res(), 42);
    }

    #[test]
    fn test_foreign_input_rejected() {
        let mut f = fixture();
        let ctx = f.ctx;
        let mallory = Address::derive("mallory");
        let stolen = f
            .signer
            .encrypt_for(&ClearClient, 5, &f.calc.address(), &mallory)
            .unwrap();
        let y = f.input(1);

        let err = f.calc.add(&ctx, &stolen, &y).unwrap_err();
        assert!(matches!(err, ContractError::Fhe(FheError::InvalidProof(_))));
        assert_eq!(f.res(), 0);
    }

    #[test]
    fn test_operand_kind_checked() {
        let mut f = fixture();
        let ctx = f.ctx;
        let (x, y) = (f.input(1), f.input(2));
        assert!(matches!(
            f.calc.execute_binary(&ctx, Opcode::Div, &x, &y),
            Err(ContractError::OperandMismatch { .. })
        ));
        assert!(matches!(
            f.calc.execute_scalar(&ctx, Opcode::Add, &x, 2),
            Err(ContractError::OperandMismatch { .. })
        ));
    }
}
