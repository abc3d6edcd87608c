//! Calculator opcodes
//!
//! Binary opcodes take two encrypted operands; scalar opcodes take one
//! encrypted operand and a plaintext divisor.

use serde::{Deserialize, Serialize};

/// Operations the encrypted calculator can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// result = a + b (wrapping)
    Add = 0x10,
    /// result = a - b (wrapping)
    Sub = 0x11,
    /// result = a * b (wrapping)
    Mul = 0x12,
    /// result = a / k, plaintext k
    Div = 0x1B,
    /// result = a % k, plaintext k
    Rem = 0x1C,
}

impl Opcode {
    /// Whether the second operand is a plaintext scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Opcode::Div | Opcode::Rem)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Rem => "rem",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            0x10 => Ok(Opcode::Add),
            0x11 => Ok(Opcode::Sub),
            0x12 => Ok(Opcode::Mul),
            0x1B => Ok(Opcode::Div),
            0x1C => Ok(Opcode::Rem),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_bytes() {
        for op in [Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div, Opcode::Rem] {
            assert_eq!(Opcode::try_from(op as u8), Ok(op));
        }
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn test_scalar_opcodes() {
        assert!(Opcode::Div.is_scalar());
        assert!(Opcode::Rem.is_scalar());
        assert!(!Opcode::Mul.is_scalar());
    }
}
