use std::cmp::Ordering;

use bitflags::bitflags;

use crate::error::Error;
use crate::memory::Byte;
use crate::processor::Instruction;

bitflags! {
    /// The flags register. CMP sets exactly one of these.
    pub struct Flags: u8 {
        /// Less-than: a < b
        const L = 0b100;
        /// Greater-than: a > b
        const G = 0b010;
        /// Equal: a == b
        const E = 0b001;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

/// What an ALU operation produced: either a value destined for the first
/// operand register, or a new state for the flags register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Value(Byte),
    Flags(Flags),
}

/// Applies an ALU operation to two register values. Arithmetic wraps modulo
/// 256. Instructions the ALU does not implement fail instead of no-opping.
pub fn apply(op: Instruction, a: Byte, b: Byte) -> Result<Outcome, Error> {
    match op {
        Instruction::ADD => Ok(Outcome::Value(a.wrapping_add(b))),
        Instruction::MUL => Ok(Outcome::Value(a.wrapping_mul(b))),
        Instruction::CMP => {
            let flags = match a.cmp(&b) {
                Ordering::Less => Flags::L,
                Ordering::Greater => Flags::G,
                Ordering::Equal => Flags::E,
            };
            Ok(Outcome::Flags(flags))
        }
        op => Err(Error::UnsupportedOperation { op }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps() {
        assert_eq!(apply(Instruction::ADD, 1, 2), Ok(Outcome::Value(3)));
        assert_eq!(apply(Instruction::ADD, 200, 100), Ok(Outcome::Value(44)));
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(apply(Instruction::MUL, 8, 9), Ok(Outcome::Value(72)));
        assert_eq!(apply(Instruction::MUL, 16, 16), Ok(Outcome::Value(0)));
    }

    #[test]
    fn test_cmp_sets_exactly_one_flag() {
        assert_eq!(apply(Instruction::CMP, 1, 2), Ok(Outcome::Flags(Flags::L)));
        assert_eq!(apply(Instruction::CMP, 2, 1), Ok(Outcome::Flags(Flags::G)));
        assert_eq!(apply(Instruction::CMP, 2, 2), Ok(Outcome::Flags(Flags::E)));

        for &(a, b) in &[(1, 2), (2, 1), (2, 2)] {
            if let Ok(Outcome::Flags(flags)) = apply(Instruction::CMP, a, b) {
                assert_eq!(flags.bits().count_ones(), 1);
            } else {
                unreachable!();
            }
        }
    }

    #[test]
    fn test_unsupported_operation() {
        assert_eq!(
            apply(Instruction::PRN, 0, 0),
            Err(Error::UnsupportedOperation {
                op: Instruction::PRN
            })
        );
    }
}
