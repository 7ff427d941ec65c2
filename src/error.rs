use std::{error, fmt};

use crate::memory::Byte;
use crate::processor::Instruction;

/// A fault raised while executing an instruction. All of these are fatal to
/// the current run; the machine reports them instead of recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A memory access outside `[0, capacity)`.
    OutOfBounds { address: usize },
    /// A register index outside `[0, 7]`.
    InvalidRegister { index: Byte },
    /// An instruction handed to the ALU that it does not implement.
    UnsupportedOperation { op: Instruction },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds { address } => {
                write!(f, "memory has no address `0x{:x}`", address)
            }
            Error::InvalidRegister { index } => {
                write!(f, "no register `R{}`", index)
            }
            Error::UnsupportedOperation { op } => {
                write!(f, "`{}` is not an ALU operation", op)
            }
        }
    }
}

impl error::Error for Error {}
