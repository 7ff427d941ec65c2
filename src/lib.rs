//! An emulator for a small 8-bit register machine: 256 bytes of RAM, eight
//! 8-bit registers (R7 is the stack pointer), a flags register and a
//! fetch-decode-execute loop over a fixed instruction set.

pub mod alu;
pub mod error;
pub mod memory;
pub mod processor;
pub mod registers;

pub use error::Error;
