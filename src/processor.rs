use std::convert::TryFrom;
use std::fmt::Write as _;
use std::io::Write;

use crate::alu::{self, Flags, Outcome};
use crate::error::Error;
use crate::memory::{Byte, Memory, Word};
use crate::registers::Registers;
use color_eyre::eyre::Result;
use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

/// Emulates a CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Processor {
    /// Program counter
    pub pc: Word,
    /// Flags register, written by CMP and read by JEQ/JNE
    pub fl: Flags,
    /// Running flag. Cleared when HLT executes or an unknown opcode is fetched
    pub running: bool,
    /// The register file
    pub reg: Registers,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    /// Initializes a new CPU with the program counter at address 0
    pub fn new() -> Self {
        Self {
            pc: 0,
            fl: Flags::empty(),
            running: true,
            reg: Registers::default(),
        }
    }

    /// Executes a single, already decoded instruction.
    ///
    /// Expects the program counter to have been advanced past the
    /// instruction already; control-flow instructions overwrite it.
    pub fn execute_instruction<const S: usize, W: Write>(
        &mut self,
        instruction: Instruction,
        operand_a: Byte,
        operand_b: Byte,
        memory: &mut Memory<S>,
        out: &mut W,
    ) -> Result<()> {
        match instruction {
            Instruction::HLT => {
                self.running = false;

                debug!("HLT");
            }
            Instruction::PRN => {
                let value = self.reg.get(operand_a)?;
                writeln!(out, "{}", value)?;

                debug!("PRN R{}: {}", operand_a, value);
            }
            Instruction::LDI => {
                self.reg.set(operand_a, operand_b)?;

                debug!("LDI R{} {}", operand_a, operand_b);
            }
            Instruction::ADD | Instruction::MUL | Instruction::CMP => {
                let a = self.reg.get(operand_a)?;
                let b = self.reg.get(operand_b)?;

                match alu::apply(instruction, a, b)? {
                    Outcome::Value(value) => self.reg.set(operand_a, value)?,
                    Outcome::Flags(flags) => self.fl = flags,
                }

                debug!("{} R{} R{}", instruction, operand_a, operand_b);
            }
            Instruction::PUSH => {
                let value = self.reg.get(operand_a)?;
                self.push(value, memory)?;

                debug!("PUSH R{}: {}", operand_a, value);
            }
            Instruction::POP => {
                let value = self.pop(memory)?;
                self.reg.set(operand_a, value)?;

                debug!("POP R{}: {}", operand_a, value);
            }
            Instruction::CALL => {
                let target = self.reg.get(operand_a)?;
                let return_address = Byte::try_from(self.pc).map_err(|_| Error::OutOfBounds {
                    address: self.pc as usize,
                })?;
                self.push(return_address, memory)?;
                self.pc = target as Word;

                debug!("CALL R{}: 0x{:02X}", operand_a, target);
            }
            Instruction::RET => {
                self.pc = self.pop(memory)? as Word;

                debug!("RET: 0x{:02X}", self.pc);
            }
            Instruction::JMP => {
                self.pc = self.reg.get(operand_a)? as Word;

                debug!("JMP R{}: 0x{:02X}", operand_a, self.pc);
            }
            Instruction::JEQ => {
                let target = self.reg.get(operand_a)?;
                if self.fl.contains(Flags::E) {
                    self.pc = target as Word;
                }

                debug!("JEQ R{}: 0x{:02X}", operand_a, target);
            }
            Instruction::JNE => {
                let target = self.reg.get(operand_a)?;
                if !self.fl.contains(Flags::E) {
                    self.pc = target as Word;
                }

                debug!("JNE R{}: 0x{:02X}", operand_a, target);
            }
        }

        Ok(())
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// The opcode and both operand slots are fetched unconditionally, bounds
    /// checks included, even for instructions with fewer operands. The
    /// program counter is advanced here from the opcode's operand count; an
    /// unknown opcode is reported and halts the machine without an error.
    pub fn execute<const S: usize, W: Write>(
        &mut self,
        memory: &mut Memory<S>,
        out: &mut W,
    ) -> Result<()> {
        let opcode = memory.read_byte(self.pc)?;
        let operand_a = memory.read_byte(self.pc + 1)?;
        let operand_b = memory.read_byte(self.pc + 2)?;

        let instruction = match Instruction::try_from(opcode) {
            Ok(instruction) => instruction,
            Err(_) => {
                error!(
                    "0x{:02X} is not a valid instruction (memory address 0x{:02X})",
                    opcode, self.pc
                );
                self.running = false;
                return Ok(());
            }
        };

        self.pc += 1 + instruction.operands();
        self.execute_instruction(instruction, operand_a, operand_b, memory, out)
    }

    /// Run the program until the machine halts
    pub fn run<const S: usize, W: Write>(
        &mut self,
        memory: &mut Memory<S>,
        out: &mut W,
    ) -> Result<()> {
        while self.running {
            self.execute(memory, out)?;
        }

        Ok(())
    }

    /// Logs the program counter, the next three memory bytes and all eight
    /// registers in hexadecimal. Diagnostic only.
    pub fn trace<const S: usize>(&self, memory: &Memory<S>) {
        let mut line = format!("TRACE: {:02X} |", self.pc);
        for offset in 0..3 {
            let byte = memory.read_byte(self.pc + offset).unwrap_or(0);
            let _ = write!(line, " {:02X}", byte);
        }
        line.push_str(" |");
        for value in &self.reg.data {
            let _ = write!(line, " {:02X}", value);
        }

        trace!("{}", line);
    }

    fn push<const S: usize>(&mut self, value: Byte, memory: &mut Memory<S>) -> Result<(), Error> {
        let sp = self.reg.dec_sp()?;
        memory.write_byte(sp as Word, value)
    }

    fn pop<const S: usize>(&mut self, memory: &Memory<S>) -> Result<Byte, Error> {
        let value = memory.read_byte(self.reg.sp() as Word)?;
        self.reg.inc_sp()?;
        Ok(value)
    }
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// The machine's instruction set. The opcode's top two bits encode
        /// the operand count.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// Stop execution
    HLT = 0b0000_0001,
    /// Return from a subroutine: pop the return address into PC
    RET = 0b0001_0001,
    /// Push a register's value onto the stack
    /// @param register The register to push
    PUSH = 0b0100_0101,
    /// Pop the top of the stack into a register
    /// @param register The register to pop into
    POP = 0b0100_0110,
    /// Print a register's decimal value
    /// @param register The register to print
    PRN = 0b0100_0111,
    /// Call the subroutine at the address held in a register
    /// @param register The register holding the target address
    CALL = 0b0101_0000,
    /// Jump to the address held in a register
    /// @param register The register holding the target address
    JMP = 0b0101_0100,
    /// Jump to the address held in a register if the equal flag is set
    /// @param register The register holding the target address
    JEQ = 0b0101_0101,
    /// Jump to the address held in a register if the equal flag is clear
    /// @param register The register holding the target address
    JNE = 0b0101_0110,
    /// Load an immediate value into a register
    /// @param register The destination register
    /// @param value The value to load
    LDI = 0b1000_0010,
    /// Add two registers, storing the result in the first
    ADD = 0b1010_0000,
    /// Multiply two registers, storing the result in the first
    MUL = 0b1010_0010,
    /// Compare two registers, setting the L/G/E flags
    CMP = 0b1010_0111,
}

impl Instruction {
    /// Operand count, decoded from the top two bits of the opcode
    pub fn operands(&self) -> Word {
        ((u8::from(*self) >> 6) & 0b11) as Word
    }
}
