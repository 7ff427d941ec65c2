use crate::error::Error;
use crate::memory::Byte;

/// Register reserved by convention as the stack pointer.
pub const SP: Byte = 7;

/// Where the stack pointer starts: the top of the descending stack region.
pub const STACK_TOP: Byte = 0xF4;

/// The register file: 8 general-purpose 8-bit registers. R7 is the stack
/// pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registers {
    /// The actual register values
    pub data: [Byte; 8],
}

impl Default for Registers {
    /// Initializes the register file, zeroed except for the stack pointer
    fn default() -> Self {
        let mut data = [0; 8];
        data[SP as usize] = STACK_TOP;
        Registers { data }
    }
}

impl Registers {
    /// Reads a register's value
    pub fn get(&self, index: Byte) -> Result<Byte, Error> {
        self.data
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidRegister { index })
    }

    /// Writes a register's value
    pub fn set(&mut self, index: Byte, value: Byte) -> Result<(), Error> {
        match self.data.get_mut(index as usize) {
            Some(register) => {
                *register = value;
                Ok(())
            }
            None => Err(Error::InvalidRegister { index }),
        }
    }

    /// The current stack pointer
    pub fn sp(&self) -> Byte {
        self.data[SP as usize]
    }

    /// Moves the stack pointer down one cell and returns the new value.
    /// Fails instead of wrapping below address 0.
    pub fn dec_sp(&mut self) -> Result<Byte, Error> {
        let sp = self.sp().checked_sub(1).ok_or(Error::OutOfBounds {
            address: usize::MAX,
        })?;
        self.data[SP as usize] = sp;
        Ok(sp)
    }

    /// Moves the stack pointer up one cell and returns the old value.
    /// Fails instead of wrapping past the top of RAM.
    pub fn inc_sp(&mut self) -> Result<Byte, Error> {
        let old = self.sp();
        let sp = old.checked_add(1).ok_or(Error::OutOfBounds {
            address: Byte::MAX as usize + 1,
        })?;
        self.data[SP as usize] = sp;
        Ok(old)
    }
}
