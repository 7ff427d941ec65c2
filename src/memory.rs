use crate::error::Error;

pub mod parse;

pub type Byte = u8; // 1 byte
pub type Word = u16; // 2 bytes

/// The machine's RAM: 256 addressable cells.
pub type Ram = Memory<256>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    pub data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory, zero-filled
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Word) -> Result<Byte, Error> {
        self.data
            .get(position as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address: position as usize,
            })
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Word, value: Byte) -> Result<(), Error> {
        match self.data.get_mut(position as usize) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::OutOfBounds {
                address: position as usize,
            }),
        }
    }

    /// Writes an array of bytes to the memory
    pub fn write_array(&mut self, position: Word, data: &[Byte]) -> Result<(), Error> {
        let start = position as usize;
        let end = start + data.len();
        if end > S {
            return Err(Error::OutOfBounds { address: end - 1 });
        }
        self.data[start..end].copy_from_slice(data);
        Ok(())
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_instructions {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::processor::Instruction;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read_byte() -> Result<()> {
        let mut mem = Ram::default();
        mem.data[0x2] = 0x12;
        assert_eq!(mem.read_byte(0x2)?, 0x12);

        Ok(())
    }

    #[test]
    fn test_write_byte() -> Result<()> {
        let mut mem = Ram::default();
        mem.write_byte(0x44, 12)?;
        assert_eq!(mem.data[0x44], 12);

        Ok(())
    }

    #[test]
    fn test_read_byte_out_of_bounds() {
        let mem = Ram::default();
        assert_eq!(mem.read_byte(256), Err(Error::OutOfBounds { address: 256 }));
    }

    #[test]
    fn test_write_byte_out_of_bounds() {
        let mut mem = Ram::default();
        assert_eq!(
            mem.write_byte(300, 1),
            Err(Error::OutOfBounds { address: 300 })
        );
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = Ram::default();
        mem.write_array(0x44, &[0x12, 0x34, 0x56, 0x78])?;
        assert_eq!(mem.data[0x44], 0x12);
        assert_eq!(mem.data[0x45], 0x34);
        assert_eq!(mem.data[0x46], 0x56);
        assert_eq!(mem.data[0x47], 0x78);

        Ok(())
    }

    #[test]
    fn test_write_array_out_of_bounds() {
        let mut mem = Ram::default();
        assert_eq!(
            mem.write_array(0xFF, &[1, 2]),
            Err(Error::OutOfBounds { address: 256 })
        );
    }

    #[test]
    fn test_write_instructions() -> Result<()> {
        let mut mem = Ram::default();

        mem.write_array(
            0,
            &[
                Instruction::LDI as Byte,
                0,
                8,
                Instruction::PRN as Byte,
                0,
                Instruction::HLT as Byte,
            ],
        )?;

        let mut mem2 = Ram::default();
        use crate::processor::Instruction::*;
        write_instructions!(mem2 : 0 => LDI, 0, 8, PRN, 0, HLT)?;

        assert_eq!(mem, mem2);

        Ok(())
    }
}
