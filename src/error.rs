use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
}

/// Only returned by the decoder, the cpu executes these as no-ops.
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum MemoryError {
    #[error("Address {address:#06X} is out of bounds for a memory of len {len:#06X}")]
    OutOfBounds { address: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum LoadError {
    #[error("The program is {len} bytes long, but only {max} bytes can be loaded.")]
    ProgramTooLarge { len: usize, max: usize },
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum RomError {
    #[error("Unable to read the rom '{0}'.")]
    Io(String),
    #[error("Unable to read the rom archive '{0}'.")]
    Archive(String),
    #[error("There is no rom named '{0}' in the archive.")]
    NotFound(String),
}

impl From<std::io::Error> for RomError {
    fn from(err: std::io::Error) -> Self {
        RomError::Io(err.to_string())
    }
}

impl From<zip::result::ZipError> for RomError {
    fn from(err: zip::result::ZipError) -> Self {
        RomError::Archive(err.to_string())
    }
}
