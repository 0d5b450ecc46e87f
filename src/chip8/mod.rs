//! The full implementation of the chip8 cpu, from the opcodes to an option to pretty
//! print them.
mod cpu;
mod opcodes;
mod print;

/// reexport cpu structs and data for simpler usage
pub use cpu::*;
