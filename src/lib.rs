pub mod chip8;
pub mod definitions;
pub mod devices;
pub mod gpu;
pub mod opcode;
pub mod render;
pub mod resources;
pub mod state;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
