//! The display unit, composes sprites into the packed bitmap at the end of
//! the memory.
use crate::{
    definitions::{
        cpu::register,
        display::{self, BUFFER_START, ROW_SIZE},
    },
    state::MachineState,
    MemoryError,
};

/// The last x coordinate where a shifted sprite still has a byte to its right.
const LAST_SPLIT_X: usize = display::WIDTH - 8;

#[cfg_attr(test, mockall::automock)]
/// Draws into the display bitmap of the given state.
pub trait Blit {
    /// Will xor a sprite of `height` bytes read from `address` into the bitmap at `(x, y)`.
    /// `VF` is set to `1` if any pixel was erased, else to `0`.
    fn draw(
        &mut self,
        state: &mut MachineState,
        address: u16,
        x: u8,
        y: u8,
        height: u8,
    ) -> Result<(), MemoryError>;

    /// Will clear the full display bitmap.
    fn clear(&mut self, state: &mut MachineState);
}

/// The standard blitter, sprites are clipped at the right and bottom edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct XorBlitter;

impl XorBlitter {
    pub fn new() -> Self {
        Self
    }
}

/// Xors `byte` into the bitmap, returns `true` if a set pixel was erased.
#[inline]
fn draw_byte(memory: &mut [u8], address: usize, byte: u8) -> bool {
    memory[address] ^= byte;
    memory[address] & byte != byte
}

impl Blit for XorBlitter {
    fn draw(
        &mut self,
        state: &mut MachineState,
        address: u16,
        x: u8,
        y: u8,
        height: u8,
    ) -> Result<(), MemoryError> {
        let x = (x & 0x3F) as usize;
        let y = (y & 0x1F) as usize;
        // clipped, not wrapped
        let height = (height as usize).min(display::HEIGHT - y);
        let shift = x & 7;
        let start = BUFFER_START + (x >> 3) + y * ROW_SIZE;

        // copy the sprite, it could overlap the bitmap
        let mut sprite = [0u8; display::HEIGHT];
        sprite[..height].copy_from_slice(state.memory_range(address as usize, height)?);

        let mut collision = false;
        for (i, byte) in sprite[..height].iter().enumerate() {
            let row = start + i * ROW_SIZE;
            collision |= draw_byte(&mut state.memory, row, byte >> shift);
            if shift != 0 && x < LAST_SPLIT_X {
                collision |= draw_byte(&mut state.memory, row + 1, byte << (8 - shift));
            }
        }

        state.registers[register::LAST] = collision as u8;
        Ok(())
    }

    fn clear(&mut self, state: &mut MachineState) {
        state.screen_buffer_mut().fill(0);
    }
}
