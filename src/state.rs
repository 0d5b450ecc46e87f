use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display, memory},
    devices::Keyboard,
    timer::Timers,
    LoadError, MemoryError, StackError,
};

/// The complete mutable state of a single emulation session.
///
/// The state holds no behaviour beside keeping its own invariants, it is
/// driven by the [`Cpu`](crate::chip8::Cpu) and drawn into by the
/// [`Blit`](crate::gpu::Blit) implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// - `0x000-0x04F` - The built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xEFF` - Program ROM and work RAM
    /// - `0xF00-0xFFF` - The display bitmap, `64x32` pixels packed 8 to a byte
    pub memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub registers: [u8; cpu::register::SIZE],
    /// The index register `I`. Is not masked to 12 bits.
    pub index_register: u16,
    /// The address of the instruction that will be fetched next.
    pub program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called, its
    /// length is the stack pointer.
    pub stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// The delay and sound timers.
    pub timers: Timers,
    /// The current state of the hex keyboard.
    pub keyboard: Keyboard,
    /// Will shift `VX` instead of `VY` in `8XY6` and `8XYE`.
    pub schip: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Will create a fresh state with the standard font installed.
    pub fn new() -> Self {
        let mut state = Self {
            memory: vec![0; memory::SIZE],
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            timers: Timers::new(),
            keyboard: Keyboard::new(),
            schip: false,
        };
        state.load_font(&display::fontset::FONTSET);
        state
    }

    /// Will copy the program to the program start and clear the memory
    /// behind it (display included). The font is left alone.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > cpu::PROGRAM_SIZE {
            return Err(LoadError::ProgramTooLarge {
                len: program.len(),
                max: cpu::PROGRAM_SIZE,
            });
        }

        let start = cpu::PROGRAM_COUNTER as usize;
        let end = start + program.len();
        self.memory[start..end].copy_from_slice(program);
        self.memory[end..].fill(0);

        log::debug!("loaded program of {} bytes", program.len());
        Ok(())
    }

    /// Will install the given font at the start of the memory.
    pub fn load_font(&mut self, font: &[u8; 0x50]) {
        let start = display::fontset::LOCATION;
        self.memory[start..(start + font.len())].copy_from_slice(font);
    }

    /// Will zero everything except the keyboard and the mode and reinstall
    /// the font.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack.clear();
        self.timers = Timers::new();
        self.load_font(&display::fontset::FONTSET);
    }

    /// The amount of return addresses currently stored.
    pub fn stack_pointer(&self) -> usize {
        self.stack.len()
    }

    /// Will push the current pointer to the stack
    pub fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        match self.stack.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(StackError::Full),
        }
    }

    /// Will pop the last pushed pointer from the stack
    pub fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    /// If the host should currently play a tone.
    pub fn is_sound_active(&self) -> bool {
        self.timers.is_sound_active()
    }

    /// The packed display bitmap
    pub fn screen_buffer(&self) -> &[u8] {
        &self.memory[display::BUFFER_START..(display::BUFFER_START + display::BUFFER_SIZE)]
    }

    pub fn screen_buffer_mut(&mut self) -> &mut [u8] {
        &mut self.memory[display::BUFFER_START..(display::BUFFER_START + display::BUFFER_SIZE)]
    }

    /// Will return the memory range `[from, from + len)` or an error if it leaves the memory.
    pub fn memory_range(&self, from: usize, len: usize) -> Result<&[u8], MemoryError> {
        let (from, to) = self.check_range(from, len)?;
        Ok(&self.memory[from..to])
    }

    /// Mutable version of [`memory_range`](Self::memory_range)
    pub fn memory_range_mut(&mut self, from: usize, len: usize) -> Result<&mut [u8], MemoryError> {
        let (from, to) = self.check_range(from, len)?;
        Ok(&mut self.memory[from..to])
    }

    fn check_range(&self, from: usize, len: usize) -> Result<(usize, usize), MemoryError> {
        let to = from + len;
        if to > self.memory.len() {
            Err(MemoryError::OutOfBounds {
                address: to - 1,
                len: self.memory.len(),
            })
        } else {
            Ok((from, to))
        }
    }
}
