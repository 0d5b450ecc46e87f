use crate::{
    chip8::Cpu,
    definitions::cpu,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    opcode::Operation,
    render::render,
    resources::Rom,
    state::MachineState,
    LoadError, ProcessError,
};

/// Drives the [`Cpu`] one display frame at a time.
///
/// The host calls [`frame`](Emulator::frame) at 60Hz and provides the
/// display, the keyboard and the beeper.
pub struct Emulator {
    cpu: Cpu,
    rom: Rom,
    cycles_per_frame: usize,
    sound_playing: bool,
}

impl Emulator {
    /// Will create a new emulator with the rom loaded at the program start.
    pub fn new(rom: Rom) -> Result<Self, LoadError> {
        let mut state = MachineState::new();
        state.load_program(rom.get_data())?;
        log::debug!("loaded rom {}", rom.get_name());

        Ok(Self {
            cpu: Cpu::new(state),
            rom,
            cycles_per_frame: cpu::CYCLES_PER_FRAME,
            sound_playing: false,
        })
    }

    /// The amount of instructions run per frame.
    pub fn with_cycles_per_frame(mut self, cycles: usize) -> Self {
        self.cycles_per_frame = cycles;
        self
    }

    /// Will reset the machine and reload the rom.
    pub fn reset(&mut self) -> Result<(), LoadError> {
        let state = self.cpu.state_mut();
        state.reset();
        state.load_program(self.rom.get_data())
    }

    /// Will run a single frame, the returned operation is the one of the last tick.
    pub fn frame<D, K, S>(
        &mut self,
        display: &mut D,
        keyboard: &K,
        sound: &mut S,
    ) -> Result<Operation, ProcessError>
    where
        D: DisplayCommands,
        K: KeyboardCommands,
        S: SoundCommands,
    {
        self.cpu.set_keyboard(&keyboard.get_keyboard());

        let mut last_op = Operation::None;
        for _ in 0..self.cycles_per_frame {
            last_op = self.cpu.tick()?;
        }

        let frame = render(self.cpu.state().screen_buffer(), false, true);
        display.display(&frame);

        let active = self.cpu.state().is_sound_active();
        if active && !self.sound_playing {
            sound.start();
        } else if !active && self.sound_playing {
            sound.stop();
        }
        self.sound_playing = active;

        Ok(last_op)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn cycles_per_frame(&self) -> usize {
        self.cycles_per_frame
    }

    pub fn is_sound_playing(&self) -> bool {
        self.sound_playing
    }
}
