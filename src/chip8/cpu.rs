use std::convert::TryFrom;

use rand::RngCore;

use crate::{
    definitions::memory,
    gpu::{Blit, XorBlitter},
    opcode::{
        self, ChipOpcodes, Opcode, Opcodes, Operation, ProgramCounter, ProgramCounterStep,
    },
    state::MachineState,
    ProcessError,
};

/// The Cpu drives the [`MachineState`] it owns, it fetches, decodes and
/// executes a single instruction per [`tick`](Cpu::tick) and paces the
/// timers. Sprite composition is delegated to the blitter `G`.
pub struct Cpu<G = XorBlitter>
where
    G: Blit,
{
    /// the last fetched opcode
    pub(super) opcode: Opcode,
    pub(super) state: MachineState,
    pub(super) gpu: G,
    /// This stores the random number generator, used by `CXNN`.
    /// It is stored into the cpu, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl Cpu<XorBlitter> {
    /// will create a new cpu using the standard blitter and the os random source
    pub fn new(state: MachineState) -> Self {
        Self::with_parts(state, XorBlitter::new(), Box::new(rand::rngs::OsRng))
    }
}

impl<G: Blit> Cpu<G> {
    pub fn with_parts(state: MachineState, gpu: G, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            opcode: 0,
            state,
            gpu,
            rng,
        }
    }

    /// Will replace the random number generator.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    /// will get the next opcode from memory
    pub(super) fn set_opcode(&mut self) -> Result<(), ProcessError> {
        self.opcode =
            opcode::build_opcode(&self.state.memory, self.state.program_counter as usize)?;
        Ok(())
    }

    /// will advance the program by a single step
    ///
    /// Unless the instruction is `FX0A` without a pressed key (reported as
    /// [`Operation::Wait`]) the program counter moves on and the timer
    /// divider is stepped.
    pub fn tick(&mut self) -> Result<Operation, ProcessError> {
        self.set_opcode()?;
        log::debug!(
            "pc {:#06X} opcode {:#06X}",
            self.state.program_counter,
            self.opcode
        );

        let operation = match Opcodes::try_from(self.opcode) {
            Ok(ops) => self.calc(&ops)?,
            Err(err) => {
                log::warn!("{} Ignoring it.", err);
                self.step(ProgramCounterStep::Next);
                Operation::None
            }
        };

        if operation != Operation::Wait {
            self.state.timers.step();
        }
        Ok(operation)
    }

    /// The opcode fetched by the last tick
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; crate::definitions::keyboard::SIZE]) {
        self.state.keyboard.set_keys(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) {
        self.state.keyboard.set_key(key, to)
    }

    /// Toggles the shift quirk, see [`MachineState::schip`].
    pub fn set_schip(&mut self, schip: bool) {
        self.state.schip = schip;
    }
}

impl<G: Blit> ProgramCounter for Cpu<G> {
    fn step(&mut self, step: ProgramCounterStep) {
        self.state.program_counter = step.apply(self.state.program_counter);
    }
}

/// The address after the instruction at `pc`.
#[inline]
pub(super) fn next_instruction(pc: u16) -> u16 {
    pc.wrapping_add(memory::opcodes::SIZE)
}
