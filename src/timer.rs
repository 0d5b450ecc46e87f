use crate::definitions::timer::DIVIDER;

/// The delay and the sound timer together with the divider that
/// paces them.
///
/// There is no clock of its own, the timers are advanced by the cpu. Every
/// call to [`step`](Timers::step) counts the divider down, once it would
/// drop below zero it is reloaded and both timers lose one, never going
/// below zero. With the cpu ticking at ~540Hz this yields roughly 60Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub delay: u8,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    pub sound: u8,
    /// The sub divider, counts from `DIVIDER` down to `0`.
    pub counter: u8,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            delay: 0,
            sound: 0,
            counter: DIVIDER,
        }
    }
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will advance the divider by a single cpu cycle.
    pub fn step(&mut self) {
        if self.counter > 0 {
            self.counter -= 1;
        } else {
            log::trace!("timer reload delay {} sound {}", self.delay, self.sound);
            self.counter = DIVIDER;
            self.delay = self.delay.saturating_sub(1);
            self.sound = self.sound.saturating_sub(1);
        }
    }

    /// If the host should currently play a tone.
    pub fn is_sound_active(&self) -> bool {
        self.sound > 0
    }
}
