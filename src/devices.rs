use crate::{definitions::keyboard, render::Frame};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels
    fn display(&mut self, frame: &Frame<bool>);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    fn get_keyboard(&self) -> [bool; keyboard::SIZE];
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the beeper, driven by the sound timer
pub trait SoundCommands {
    fn start(&mut self);
    fn stop(&mut self);
}

/// The internal keyboard representation.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    pub fn toggle_key(&mut self, key: usize) {
        self.set_key(key, !self.keys[key])
    }

    pub fn set_key(&mut self, key: usize, to: bool) {
        debug_assert!(key < keyboard::SIZE);
        self.keys[key] = to;
    }

    pub fn set_keys(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys.copy_from_slice(keys);
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }

    /// Out of range keys are never pressed.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// The lowest index of all pressed keys.
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|pressed| *pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pressed_lowest_wins() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.first_pressed(), None);

        keyboard.set_key(0xC, true);
        keyboard.set_key(0x5, true);
        assert_eq!(keyboard.first_pressed(), Some(0x5));

        keyboard.toggle_key(0x5);
        assert_eq!(keyboard.first_pressed(), Some(0xC));
    }

    #[test]
    fn test_is_pressed_out_of_range() {
        let mut keyboard = Keyboard::new();
        keyboard.set_keys(&[true; keyboard::SIZE]);
        assert!(keyboard.is_pressed(0xF));
        assert!(!keyboard.is_pressed(0x10));
        assert!(!keyboard.is_pressed(0xFF));
    }
}
