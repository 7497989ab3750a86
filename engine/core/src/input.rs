use bit_field::BitField;

/// Keypad bits that carry buttons; the rest of the register reads as zero.
const KEY_MASK: u16 = 0x03FF;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
    R,
    L,
}

impl Button {
    const fn idx(&self) -> usize {
        match self {
            Button::A => 0,
            Button::B => 1,
            Button::Select => 2,
            Button::Start => 3,
            Button::Right => 4,
            Button::Left => 5,
            Button::Up => 6,
            Button::Down => 7,
            Button::R => 8,
            Button::L => 9,
        }
    }

    /// The bit this button occupies in the keypad register.
    pub const fn mask(&self) -> u16 {
        1 << self.idx()
    }
}

/// Source of the raw keypad register, sampled once per frame.
/// The register is active-low: a cleared bit means pressed.
pub trait InputSource {
    fn sample(&mut self) -> u16;
}

/// Pressed buttons for this frame and the one before.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub buttons: u16,
    pub buttons_last: u16,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            buttons: 0,
            buttons_last: 0,
        }
    }

    /// Build a state from an active-high mask, e.g. `Button::A.mask()`.
    pub const fn from_pressed(pressed: u16) -> Self {
        Self {
            buttons: pressed & KEY_MASK,
            buttons_last: 0,
        }
    }

    /// Shift in a new raw (active-low) register sample.
    #[inline]
    pub fn latch(&mut self, raw: u16) {
        self.buttons_last = self.buttons;
        self.buttons = !raw & KEY_MASK;
    }

    /// Read the source and latch it.
    pub fn poll<I: InputSource>(&mut self, source: &mut I) {
        self.latch(source.sample());
    }

    #[inline]
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons.get_bit(button.idx())
    }

    #[inline]
    pub fn was_pressed(&self, button: Button) -> bool {
        self.buttons_last.get_bit(button.idx())
    }

    /// True only on the frame the button went down.
    #[inline]
    pub fn just_pressed(&self, button: Button) -> bool {
        self.is_pressed(button) && !self.was_pressed(button)
    }

    /// True only on the frame the button came up.
    #[inline]
    pub fn just_released(&self, button: Button) -> bool {
        !self.is_pressed(button) && self.was_pressed(button)
    }
}
