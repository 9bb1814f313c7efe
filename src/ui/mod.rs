//! User interface subsystem - buttons in, screens out.
//!
//! ## Components
//!
//! - **Buttons**: 5 tactile switches, active-low with pull-ups, debounced
//!   by [`debounce::ButtonBank`]
//! - **Screen**: what the 128×64 OLED shows for each phase, laid out as
//!   positioned text lines by [`screen::Screen::layout`]

pub mod debounce;
pub mod screen;

/// Physical buttons, in the order their lines are wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Toggle resource type 1 between one and two units.
    ResourceOne,
    /// Toggle resource type 2 between one and two units.
    ResourceTwo,
    /// Move the process selection to the next process.
    Cycle,
    /// OK - confirm the current step.
    Confirm,
    /// Return to the initial state from anywhere.
    Reset,
}

/// Number of button lines.
pub const BUTTON_COUNT: usize = 5;

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::ResourceOne,
        Button::ResourceTwo,
        Button::Cycle,
        Button::Confirm,
        Button::Reset,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Buttons that produced a debounced press during one loop iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressSet(u8);

impl PressSet {
    pub const NONE: PressSet = PressSet(0);

    pub const fn only(button: Button) -> Self {
        PressSet(1 << button.index())
    }

    pub const fn with(self, button: Button) -> Self {
        PressSet(self.0 | (1 << button.index()))
    }

    pub fn insert(&mut self, button: Button) {
        *self = self.with(button);
    }

    pub const fn contains(self, button: Button) -> bool {
        self.0 & (1 << button.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
