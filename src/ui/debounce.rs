//! Edge-triggered button debouncing.
//!
//! Each line is sampled once per loop iteration.  The first active sample
//! starts a settle window during which the line is not looked at, so contact
//! bounce and short taps alike count as one press.  The press is reported
//! when the window closes; the line must then be seen released, and stay
//! ignored for another window to swallow release bounce, before it can
//! report again.  Nothing here blocks, so the control loop keeps running
//! while a button is held.

use super::{Button, PressSet, BUTTON_COUNT};

/// Electrical state of a button line after active-low decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Pressed (line pulled low).
    Active,
    /// Released (line idles high through the pull-up).
    Inactive,
}

impl Level {
    /// Decode an active-low line.
    pub const fn from_low(is_low: bool) -> Self {
        if is_low {
            Level::Active
        } else {
            Level::Inactive
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Released,
    Settling { since_ms: u64 },
    Pressed,
    Releasing { since_ms: u64 },
}

/// Debouncer for a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    state: State,
    settle_ms: u64,
}

impl Debouncer {
    pub const fn new(settle_ms: u64) -> Self {
        Self {
            state: State::Released,
            settle_ms,
        }
    }

    /// Feed one sample taken at `now_ms`.
    ///
    /// Returns `true` exactly once per press, on the first sample at or
    /// after the end of the settle window that the press opened.
    pub fn sample(&mut self, level: Level, now_ms: u64) -> bool {
        match self.state {
            State::Released if level == Level::Active => {
                self.state = State::Settling { since_ms: now_ms };
                self.settled(level, now_ms)
            }
            State::Released => false,
            State::Settling { .. } => self.settled(level, now_ms),
            State::Pressed => {
                if level == Level::Inactive {
                    self.state = State::Releasing { since_ms: now_ms };
                }
                false
            }
            State::Releasing { since_ms } => {
                if now_ms.saturating_sub(since_ms) < self.settle_ms {
                    return false;
                }
                self.state = State::Released;
                self.sample(level, now_ms)
            }
        }
    }

    /// `true` from the start of a press until the line is seen released.
    pub fn is_held(&self) -> bool {
        matches!(self.state, State::Settling { .. } | State::Pressed)
    }

    /// Forget any in-flight press.
    pub fn reset(&mut self) {
        self.state = State::Released;
    }

    fn settled(&mut self, level: Level, now_ms: u64) -> bool {
        let State::Settling { since_ms } = self.state else {
            return false;
        };
        if now_ms.saturating_sub(since_ms) < self.settle_ms {
            return false;
        }
        // Already let go: re-arm now instead of waiting for another release.
        self.state = match level {
            Level::Active => State::Pressed,
            Level::Inactive => State::Released,
        };
        true
    }
}

/// One debouncer per [`Button`].
#[derive(Clone, Debug)]
pub struct ButtonBank {
    lines: [Debouncer; BUTTON_COUNT],
}

impl ButtonBank {
    pub const fn new(settle_ms: u64) -> Self {
        Self {
            lines: [Debouncer::new(settle_ms); BUTTON_COUNT],
        }
    }

    /// Feed one sample of every line (indexed by [`Button::index`]) and
    /// collect the buttons whose press completed on this sample.
    pub fn sample(&mut self, levels: [Level; BUTTON_COUNT], now_ms: u64) -> PressSet {
        let mut presses = PressSet::NONE;
        for button in Button::ALL {
            if self.lines[button.index()].sample(levels[button.index()], now_ms) {
                presses.insert(button);
            }
        }
        presses
    }

    /// Feed a sample of a single line, leaving the others untouched.
    pub fn sample_one(&mut self, button: Button, level: Level, now_ms: u64) -> bool {
        self.lines[button.index()].sample(level, now_ms)
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.lines[button.index()].is_held()
    }
}
