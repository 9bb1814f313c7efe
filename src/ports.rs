//! Hardware boundary.
//!
//! The runner talks to the board only through these types.  GPIO goes
//! through the `embedded-hal` pin traits so the same code drives embassy
//! pins on the target and plain mocks in host tests; the display, buzzer
//! and clock get small traits of their own.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::Error;
use crate::scenario::{LedPattern, LED_COUNT};
use crate::ui::debounce::Level;
use crate::ui::screen::Frame;
use crate::ui::BUTTON_COUNT;

/// Text display that draws a whole frame at a time.
pub trait DisplayPort {
    /// Bring the panel up. Failure here is fatal for the firmware.
    fn init(&mut self) -> Result<(), Error>;

    /// Clear the buffer, draw `frame` and flush it.
    fn draw(&mut self, frame: &Frame) -> Result<(), Error>;
}

/// Tone generator.
pub trait AudioPort {
    /// Play a tone; returns once `duration_ms` has elapsed.
    fn tone(&mut self, frequency_hz: u32, duration_ms: u32);
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The four "resource unit available" LED lines, R1A, R1B, R2A, R2B.
pub struct LedBank<P> {
    lines: [P; LED_COUNT],
}

impl<P: OutputPin> LedBank<P> {
    pub fn new(lines: [P; LED_COUNT]) -> Self {
        Self { lines }
    }

    /// Drive every line to match `pattern`.
    ///
    /// All lines are written even if one fails; the first failure is
    /// reported.
    pub fn show(&mut self, pattern: LedPattern) -> Result<(), Error> {
        let mut result = Ok(());
        for (i, line) in self.lines.iter_mut().enumerate() {
            let written = if pattern.is_lit(i) {
                line.set_high()
            } else {
                line.set_low()
            };
            if written.is_err() && result.is_ok() {
                result = Err(Error::Gpio);
            }
        }
        result
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.show(LedPattern::OFF)
    }

    /// Direct access to one line, used by the fatal blink.
    pub fn line_mut(&mut self, index: usize) -> Option<&mut P> {
        self.lines.get_mut(index)
    }
}

/// The five active-low button lines, indexed by [`crate::ui::Button::index`].
pub struct ButtonInputs<P> {
    lines: [P; BUTTON_COUNT],
}

impl<P: InputPin> ButtonInputs<P> {
    pub fn new(lines: [P; BUTTON_COUNT]) -> Self {
        Self { lines }
    }

    /// Sample every line.
    pub fn levels(&mut self) -> Result<[Level; BUTTON_COUNT], Error> {
        let mut levels = [Level::Inactive; BUTTON_COUNT];
        for (level, line) in levels.iter_mut().zip(self.lines.iter_mut()) {
            *level = Level::from_low(line.is_low().map_err(|_| Error::Gpio)?);
        }
        Ok(levels)
    }

    /// Sample a single line.
    pub fn level(&mut self, index: usize) -> Result<Level, Error> {
        let line = self.lines.get_mut(index).ok_or(Error::Gpio)?;
        Ok(Level::from_low(line.is_low().map_err(|_| Error::Gpio)?))
    }
}

/// Passive buzzer driven with a 50 % square wave on a plain output pin.
pub struct SquareWaveBuzzer<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> SquareWaveBuzzer<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    #[cfg(test)]
    pub(crate) fn pin(&self) -> &P {
        &self.pin
    }

    #[cfg(test)]
    pub(crate) fn delay(&self) -> &D {
        &self.delay
    }
}

impl<P: OutputPin, D: DelayNs> AudioPort for SquareWaveBuzzer<P, D> {
    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) {
        if frequency_hz == 0 {
            self.delay.delay_ms(duration_ms);
            return;
        }
        let half_period_us = 500_000 / frequency_hz;
        let cycles = frequency_hz.saturating_mul(duration_ms) / 1000;
        for _ in 0..cycles {
            let _ = self.pin.set_high();
            self.delay.delay_us(half_period_us);
            let _ = self.pin.set_low();
            self.delay.delay_us(half_period_us);
        }
    }
}
