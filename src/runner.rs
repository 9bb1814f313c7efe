//! Control loop and render adapter.
//!
//! [`Runner`] owns the ports, the button debouncers and the [`Session`].
//! Each [`Runner::tick`] samples the buttons once, steps the state machine
//! and applies the resulting commands in order.  Holds and tone pauses are
//! wall-clock waits on the delay provider; with
//! [`HoldPolicy::ResetInterruptible`] the reset line keeps being sampled
//! during holds and cuts them short.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{
    HoldPolicy, BANNER_HOLD_MS, DEBOUNCE_SETTLE_MS, FATAL_BLINK_HALF_PERIOD_MS, HOLD_POLICY,
    POLL_INTERVAL_MS,
};
use crate::error::Error;
use crate::machine::{Command, Outputs, Session, Tone};
use crate::ports::{AudioPort, ButtonInputs, Clock, DisplayPort, LedBank};
use crate::ui::debounce::ButtonBank;
use crate::ui::screen::Screen;
use crate::ui::Button;

pub struct Runner<D, A, L, B, C, Y> {
    display: D,
    audio: A,
    leds: LedBank<L>,
    buttons: ButtonInputs<B>,
    clock: C,
    delay: Y,
    bank: ButtonBank,
    session: Session,
    policy: HoldPolicy,
    pending_reset: bool,
    last_screen: Option<Screen>,
}

impl<D, A, L, B, C, Y> Runner<D, A, L, B, C, Y>
where
    D: DisplayPort,
    A: AudioPort,
    L: OutputPin,
    B: InputPin,
    C: Clock,
    Y: DelayNs,
{
    /// Assemble the runner. No hardware is touched until [`Runner::start`].
    pub fn new(
        display: D,
        audio: A,
        leds: LedBank<L>,
        buttons: ButtonInputs<B>,
        clock: C,
        delay: Y,
    ) -> Self {
        Self {
            display,
            audio,
            leds,
            buttons,
            clock,
            delay,
            bank: ButtonBank::new(DEBOUNCE_SETTLE_MS),
            session: Session::new(),
            policy: HOLD_POLICY,
            pending_reset: false,
            last_screen: None,
        }
    }

    pub fn with_policy(mut self, policy: HoldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Power-up sequence: display init, banner, dark LEDs, CHOOSE.
    ///
    /// `Err(Error::DisplayInit)` means the panel is missing; the caller is
    /// expected to give up with [`Runner::fatal_blink`].
    pub fn start(&mut self) -> Result<(), Error> {
        self.display.init().map_err(|_| Error::DisplayInit)?;
        self.render(Screen::Banner)?;
        self.delay.delay_ms(BANNER_HOLD_MS);
        self.leds.clear()?;
        self.session = Session::new();
        Ok(())
    }

    /// One control loop iteration.
    ///
    /// Every command of the step is applied even if an earlier one failed;
    /// the first failure is returned.
    pub fn tick(&mut self) -> Result<(), Error> {
        let levels = self.buttons.levels()?;
        let mut presses = self.bank.sample(levels, self.clock.now_ms());
        if core::mem::take(&mut self.pending_reset) {
            presses.insert(Button::Reset);
        }
        #[cfg(feature = "defmt")]
        if presses.contains(Button::Reset) {
            defmt::info!("Reset");
        }

        let outputs = self.session.step(presses);
        self.apply(&outputs)
    }

    /// Blink LED R1A forever.
    pub fn fatal_blink(&mut self) -> ! {
        let delay = &mut self.delay;
        match self.leds.line_mut(0) {
            Some(led) => fatal_blink(led, delay),
            None => loop {
                delay.delay_ms(FATAL_BLINK_HALF_PERIOD_MS);
            },
        }
    }

    fn apply(&mut self, outputs: &Outputs) -> Result<(), Error> {
        let mut result = Ok(());
        for command in outputs {
            let applied = match *command {
                Command::Leds(pattern) => self.leds.show(pattern),
                Command::Render(screen) => self.render(screen),
                Command::Beep(tone) => {
                    self.beep(tone);
                    Ok(())
                }
                Command::Hold(ms) => self.hold(ms),
            };
            if let Err(e) = applied {
                result = result.and(Err(e));
            }
            // The reset step redraws everything, skip the rest.
            if self.pending_reset {
                break;
            }
        }
        result
    }

    fn render(&mut self, screen: Screen) -> Result<(), Error> {
        if self.last_screen == Some(screen) {
            return Ok(());
        }
        let frame = screen.layout()?;
        self.display.draw(&frame)?;
        self.last_screen = Some(screen);
        Ok(())
    }

    fn beep(&mut self, tone: Tone) {
        self.audio.tone(tone.frequency_hz(), tone.duration_ms());
        self.delay
            .delay_ms(tone.pause_ms().saturating_sub(tone.duration_ms()));
    }

    fn hold(&mut self, ms: u32) -> Result<(), Error> {
        match self.policy {
            HoldPolicy::Blocking => {
                self.delay.delay_ms(ms);
                Ok(())
            }
            HoldPolicy::ResetInterruptible => {
                let start = self.clock.now_ms();
                let end = start + u64::from(ms);
                loop {
                    let now = self.clock.now_ms();
                    if now >= end {
                        return Ok(());
                    }
                    let level = self.buttons.level(Button::Reset.index())?;
                    if self.bank.sample_one(Button::Reset, level, now) {
                        #[cfg(feature = "defmt")]
                        defmt::info!("Hold cut short by reset");
                        self.pending_reset = true;
                        return Ok(());
                    }
                    let step = (end - now).min(u64::from(POLL_INTERVAL_MS));
                    self.delay.delay_ms(step as u32);
                }
            }
        }
    }
}

/// Toggle `led` forever at [`FATAL_BLINK_HALF_PERIOD_MS`].
pub fn fatal_blink<P: OutputPin, Y: DelayNs>(led: &mut P, delay: &mut Y) -> ! {
    loop {
        let _ = led.set_high();
        delay.delay_ms(FATAL_BLINK_HALF_PERIOD_MS);
        let _ = led.set_low();
        delay.delay_ms(FATAL_BLINK_HALF_PERIOD_MS);
    }
}
