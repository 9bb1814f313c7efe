//! Interaction state machine.
//!
//! The whole interaction lives in one [`Session`]: the configured resource
//! totals plus the current [`Phase`], with the counters that only make sense
//! in that phase carried inside the phase variant.  [`transition`] is a pure
//! function from a session and the presses seen in one loop iteration to the
//! next session and an ordered list of [`Command`]s.  The runner applies the
//! commands in that order, so LEDs, tones and screens never show a
//! half-updated session.
//!
//! ```text
//! CHOOSE ──OK──▶ RUN_ORDER ──3×OK──▶ SHOW_SAFE ──▶ EXECUTE ──3×match──▶ FINISHED
//!    ▲                                                                      │
//!    └───────────────────────── RESET (from any phase) ─────────────────────┘
//! ```


use heapless::Vec;

use crate::config;
use crate::scenario::{LedPattern, ProcessId, Resources, Scenario, PROCESS_COUNT};
use crate::ui::screen::Screen;
use crate::ui::{Button, PressSet};

/// Feedback tones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Tone::Success => config::SUCCESS_TONE_HZ,
            Tone::Error => config::ERROR_TONE_HZ,
        }
    }

    pub const fn duration_ms(self) -> u32 {
        match self {
            Tone::Success => config::SUCCESS_TONE_MS,
            Tone::Error => config::ERROR_TONE_MS,
        }
    }

    /// Time from the start of the tone until input is sampled again.
    pub const fn pause_ms(self) -> u32 {
        match self {
            Tone::Success => config::SUCCESS_PAUSE_MS,
            Tone::Error => config::ERROR_PAUSE_MS,
        }
    }
}

/// Output produced by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Drive the four availability LEDs.
    Leds(LedPattern),
    /// Clear the display and draw a screen.
    Render(Screen),
    /// Play a tone and wait out its pause.
    Beep(Tone),
    /// Keep the current outputs for this long (ms).
    Hold(u32),
}

/// Upper bound on commands emitted by one transition.
pub const MAX_COMMANDS: usize = 8;

/// Commands of one transition, in the order they must be applied.
pub type Outputs = Vec<Command, MAX_COMMANDS>;

/// Interaction phase, with the progress counters scoped to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Configure the resource totals.
    #[default]
    Choose,
    /// Warm-up preview of the claim/release patterns.
    ///
    /// `rendered` is false until the current step's LEDs and screen have
    /// been shown once.
    RunOrder { step: u8, rendered: bool },
    /// Safe order on screen; moves to `Execute` on the next step.
    ShowSafe,
    /// The user replays the safe order.
    Execute { step: u8, selected: ProcessId },
    /// Idle until reset.
    Finished,
}

/// The single authoritative interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    phase: Phase,
    resources: Resources,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn resources(&self) -> Resources {
        self.resources
    }

    /// Scenario derived from the current totals.
    pub fn scenario(&self) -> Scenario {
        self.resources.scenario()
    }

    /// Progress through the warm-up run (0..=3).
    pub fn run_index(&self) -> u8 {
        match self.phase {
            Phase::Choose => 0,
            Phase::RunOrder { step, .. } => step,
            Phase::ShowSafe | Phase::Execute { .. } | Phase::Finished => PROCESS_COUNT as u8,
        }
    }

    /// Progress through the safe-order replay (0..=3).
    pub fn exec_index(&self) -> u8 {
        match self.phase {
            Phase::Execute { step, .. } => step,
            Phase::Finished => PROCESS_COUNT as u8,
            _ => 0,
        }
    }

    /// Process highlighted for the next confirm. Only meaningful in `Execute`.
    pub fn selected_process(&self) -> ProcessId {
        match self.phase {
            Phase::Execute { selected, .. } => selected,
            _ => ProcessId::P0,
        }
    }

    /// `true` while the current warm-up step has not been shown yet.
    pub fn awaiting_first_render(&self) -> bool {
        matches!(self.phase, Phase::RunOrder { rendered: false, .. })
    }

    /// Apply one loop iteration in place and return its commands.
    pub fn step(&mut self, presses: PressSet) -> Outputs {
        let (next, out) = transition(*self, presses);
        #[cfg(feature = "defmt")]
        if core::mem::discriminant(&next.phase) != core::mem::discriminant(&self.phase) {
            defmt::info!("Phase: {} -> {}", self.phase, next.phase);
        }
        *self = next;
        out
    }
}

/// Compute the next session and the commands for one loop iteration.
///
/// Reset wins over every other press and over the current phase.
pub fn transition(session: Session, presses: PressSet) -> (Session, Outputs) {
    let mut out = Outputs::new();

    if presses.contains(Button::Reset) {
        let fresh = Session::default();
        emit(&mut out, Command::Leds(LedPattern::OFF));
        emit(
            &mut out,
            Command::Render(Screen::Choose {
                resources: fresh.resources,
            }),
        );
        emit(&mut out, Command::Hold(config::RESET_HOLD_MS));
        return (fresh, out);
    }

    let mut resources = session.resources;
    let phase = match session.phase {
        Phase::Choose => choose(&mut resources, presses, &mut out),
        Phase::RunOrder { step, rendered } => {
            run_order(resources.scenario(), step, rendered, presses, &mut out)
        }
        Phase::ShowSafe => Phase::Execute {
            step: 0,
            selected: ProcessId::P0,
        },
        Phase::Execute { step, selected } => {
            execute(resources.scenario(), step, selected, presses, &mut out)
        }
        Phase::Finished => {
            emit(&mut out, Command::Leds(resources.scenario().full_availability()));
            emit(&mut out, Command::Render(Screen::Finished));
            Phase::Finished
        }
    };

    (Session { phase, resources }, out)
}

fn choose(resources: &mut Resources, presses: PressSet, out: &mut Outputs) -> Phase {
    if presses.contains(Button::ResourceOne) {
        resources.r1 = resources.r1.toggled();
        emit(out, Command::Beep(Tone::Success));
    }
    if presses.contains(Button::ResourceTwo) {
        resources.r2 = resources.r2.toggled();
        emit(out, Command::Beep(Tone::Success));
    }

    emit(out, Command::Leds(resources.scenario().full_availability()));
    emit(
        out,
        Command::Render(Screen::Choose {
            resources: *resources,
        }),
    );

    if presses.contains(Button::Confirm) {
        emit(out, Command::Beep(Tone::Success));
        return Phase::RunOrder {
            step: 0,
            rendered: false,
        };
    }
    Phase::Choose
}

fn run_order(
    scenario: Scenario,
    step: u8,
    mut rendered: bool,
    presses: PressSet,
    out: &mut Outputs,
) -> Phase {
    let index = usize::from(step);

    if !rendered {
        emit(out, Command::Leds(scenario.before_claim(index)));
        emit(out, Command::Render(Screen::RunOrder { step }));
        rendered = true;
    }

    if !presses.contains(Button::Confirm) {
        return Phase::RunOrder { step, rendered };
    }

    emit(out, Command::Beep(Tone::Success));
    emit(out, Command::Leds(scenario.after_claim(index)));
    emit(out, Command::Hold(config::RUN_STEP_HOLD_MS));

    let step = step + 1;
    if usize::from(step) < PROCESS_COUNT {
        return Phase::RunOrder {
            step,
            rendered: false,
        };
    }

    emit(
        out,
        Command::Render(Screen::SafeSequence {
            order: scenario.safe_order(),
        }),
    );
    emit(out, Command::Hold(config::SHOW_SAFE_HOLD_MS));
    Phase::ShowSafe
}

fn execute(
    scenario: Scenario,
    step: u8,
    mut selected: ProcessId,
    presses: PressSet,
    out: &mut Outputs,
) -> Phase {
    let order = scenario.safe_order();
    let screen = |step: u8, selected: ProcessId| Screen::Execute {
        order,
        next: order[usize::from(step)],
        selected,
    };

    emit(out, Command::Render(screen(step, selected)));

    if presses.contains(Button::Cycle) {
        selected = selected.next();
        emit(out, Command::Beep(Tone::Success));
        emit(out, Command::Render(screen(step, selected)));
    }

    if !presses.contains(Button::Confirm) {
        return Phase::Execute { step, selected };
    }

    if selected != order[usize::from(step)] {
        emit(out, Command::Beep(Tone::Error));
        return Phase::Execute { step, selected };
    }

    emit(out, Command::Beep(Tone::Success));
    emit(out, Command::Leds(scenario.full_availability()));
    emit(out, Command::Hold(config::EXECUTE_STEP_HOLD_MS));

    let step = step + 1;
    if usize::from(step) >= PROCESS_COUNT {
        return Phase::Finished;
    }
    emit(out, Command::Render(screen(step, selected)));
    Phase::Execute { step, selected }
}

fn emit(out: &mut Outputs, command: Command) {
    let pushed = out.push(command);
    debug_assert!(pushed.is_ok(), "more than MAX_COMMANDS outputs in one step");
}
