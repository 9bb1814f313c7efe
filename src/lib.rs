//! Banker's Algorithm trainer - library side.
//!
//! Everything with logical content lives here and runs on the host:
//! scenario tables, button debouncing, the interaction state machine,
//! screen layout, and the runner that applies state-machine output to
//! hardware ports.
//!
//! Usage: `cargo test --lib` / `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and only adds the nRF52840 / SSD1306 glue.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod machine;
pub mod ports;
pub mod runner;
pub mod scenario;
pub mod ui;

pub use error::Error;
pub use machine::{transition, Command, Phase, Session, Tone};
pub use runner::Runner;
pub use scenario::{classify, LedPattern, ProcessId, Resources, Scenario, Units};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::scenario::*;
    use super::ui::debounce::{ButtonBank, Debouncer, Level};
    use super::ui::screen::{Screen, TextSize};
    use super::ui::{Button, PressSet};

    // ════════════════════════════════════════════════════════════════════════
    // Scenario Classifier
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn classify_follows_priority_order() {
        assert_eq!(classify(Units::Two, Units::Two), Scenario::BothDouble);
        assert_eq!(classify(Units::Two, Units::One), Scenario::FirstDouble);
        assert_eq!(classify(Units::One, Units::Two), Scenario::SecondDouble);
        assert_eq!(classify(Units::One, Units::One), Scenario::BothSingle);
    }

    #[test]
    fn classify_is_a_bijection_onto_table_rows() {
        let mut seen = [false; 4];
        for r1 in [Units::One, Units::Two] {
            for r2 in [Units::One, Units::Two] {
                let index = classify(r1, r2).index();
                assert!(!seen[index], "row {index} hit twice");
                seen[index] = true;
            }
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn scenario_indices_match_all_order() {
        for (i, s) in Scenario::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn units_toggle_between_one_and_two() {
        assert_eq!(Units::One.toggled(), Units::Two);
        assert_eq!(Units::Two.toggled(), Units::One);
        assert_eq!(Units::default().count(), 1);
        assert_eq!(Units::Two.count(), 2);
    }

    #[test]
    fn resources_scenario_is_recomputed() {
        let mut r = Resources::default();
        assert_eq!(r.scenario(), Scenario::BothSingle);
        r.r2 = Units::Two;
        assert_eq!(r.scenario(), Scenario::SecondDouble);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Scenario Tables
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn safe_order_is_a_permutation_for_every_scenario() {
        for s in Scenario::ALL {
            let mut seen = [false; PROCESS_COUNT];
            for p in s.safe_order() {
                let i = usize::from(p.get());
                assert!(!seen[i], "{s:?} repeats {p}");
                seen[i] = true;
            }
            assert_eq!(seen, [true; PROCESS_COUNT], "{s:?}");
        }
    }

    #[test]
    fn safe_orders_match_device_tables() {
        let ids = |s: Scenario| s.safe_order().map(|p| p.get());
        assert_eq!(ids(Scenario::BothDouble), [1, 0, 2]);
        assert_eq!(ids(Scenario::FirstDouble), [2, 0, 1]);
        assert_eq!(ids(Scenario::SecondDouble), [1, 2, 0]);
        assert_eq!(ids(Scenario::BothSingle), [0, 1, 2]);
    }

    #[test]
    fn full_availability_patterns() {
        assert_eq!(Scenario::BothDouble.full_availability().bits(), 0b1111);
        assert_eq!(Scenario::FirstDouble.full_availability().bits(), 0b0111);
        assert_eq!(Scenario::SecondDouble.full_availability().bits(), 0b1101);
        assert_eq!(Scenario::BothSingle.full_availability().bits(), 0b1010);
    }

    #[test]
    fn claims_never_free_more_than_full_availability() {
        for s in Scenario::ALL {
            let full = s.full_availability().bits();
            for step in 0..PROCESS_COUNT {
                for pattern in [s.before_claim(step), s.after_claim(step)] {
                    assert_eq!(pattern.bits() & !full, 0, "{s:?} step {step}");
                }
            }
        }
    }

    #[test]
    fn claim_patterns_for_both_double() {
        let s = Scenario::BothDouble;
        assert_eq!(s.before_claim(0), LedPattern::from_levels([1, 1, 1, 1]));
        assert_eq!(s.after_claim(1), LedPattern::from_levels([0, 1, 0, 1]));
        assert_eq!(s.before_claim(2), LedPattern::from_levels([0, 1, 0, 1]));
        assert_eq!(s.after_claim(2).free_units(), 2);
    }

    #[test]
    fn led_pattern_line_order() {
        let p = LedPattern::from_levels([1, 0, 0, 1]);
        assert!(p.is_lit(0));
        assert!(!p.is_lit(1));
        assert!(!p.is_lit(2));
        assert!(p.is_lit(3));
        assert!(!p.is_lit(4));
        assert_eq!(LedPattern::OFF.free_units(), 0);
    }

    #[test]
    fn process_id_cycles_and_bounds() {
        assert_eq!(ProcessId::P0.next(), ProcessId::P1);
        assert_eq!(ProcessId::P2.next(), ProcessId::P0);
        assert_eq!(ProcessId::new(2), Some(ProcessId::P2));
        assert_eq!(ProcessId::new(3), None);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Debouncer
    // ════════════════════════════════════════════════════════════════════════

    const SETTLE: u64 = 200;

    #[test]
    fn press_reported_once_after_settle_window() {
        let mut d = Debouncer::new(SETTLE);
        assert!(!d.sample(Level::Active, 0));
        assert!(!d.sample(Level::Active, 199));
        assert!(d.sample(Level::Active, 200));
        assert!(d.is_held());
        // Holding does not repeat.
        for t in (210..2000).step_by(10) {
            assert!(!d.sample(Level::Active, t));
        }
        assert!(!d.sample(Level::Inactive, 2000));
        assert!(!d.is_held());
    }

    #[test]
    fn bounce_within_settle_window_is_one_press() {
        let mut d = Debouncer::new(SETTLE);
        let samples = [
            (Level::Active, 0),
            (Level::Inactive, 5),
            (Level::Active, 10),
            (Level::Inactive, 15),
            (Level::Active, 20),
        ];
        for (level, t) in samples {
            assert!(!d.sample(level, t));
        }
        assert!(d.sample(Level::Active, 200));
        for t in (210..400).step_by(10) {
            assert!(!d.sample(Level::Active, t));
        }
    }

    #[test]
    fn short_tap_reported_when_window_closes() {
        let mut d = Debouncer::new(SETTLE);
        assert!(!d.sample(Level::Active, 0));
        assert!(!d.sample(Level::Inactive, 120));
        assert!(!d.sample(Level::Inactive, 190));
        assert!(d.sample(Level::Inactive, 200));
        assert!(!d.is_held());

        // Released inside the window, so the next tap is accepted at once.
        assert!(!d.sample(Level::Active, 250));
        assert!(!d.sample(Level::Inactive, 300));
        assert!(d.sample(Level::Inactive, 450));
    }

    #[test]
    fn release_bounce_does_not_retrigger() {
        let mut d = Debouncer::new(SETTLE);
        d.sample(Level::Active, 0);
        assert!(d.sample(Level::Active, 200));
        assert!(!d.sample(Level::Inactive, 500));
        assert!(!d.sample(Level::Active, 505));
        assert!(!d.sample(Level::Inactive, 510));
        assert!(!d.sample(Level::Inactive, 900));
    }

    #[test]
    fn second_press_needs_release_first() {
        let mut d = Debouncer::new(SETTLE);
        d.sample(Level::Active, 0);
        assert!(d.sample(Level::Active, 200));
        assert!(!d.sample(Level::Active, 600));
        d.sample(Level::Inactive, 700);
        assert!(!d.sample(Level::Active, 950));
        assert!(d.sample(Level::Active, 1150));
    }

    #[test]
    fn reset_forgets_pending_press() {
        let mut d = Debouncer::new(SETTLE);
        d.sample(Level::Active, 0);
        d.reset();
        assert!(!d.sample(Level::Active, 200));
        assert!(d.sample(Level::Active, 400));
    }

    #[test]
    fn level_decodes_active_low() {
        assert_eq!(Level::from_low(true), Level::Active);
        assert_eq!(Level::from_low(false), Level::Inactive);
    }

    #[test]
    fn button_bank_tracks_lines_independently() {
        let mut bank = ButtonBank::new(SETTLE);
        let mut levels = [Level::Inactive; 5];
        levels[Button::Confirm.index()] = Level::Active;
        assert!(bank.sample(levels, 0).is_empty());

        levels[Button::Cycle.index()] = Level::Active;
        let presses = bank.sample(levels, 200);
        assert_eq!(presses, PressSet::only(Button::Confirm));
        assert!(bank.is_held(Button::Confirm));

        let presses = bank.sample(levels, 400);
        assert_eq!(presses, PressSet::only(Button::Cycle));
    }

    #[test]
    fn press_set_membership() {
        let set = PressSet::only(Button::Reset).with(Button::ResourceTwo);
        assert!(set.contains(Button::Reset));
        assert!(set.contains(Button::ResourceTwo));
        assert!(!set.contains(Button::Confirm));
        assert!(PressSet::NONE.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Screen Layout
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn choose_screen_shows_resource_totals() {
        let frame = Screen::Choose {
            resources: Resources::new(Units::Two, Units::One),
        }
        .layout()
        .unwrap();
        let texts: Vec<&str> = frame.texts().collect();
        assert_eq!(
            texts,
            ["Choose Resources", "R1: 2", "R2: 1", "Press OK to confirm"]
        );
        // Blank println rows still advance the cursor.
        assert_eq!(frame.lines[1].y, 16);
        assert_eq!(frame.lines[3].y, 40);
    }

    #[test]
    fn run_order_screen_uses_large_process_label() {
        let frame = Screen::RunOrder { step: 2 }.layout().unwrap();
        let big = frame
            .lines
            .iter()
            .find(|l| l.size == TextSize::Large)
            .unwrap();
        assert_eq!(big.text.as_str(), "P2");
        assert_eq!(big.y, 24);
        assert_eq!(frame.lines.last().unwrap().y, 48);
    }

    #[test]
    fn safe_sequence_screen_lists_order() {
        let frame = Screen::SafeSequence {
            order: Scenario::FirstDouble.safe_order(),
        }
        .layout()
        .unwrap();
        assert!(frame.contains("P2>P0>P1"));
    }

    #[test]
    fn execute_screen_shows_next_and_selection() {
        let frame = Screen::Execute {
            order: Scenario::BothDouble.safe_order(),
            next: ProcessId::P0,
            selected: ProcessId::P2,
        }
        .layout()
        .unwrap();
        assert!(frame.contains("P1 > P0 > P2"));
        assert!(frame.contains("Next: P0"));
        assert!(frame.contains("Sel: P2"));
    }

    #[test]
    fn finished_screen_uses_fixed_positions() {
        let frame = Screen::Finished.layout().unwrap();
        let pos: Vec<(i32, i32)> = frame.lines.iter().map(|l| (l.x, l.y)).collect();
        assert_eq!(pos, [(35, 0), (10, 20), (10, 40)]);
        assert!(frame.lines.iter().all(|l| l.size == TextSize::Large));
    }

    #[test]
    fn banner_fits_line_capacity() {
        let frame = Screen::Banner.layout().unwrap();
        assert!(frame.contains("Banker's Algorithm"));
        assert_eq!(frame.lines.len(), 3);
    }
    // ════════════════════════════════════════════════════════════════════════
    // Ports
    // ════════════════════════════════════════════════════════════════════════

    use super::ports::{AudioPort, LedBank, SquareWaveBuzzer};
    use core::convert::Infallible;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType, OutputPin};

    #[derive(Default)]
    struct CountingPin {
        high: bool,
        rising_edges: u32,
    }

    impl ErrorType for CountingPin {
        type Error = Infallible;
    }

    impl OutputPin for CountingPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct TotalDelay {
        ns: u64,
    }

    impl DelayNs for TotalDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ns += u64::from(ns);
        }
    }

    #[test]
    fn buzzer_plays_square_wave_for_duration() {
        let mut buzzer = SquareWaveBuzzer::new(CountingPin::default(), TotalDelay::default());
        buzzer.tone(2000, 100);
        assert_eq!(buzzer.pin().rising_edges, 200);
        assert!(!buzzer.pin().high, "line idles low after the tone");
        assert_eq!(buzzer.delay().ns, 100_000_000);
    }

    #[test]
    fn led_bank_follows_pattern_bits() {
        let mut bank = LedBank::new([
            CountingPin::default(),
            CountingPin::default(),
            CountingPin::default(),
            CountingPin::default(),
        ]);
        bank.show(Scenario::SecondDouble.full_availability()).unwrap();
        let lit: Vec<bool> = (0..4).map(|i| bank.line_mut(i).unwrap().high).collect();
        assert_eq!(lit, [true, false, true, true]);

        bank.clear().unwrap();
        assert!((0..4).all(|i| !bank.line_mut(i).unwrap().high));
    }
}
