//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and feedback tones
//! live here so they can be tuned in one place.

// Input

/// Settle window a button must stay pressed before it counts (ms).
pub const DEBOUNCE_SETTLE_MS: u64 = 200;

/// Control loop period (ms). Also the sampling step while a hold is
/// interruptible by reset.
pub const POLL_INTERVAL_MS: u32 = 10;

// Holds

/// LEDs show the "after claim" pattern this long in the warm-up run (ms).
pub const RUN_STEP_HOLD_MS: u32 = 800;

/// Pause after a correct process is executed (ms).
pub const EXECUTE_STEP_HOLD_MS: u32 = 500;

/// "Memorize this" pause on the safe-sequence screen (ms).
pub const SHOW_SAFE_HOLD_MS: u32 = 2000;

/// Pause after a reset before input is sampled again (ms).
pub const RESET_HOLD_MS: u32 = 300;

/// Title banner time at power-up (ms).
pub const BANNER_HOLD_MS: u32 = 2000;

/// Whether a reset press may cut a hold short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldPolicy {
    /// Holds run to completion; a held reset is seen afterwards.
    Blocking,
    /// Reset is sampled during holds and aborts them.
    ResetInterruptible,
}

/// Hold policy used by the firmware.
pub const HOLD_POLICY: HoldPolicy = HoldPolicy::Blocking;

// Buzzer

/// Success beep: frequency (Hz), tone length (ms), total pause (ms).
pub const SUCCESS_TONE_HZ: u32 = 2000;
pub const SUCCESS_TONE_MS: u32 = 100;
pub const SUCCESS_PAUSE_MS: u32 = 150;

/// Error buzz: frequency (Hz), tone length (ms), total pause (ms).
pub const ERROR_TONE_HZ: u32 = 1000;
pub const ERROR_TONE_MS: u32 = 300;
pub const ERROR_PAUSE_MS: u32 = 350;

// Fatal signal

/// Half period of the blink shown when the display is missing (ms).
pub const FATAL_BLINK_HALF_PERIOD_MS: u32 = 100;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` pins are
// picked in `main.rs`.  Buttons are active-low with internal pull-ups.
//
//   Button R1 toggle → P0.11
//   Button R2 toggle → P0.12
//   Button PROC      → P0.24
//   Button OK        → P0.25
//   Button RESET     → P1.08
//   LED R1A          → P0.13
//   LED R1B          → P0.14
//   LED R2A          → P0.15
//   LED R2B          → P0.16
//   Buzzer           → P1.10
//   I²C SDA          → P0.26
//   I²C SCL          → P0.27

/// SSD1306 I²C address.
pub const DISPLAY_I2C_ADDRESS: u8 = 0x3C;
