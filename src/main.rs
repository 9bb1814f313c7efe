//! banker-trainer firmware for nRF52840.
//!
//! Wires the board into the library ports and runs the control loop:
//! five buttons in, four availability LEDs, a passive buzzer and an
//! SSD1306 OLED out.  All interaction logic lives in the library.

#![no_std]
#![no_main]

mod display;

use banker_trainer::config::{self, POLL_INTERVAL_MS};
use banker_trainer::ports::{ButtonInputs, Clock, LedBank, SquareWaveBuzzer};
use banker_trainer::Runner;
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Delay, Instant, Timer};
use panic_probe as _;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Milliseconds since boot from the embassy time driver.
struct Uptime;

impl Clock for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("banker-trainer starting");

    let leds = LedBank::new([
        Output::new(p.P0_13, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_14, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_16, Level::Low, OutputDrive::Standard),
    ]);

    // Order must match `Button::ALL`.
    let buttons = ButtonInputs::new([
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
        Input::new(p.P1_08, Pull::Up),
    ]);

    let buzzer = SquareWaveBuzzer::new(
        Output::new(p.P1_10, Level::Low, OutputDrive::Standard),
        Delay,
    );

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let oled = display::Oled::new(i2c);

    let mut runner = Runner::new(oled, buzzer, leds, buttons, Uptime, Delay);

    if let Err(e) = runner.start() {
        error!("Startup failed: {}", e);
        runner.fatal_blink();
    }
    info!("Ready (hold policy {})", config::HOLD_POLICY);

    loop {
        if let Err(e) = runner.tick() {
            warn!("Tick: {}", e);
        }
        Timer::after_millis(u64::from(POLL_INTERVAL_MS)).await;
    }
}
