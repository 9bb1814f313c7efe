//! SSD1306 OLED display wrapper.

use banker_trainer::config::DISPLAY_I2C_ADDRESS;
use banker_trainer::ports::DisplayPort;
use banker_trainer::ui::screen::{Frame, TextSize};
use banker_trainer::Error;
use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_9X15};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
type Driver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// 128×64 OLED on I²C.
pub struct Oled<I2C> {
    driver: Driver<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDRESS);
        let driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { driver }
    }
}

fn text_style(size: TextSize) -> MonoTextStyle<'static, BinaryColor> {
    let font = match size {
        TextSize::Small => &FONT_5X8,
        TextSize::Large => &FONT_9X15,
    };
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> DisplayPort for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn init(&mut self) -> Result<(), Error> {
        self.driver.init().map_err(|_| Error::DisplayInit)?;
        self.driver.clear_buffer();
        self.driver.flush().map_err(|_| Error::DisplayInit)
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), Error> {
        self.driver.clear_buffer();

        for line in &frame.lines {
            Text::with_baseline(
                line.text.as_str(),
                Point::new(line.x, line.y),
                text_style(line.size),
                Baseline::Top,
            )
            .draw(&mut self.driver)
            .map_err(|_| Error::Display)?;
        }

        self.driver.flush().map_err(|_| Error::Display)
    }
}
