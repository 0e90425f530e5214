//! SSD1306 OLED rendering of a [`FrameDescription`].

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use media_remote::{Display, Error, FrameDescription, Release, Resource};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

type Oled<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const WIDTH: i32 = 128;
const CHAR_WIDTH: i32 = 6;

/// Text baselines for [`FrameDescription::lines`], top to bottom.
const ROW_Y: [i32; FrameDescription::ROWS] = [9, 23, 34, 44, 54, 63];
/// Rule under the title row.
const RULE_Y: i32 = 12;

pub struct Screen<I2C> {
    oled: Oled<I2C>,
}

impl<I2C> Screen<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 and clear it.
    pub fn init(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let unavailable = |_| Error::ResourceUnavailable(Resource::Display);
        oled.init().map_err(unavailable)?;
        oled.clear_buffer();
        oled.flush().map_err(unavailable)?;
        Ok(Self { oled })
    }

    fn text(&mut self, text: &str, x: i32, y: i32) {
        let _ = Text::new(text, Point::new(x, y), text_style()).draw(&mut self.oled);
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> Display for Screen<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self, frame: &FrameDescription) -> Result<(), Error> {
        self.oled.clear_buffer();

        for (line, y) in frame.lines().into_iter().zip(ROW_Y) {
            self.text(line, 0, y);
        }

        let badge_x = WIDTH - CHAR_WIDTH * frame.badge.len() as i32;
        self.text(frame.badge, badge_x, ROW_Y[0]);
        let _ = Line::new(Point::new(0, RULE_Y), Point::new(WIDTH - 1, RULE_Y))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.oled);

        self.oled.flush().map_err(|_| Error::DisplayFailed)
    }
}

impl<I2C> Release for Screen<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn release(mut self) -> Result<(), Error> {
        self.oled.clear_buffer();
        self.oled
            .flush()
            .and_then(|()| self.oled.set_display_on(false))
            .map_err(|_| Error::ReleaseFailed(Resource::Display))
    }
}
