//! PCD8544 LCD Driver
//!
//! Driver for the 84x48 PCD8544 (Nokia 5110) LCD over SPI, with separate
//! data/command and reset pins. The frame buffer is an `embedded-graphics`
//! draw target; text uses a Latin-1 5x8 font on a 6 pixel pitch (14 chars x
//! 6 rows), so accented Portuguese text renders as written.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::iso_8859_1::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use qboy_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Display dimensions
const WIDTH: usize = 84;
const HEIGHT: usize = 48;
const BANKS: usize = HEIGHT / 8;

/// Character cell size
const CHAR_WIDTH: i32 = 6;
const CHAR_HEIGHT: i32 = 8;

/// 5x8 glyphs with one column of spacing
const FONT: MonoFont<'static> = MonoFont {
    character_spacing: 1,
    ..FONT_5X8
};

/// Operating voltage (contrast) setting
pub const DEFAULT_CONTRAST: u8 = 0x31;

/// Boot screen title
const SPLASH_TITLE: &str = "QBOY";

/// PCD8544 commands
#[allow(dead_code)]
mod cmd {
    pub const FUNCTION_SET: u8 = 0x20;
    pub const EXTENDED: u8 = 0x01;
    pub const POWER_DOWN: u8 = 0x04;
    // Basic instruction set
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_NORMAL: u8 = 0x04;
    pub const DISPLAY_INVERSE: u8 = 0x05;
    pub const SET_Y: u8 = 0x40;
    pub const SET_X: u8 = 0x80;
    // Extended instruction set
    pub const TEMP_COEFF: u8 = 0x04;
    pub const BIAS: u8 = 0x10;
    pub const SET_VOP: u8 = 0x80;
}

/// PCD8544 LCD driver
pub struct Pcd8544<SPI, DC, RST, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: D,
    ready: bool,
    /// Frame buffer: one byte per column per 8-pixel bank, LSB at the top
    buffer: [u8; WIDTH * BANKS],
}

impl<SPI, DC, RST, D> Pcd8544<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a new driver; call [`DisplayBackend::init`] before use
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            ready: false,
            buffer: [0; WIDTH * BANKS],
        }
    }

    /// Show the boot screen until the first frame replaces it
    ///
    /// A framed title with a caption line under it.
    pub fn show_splash(&mut self, caption: &str) -> Result<(), DisplayError> {
        self.buffer.fill(0);

        let frame = Rectangle::new(Point::zero(), Size::new(WIDTH as u32, HEIGHT as u32));
        let drawn = RoundedRectangle::with_equal_corners(frame, Size::new(6, 6))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self);
        if let Err(never) = drawn {
            match never {}
        }

        let centre = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let middle = WIDTH as i32 / 2;

        let title = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        if let Err(never) =
            Text::with_text_style(SPLASH_TITLE, Point::new(middle, 6), title, centre).draw(self)
        {
            match never {}
        }

        let small = MonoTextStyle::new(&FONT, BinaryColor::On);
        if let Err(never) =
            Text::with_text_style(caption, Point::new(middle, 32), small, centre).draw(self)
        {
            match never {}
        }

        self.flush()
    }

    fn commands(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Communication)
    }

    fn data(&mut self) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::Communication)?;
        self.spi
            .write(&self.buffer)
            .map_err(|_| DisplayError::Communication)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let byte = &mut self.buffer[(y / 8) * WIDTH + x];
        let bit = 1 << (y % 8);
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> bool {
        self.buffer[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }
}

impl<SPI, DC, RST, D> OriginDimensions for Pcd8544<SPI, DC, RST, D> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<SPI, DC, RST, D> DrawTarget for Pcd8544<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl<SPI, DC, RST, D> DisplayBackend for Pcd8544<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        self.ready = false;

        // Reset pulse
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(1);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(1);

        let init_cmds = [
            cmd::FUNCTION_SET | cmd::EXTENDED,
            cmd::SET_VOP | DEFAULT_CONTRAST,
            cmd::TEMP_COEFF,
            cmd::BIAS | 0x04, // 1:48
            cmd::FUNCTION_SET,
            cmd::DISPLAY_CONTROL | cmd::DISPLAY_NORMAL,
        ];
        self.commands(&init_cmds)?;

        self.buffer.fill(0);
        self.ready = true;
        self.flush()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let style = MonoTextStyle::new(&FONT, BinaryColor::On);
        let origin = Point::new(i32::from(col) * CHAR_WIDTH, i32::from(row) * CHAR_HEIGHT);
        match Text::with_baseline(text, origin, style, Baseline::Top).draw(self) {
            Ok(_) => Ok(()),
            Err(never) => match never {},
        }
    }

    fn draw_rule(&mut self, row: u8) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let y = i32::from(row) * CHAR_HEIGHT + CHAR_HEIGHT / 2 - 1;
        Line::new(Point::new(0, y), Point::new(WIDTH as i32 - 1, y))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self)
            .map_err(|never| match never {})
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }
        self.commands(&[cmd::SET_Y, cmd::SET_X])?;
        self.data()
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
