//! Frame layout for the 128x64 panel, drawn with embedded-graphics so the
//! same code paints the SSD1306 buffer and the in-memory [`FrameBuffer`].

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use super::glyphs::{self, GLYPH_SIZE};
use crate::screen::{Glyph, Indicator, ScreenRow, ScreenState};

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 64;

const CHAR_WIDTH: i32 = 6;
const HEADER_HEIGHT: u32 = 16;
const ROW_Y: [i32; 2] = [20, 35];
const ICON_X: i32 = 5;
const LABEL_X: i32 = 25;
const ASIDE_ICON_X: i32 = 70;
const ASIDE_LABEL_X: i32 = 90;

pub const TX_BOX: Rectangle = Rectangle::new(Point::new(5, 50), Size::new(56, 14));
pub const RX_BOX: Rectangle = Rectangle::new(Point::new(65, 50), Size::new(61, 14));

/// Paint a whole frame. The target is cleared first; nothing from the
/// previous frame survives.
pub fn draw_screen<D>(target: &mut D, screen: &ScreenState) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_header(target, &screen.title)?;
    for (row, y) in screen.rows.iter().zip(ROW_Y) {
        draw_row(target, row, y)?;
    }
    draw_indicator(target, screen.indicators.tx(), TX_BOX)?;
    draw_indicator(target, screen.indicators.rx(), RX_BOX)?;
    Ok(())
}

fn draw_header<D>(target: &mut D, title: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::zero(), Size::new(WIDTH, HEADER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;
    let text_width = title.chars().count() as i32 * CHAR_WIDTH;
    let x = ((WIDTH as i32 - text_width) / 2).max(0);
    Text::with_baseline(
        title,
        Point::new(x, 3),
        MonoTextStyle::new(&FONT_6X10, BinaryColor::Off),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

fn draw_row<D>(target: &mut D, row: &ScreenRow, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    draw_glyph(target, row.glyph, Point::new(ICON_X, y), BinaryColor::On)?;

    let label_end = if row.aside.is_some() {
        ASIDE_ICON_X
    } else {
        WIDTH as i32
    };
    let label = fit(&row.label, (label_end - LABEL_X) / CHAR_WIDTH);
    Text::with_baseline(&label, Point::new(LABEL_X, y), style, Baseline::Top).draw(target)?;

    if let Some((glyph, aside)) = &row.aside {
        draw_glyph(target, *glyph, Point::new(ASIDE_ICON_X, y), BinaryColor::On)?;
        let aside = fit(aside, (WIDTH as i32 - ASIDE_LABEL_X) / CHAR_WIDTH);
        Text::with_baseline(&aside, Point::new(ASIDE_LABEL_X, y), style, Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

fn draw_indicator<D>(target: &mut D, indicator: &Indicator, frame: Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (style, ink) = if indicator.highlighted {
        (PrimitiveStyle::with_fill(BinaryColor::On), BinaryColor::Off)
    } else {
        (PrimitiveStyle::with_stroke(BinaryColor::On, 1), BinaryColor::On)
    };
    frame.into_styled(style).draw(target)?;

    let origin = frame.top_left + Point::new(6, 3);
    draw_glyph(target, indicator.glyph, origin, ink)?;
    Text::with_baseline(
        indicator.label,
        origin + Point::new(GLYPH_SIZE + 4, 0),
        MonoTextStyle::new(&FONT_6X10, ink),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

/// Set only the glyph's ink pixels so filled backgrounds show through.
fn draw_glyph<D>(target: &mut D, glyph: Glyph, origin: Point, ink: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let rows = glyphs::bitmap(glyph);
    let pixels = rows.iter().enumerate().flat_map(move |(y, bits)| {
        (0..GLYPH_SIZE)
            .filter(move |&x| bits & (0x80u8 >> x) != 0)
            .map(move |x| Pixel(origin + Point::new(x, y as i32), ink))
    });
    target.draw_iter(pixels)
}

fn fit(text: &str, max_chars: i32) -> String {
    text.chars().take(max_chars.max(0) as usize).collect()
}

/// In-memory 1bpp surface matching the panel geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<bool>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; (WIDTH * HEIGHT) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.pixels[(y * WIDTH + x) as usize]
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Whether the interior of `area` is filled (checked just inside the outline).
    pub fn is_filled(&self, area: Rectangle) -> bool {
        let probe = area.top_left + Point::new(1, 1);
        self.pixel(probe.x as u32, probe.y as u32)
    }

    /// Paint `screen`; drawing into memory cannot fail.
    pub fn paint(&mut self, screen: &ScreenState) {
        draw_screen(self, screen).unwrap_or_else(|never: Infallible| match never {});
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < WIDTH && y < HEIGHT {
                self.pixels[(y * WIDTH + x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HostMetrics;
    use crate::screen::{compose_metrics, compose_status, DEFAULT_TITLE};
    use crate::status::{RadioState, StatusSnapshot};

    #[test]
    fn receiving_fills_only_rx_box() {
        let mut frame = FrameBuffer::new();
        frame.paint(&compose_status(DEFAULT_TITLE, &StatusSnapshot::default()));
        assert!(frame.is_filled(RX_BOX));
        assert!(!frame.is_filled(TX_BOX));
    }

    #[test]
    fn transmitting_fills_only_tx_box() {
        let metrics = HostMetrics {
            ip_address: "10.0.0.2".into(),
            cpu_percent: 3.0,
            temperature: "41.0°C".into(),
        };
        let mut frame = FrameBuffer::new();
        frame.paint(&compose_metrics(DEFAULT_TITLE, &metrics, RadioState::Transmitting));
        assert!(frame.is_filled(TX_BOX));
        assert!(!frame.is_filled(RX_BOX));
    }

    #[test]
    fn header_bar_is_inverted() {
        let mut frame = FrameBuffer::new();
        frame.paint(&compose_status(DEFAULT_TITLE, &StatusSnapshot::default()));
        assert!(frame.pixel(0, 0));
        assert!(frame.pixel(127, 15));
        assert!(!frame.pixel(0, 16));
    }

    #[test]
    fn repaint_replaces_previous_frame() {
        let busy = StatusSnapshot {
            conference: "A-VERY-LONG-CONFERENCE-NAME".into(),
            speaker: "SOMEONE TALKING".into(),
            radio: RadioState::Transmitting,
        };
        let mut first = FrameBuffer::new();
        first.paint(&compose_status(DEFAULT_TITLE, &busy));
        first.paint(&compose_status(DEFAULT_TITLE, &StatusSnapshot::default()));

        let mut fresh = FrameBuffer::new();
        fresh.paint(&compose_status(DEFAULT_TITLE, &StatusSnapshot::default()));
        assert_eq!(first, fresh);
    }

    #[test]
    fn fit_truncates_on_char_boundaries() {
        assert_eq!(fit("48.3°C and more", 6), "48.3°C");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut frame = FrameBuffer::new();
        frame
            .draw_iter([
                Pixel(Point::new(-1, 3), BinaryColor::On),
                Pixel(Point::new(500, 3), BinaryColor::On),
            ])
            .unwrap();
        assert_eq!(frame.lit_count(), 0);
    }
}
