pub mod canvas;
pub mod glyphs;
pub mod oled;

pub use canvas::{draw_screen, FrameBuffer, RX_BOX, TX_BOX};
pub use oled::{OledPanel, DEFAULT_I2C_DEVICE, DEFAULT_OLED_ADDR};

use crate::{screen::ScreenState, Result};

/// A surface that shows one full frame at a time.
pub trait Renderer {
    /// Replace the whole frame with `screen`. On error the previous frame stays visible.
    fn render(&mut self, screen: &ScreenState) -> Result<()>;

    /// Turn every pixel off.
    fn blank(&mut self) -> Result<()>;
}

/// Renderer for hosts without a panel: draws into memory only.
#[derive(Default)]
pub struct HeadlessPanel {
    frame: FrameBuffer,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

impl Renderer for HeadlessPanel {
    fn render(&mut self, screen: &ScreenState) -> Result<()> {
        self.frame.paint(screen);
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        self.frame = FrameBuffer::new();
        Ok(())
    }
}
