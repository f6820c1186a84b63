//! SSD1306 128x64 OLED over Linux I2C.

use crate::{Error, Result};

#[cfg(target_os = "linux")]
use {
    super::{draw_screen, Renderer},
    crate::screen::ScreenState,
    linux_embedded_hal::I2cdev,
    ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306},
};

pub const DEFAULT_I2C_DEVICE: &str = "/dev/i2c-1";
pub const DEFAULT_OLED_ADDR: u8 = 0x3c;

#[cfg(target_os = "linux")]
type Driver =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Panel facade; the SSD1306 buffer is private and only touched by full-frame renders.
#[cfg(target_os = "linux")]
pub struct OledPanel {
    display: Driver,
}

#[cfg(target_os = "linux")]
impl OledPanel {
    pub fn open(device: &str, addr: u8) -> Result<Self> {
        let i2c = I2cdev::new(device)
            .map_err(|err| Error::Panel(format!("cannot open {device}: {err}")))?;
        let interface = I2CDisplayInterface::new_custom_address(i2c, addr);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(panel_err)?;
        display.clear_buffer();
        display.flush().map_err(panel_err)?;
        Ok(Self { display })
    }
}

#[cfg(target_os = "linux")]
impl Renderer for OledPanel {
    fn render(&mut self, screen: &ScreenState) -> Result<()> {
        self.display.clear_buffer();
        draw_screen(&mut self.display, screen).map_err(panel_err)?;
        self.display.flush().map_err(panel_err)
    }

    fn blank(&mut self) -> Result<()> {
        self.display.clear_buffer();
        self.display.flush().map_err(panel_err)
    }
}

#[cfg(target_os = "linux")]
fn panel_err<E: std::fmt::Debug>(err: E) -> Error {
    Error::Panel(format!("ssd1306: {err:?}"))
}

/// Non-Linux stub so the crate builds on dev hosts; opening always fails.
#[cfg(not(target_os = "linux"))]
pub struct OledPanel;

#[cfg(not(target_os = "linux"))]
impl OledPanel {
    pub fn open(_device: &str, _addr: u8) -> Result<Self> {
        Err(Error::Panel(
            "OLED output is only available on Linux targets; use --headless".into(),
        ))
    }
}

#[cfg(not(target_os = "linux"))]
impl super::Renderer for OledPanel {
    fn render(&mut self, _screen: &crate::screen::ScreenState) -> Result<()> {
        Err(Error::Panel("OLED output is only available on Linux targets".into()))
    }

    fn blank(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn open_missing_bus_is_a_panel_error() {
        let err = OledPanel::open("/dev/i2c-does-not-exist", DEFAULT_OLED_ADDR)
            .err()
            .expect("expected open to fail");
        assert!(matches!(err, Error::Panel(_)));
        assert!(format!("{err}").contains("/dev/i2c-does-not-exist"));
    }
}
