use crate::{Error, Result};
use std::{path::Path, time::Duration};

pub mod loader;

pub use crate::display::{DEFAULT_I2C_DEVICE, DEFAULT_OLED_ADDR};
pub use crate::logtail::{DEFAULT_LOG_PATH, DEFAULT_TAIL_LINES, MAX_TAIL_LINES};
pub use crate::metrics::DEFAULT_IP_PROBE;
pub use crate::screen::DEFAULT_TITLE;

pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(5);
pub const MIN_CYCLE_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_TITLE_CHARS: usize = 18;
const CONFIG_DIR_NAME: &str = ".interlink_panel";
const CONFIG_FILE_NAME: &str = "config.toml";

/// User-supplied settings loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_path: String,
    pub tail_lines: usize,
    pub cycle_interval: Duration,
    pub ip_probe: String,
    pub i2c_device: String,
    pub oled_addr: u8,
    pub title: String,
    pub headless: bool,
    pub syslog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: DEFAULT_LOG_PATH.to_string(),
            tail_lines: DEFAULT_TAIL_LINES,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            ip_probe: DEFAULT_IP_PROBE.to_string(),
            i2c_device: DEFAULT_I2C_DEVICE.to_string(),
            oled_addr: DEFAULT_OLED_ADDR,
            title: DEFAULT_TITLE.to_string(),
            headless: false,
            syslog: false,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        loader::load_or_default()
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        loader::load_from_path(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        loader::save_to_path(self, path)
    }
}

pub(crate) fn validate(cfg: &Config) -> Result<()> {
    validate_tail_lines(cfg.tail_lines)?;
    validate_cycle_interval(cfg.cycle_interval)?;
    let title_len = cfg.title.chars().count();
    if title_len == 0 || title_len > MAX_TITLE_CHARS {
        return Err(Error::InvalidArgs(format!(
            "title must be 1-{MAX_TITLE_CHARS} characters (got {title_len})"
        )));
    }
    if cfg.log_path.trim().is_empty() {
        return Err(Error::InvalidArgs("log_path must not be empty".into()));
    }
    let text_fields = [
        ("log_path", &cfg.log_path),
        ("ip_probe", &cfg.ip_probe),
        ("i2c_device", &cfg.i2c_device),
        ("title", &cfg.title),
    ];
    for (key, value) in text_fields {
        if value.contains('"') {
            return Err(Error::InvalidArgs(format!(
                "{key} must not contain a double quote"
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_tail_lines(lines: usize) -> Result<()> {
    if lines == 0 || lines > MAX_TAIL_LINES {
        return Err(Error::InvalidArgs(format!(
            "tail_lines must be between 1 and {MAX_TAIL_LINES} (got {lines})"
        )));
    }
    Ok(())
}

pub(crate) fn validate_cycle_interval(interval: Duration) -> Result<()> {
    if interval < MIN_CYCLE_INTERVAL {
        return Err(Error::InvalidArgs(format!(
            "cycle_interval must be at least {} (got {})",
            humantime::format_duration(MIN_CYCLE_INTERVAL),
            humantime::format_duration(interval)
        )));
    }
    Ok(())
}

/// Accepts `5s`, `1500ms`, `1m` and the like.
pub fn parse_interval(raw: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(raw.trim()).map_err(|e| e.to_string())
}

/// Accepts `0x3c`, `3c` or a decimal address.
pub fn parse_oled_addr(raw: &str) -> std::result::Result<u8, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => trimmed
            .parse::<u8>()
            .ok()
            .or_else(|| u8::from_str_radix(trimmed, 16).ok()),
    };
    let addr = parsed.ok_or_else(|| {
        "expected a hex or decimal I2C address (e.g., 0x3c)".to_string()
    })?;
    if addr > 0x7f {
        return Err(format!("I2C address {addr:#04x} is outside the 7-bit range"));
    }
    Ok(addr)
}

fn format_oled_addr(addr: u8) -> String {
    format!("\"{addr:#04x}\"")
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}
