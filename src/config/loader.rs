use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

use super::{Config, CONFIG_DIR_NAME, CONFIG_FILE_NAME};

pub fn load_or_default() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let cfg = Config::default();
        cfg.save_to_path(&path)?;
        super::validate(&cfg)?;
        return Ok(cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        super::validate(&cfg)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    // Values are written quoted and unescaped.
    super::validate(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = format!(
        "# interlink-panel config\n\
log_path = \"{}\"\n\
tail_lines = {}\n\
cycle_interval = \"{}\"\n\
ip_probe = \"{}\"\n\
i2c_device = \"{}\"\n\
oled_addr = {}\n\
title = \"{}\"\n\
headless = {}\n\
syslog = {}\n",
        config.log_path,
        config.tail_lines,
        humantime::format_duration(config.cycle_interval),
        config.ip_probe,
        config.i2c_device,
        super::format_oled_addr(config.oled_addr),
        config.title,
        config.headless,
        config.syslog,
    );
    fs::write(path, contents)?;
    Ok(())
}

pub fn parse(raw: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed.split_once('=').ok_or_else(|| {
            Error::InvalidArgs(format!("invalid config line {}: '{}'", idx + 1, line))
        })?;

        let key = key.trim();
        let value = value.trim().trim_matches('"');
        match key {
            "log_path" => cfg.log_path = value.to_string(),
            "tail_lines" => {
                cfg.tail_lines = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid tail_lines on line {}", idx + 1))
                })?;
            }
            "cycle_interval" => {
                cfg.cycle_interval = super::parse_interval(value).map_err(|e| {
                    Error::InvalidArgs(format!("invalid cycle_interval on line {}: {e}", idx + 1))
                })?;
            }
            "ip_probe" => cfg.ip_probe = value.to_string(),
            "i2c_device" => cfg.i2c_device = value.to_string(),
            "oled_addr" => {
                cfg.oled_addr = super::parse_oled_addr(value).map_err(|e| {
                    Error::InvalidArgs(format!("invalid oled_addr on line {}: {e}", idx + 1))
                })?;
            }
            "title" => cfg.title = value.to_string(),
            "headless" => {
                cfg.headless = super::parse_bool(value).map_err(|e| {
                    Error::InvalidArgs(format!("invalid headless on line {}: {e}", idx + 1))
                })?;
            }
            "syslog" => {
                cfg.syslog = super::parse_bool(value).map_err(|e| {
                    Error::InvalidArgs(format!("invalid syslog on line {}: {e}", idx + 1))
                })?;
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown config key '{}' on line {}",
                    other,
                    idx + 1
                )));
            }
        }
    }

    super::validate(&cfg)?;
    Ok(cfg)
}

fn config_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| Error::InvalidArgs("HOME not set; cannot locate config directory".into()))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
