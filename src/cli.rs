use std::time::Duration;

use crate::{app::LogLevel, config, Error, Result};

/// Options shared by `run` and `status`; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub log_path: Option<String>,
    pub tail_lines: Option<usize>,
    pub interval: Option<Duration>,
    pub i2c_device: Option<String>,
    pub oled_addr: Option<u8>,
    pub headless: bool,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<String>,
}

/// Parsed command-line intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    Status(RunOptions),
    ShowHelp,
    ShowVersion,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Ok(Command::Run(RunOptions::default()));
        }

        let mut iter = args.iter();
        match iter.next().map(|s| s.as_str()) {
            Some("run") => Ok(Command::Run(parse_run_options(&mut iter)?)),
            Some("status") => Ok(Command::Status(parse_run_options(&mut iter)?)),
            Some("--help") | Some("-h") => Ok(Command::ShowHelp),
            Some("--version") | Some("-V") => Ok(Command::ShowVersion),
            Some(flag) if flag.starts_with('-') => {
                // Allow omitting the explicit `run` subcommand.
                let mut flags: Vec<String> = Vec::with_capacity(args.len());
                flags.push(flag.to_string());
                flags.extend(iter.map(|s| s.to_string()));
                let mut iter = flags.iter();
                Ok(Command::Run(parse_run_options(&mut iter)?))
            }
            Some(cmd) => Err(Error::InvalidArgs(format!(
                "unknown command '{cmd}', try --help"
            ))),
            None => Ok(Command::Run(RunOptions::default())),
        }
    }

    pub fn help() -> &'static str {
        concat!(
            "interlink-panel - SVXLink node status panel\n",
            "\n",
            "USAGE:\n",
            "  interlink-panel [run] [OPTIONS]\n",
            "  interlink-panel status [OPTIONS]\n",
            "  interlink-panel --help\n",
            "  interlink-panel --version\n",
            "\n",
            "COMMANDS:\n",
            "  run               Drive the OLED panel until interrupted (default)\n",
            "  status            Print current metrics and log status as JSON, then exit\n",
            "\n",
            "OPTIONS:\n",
            "  --log-path <path>      SVXLink log to tail (default: /var/log/svxlink)\n",
            "  --tail-lines <number>  Lines read from the end of the log each cycle (default: 20)\n",
            "  --interval <duration>  Cycle period, e.g. 5s or 1500ms (default: 5s)\n",
            "  --i2c-device <path>    I2C bus device for the OLED (default: /dev/i2c-1)\n",
            "  --oled-addr <addr>     SSD1306 I2C address (default: 0x3c)\n",
            "  --headless             Draw frames in memory only; no panel required\n",
            "  --log-level <level>    error|warn|info|debug|trace (default: info)\n",
            "  --log-file <path>      Append log lines to this file\n",
            "  -h, --help             Show this help\n",
            "  -V, --version          Show version\n",
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn parse_run_options(iter: &mut std::slice::Iter<String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--log-path" => {
                opts.log_path = Some(take_value(flag, iter)?);
            }
            "--tail-lines" => {
                let raw = take_value(flag, iter)?;
                opts.tail_lines = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("tail-lines must be a positive integer".to_string())
                })?);
            }
            "--interval" => {
                let raw = take_value(flag, iter)?;
                opts.interval = Some(config::parse_interval(&raw).map_err(|e| {
                    Error::InvalidArgs(format!("interval must be a duration like 5s: {e}"))
                })?);
            }
            "--i2c-device" => {
                opts.i2c_device = Some(take_value(flag, iter)?);
            }
            "--oled-addr" => {
                let raw = take_value(flag, iter)?;
                opts.oled_addr = Some(
                    config::parse_oled_addr(&raw)
                        .map_err(|e| Error::InvalidArgs(format!("oled-addr: {e}")))?,
                );
            }
            "--headless" => {
                opts.headless = true;
            }
            "--log-level" => {
                let raw = take_value(flag, iter)?;
                opts.log_level = Some(raw.parse().map_err(Error::InvalidArgs)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown flag '{other}', try --help"
                )));
            }
        }
    }

    Ok(opts)
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}
