use std::{
    fmt,
    fs::{File, OpenOptions},
    io::Write,
    str::FromStr,
    sync::Mutex,
    time::SystemTime,
};

use syslog::{Facility, Formatter3164, LoggerBackend};

const LEVEL_ENV: &str = "INTERLINK_LOG_LEVEL";
const PATH_ENV: &str = "INTERLINK_LOG_PATH";

/// Log verbosity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

type SyslogWriter = syslog::Logger<LoggerBackend, Formatter3164>;

/// Levelled logger writing to stderr, plus an optional append-only file and
/// an optional syslog socket. Sink failures are swallowed.
pub struct Logger {
    level: LogLevel,
    file: Option<Mutex<File>>,
    syslog: Option<Mutex<SyslogWriter>>,
}

impl Logger {
    /// `INTERLINK_LOG_LEVEL` beats `level`; an explicit `file_path` beats
    /// `INTERLINK_LOG_PATH`.
    pub fn new(level: LogLevel, file_path: Option<String>) -> Self {
        let level = std::env::var(LEVEL_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(level);
        let file = file_path
            .or_else(|| std::env::var(PATH_ENV).ok())
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok())
            .map(Mutex::new);
        Self {
            level,
            file,
            syslog: None,
        }
    }

    /// Also forward to the local syslog daemon (RFC 3164, facility daemon).
    pub fn with_syslog(mut self) -> Self {
        let formatter = Formatter3164 {
            facility: Facility::LOG_DAEMON,
            hostname: None,
            process: env!("CARGO_PKG_NAME").into(),
            pid: std::process::id(),
        };
        match syslog::unix(formatter) {
            Ok(writer) => self.syslog = Some(Mutex::new(writer)),
            Err(err) => self.warn(format!("syslog unavailable, using stderr only: {err}")),
        }
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    pub fn log(&self, level: LogLevel, msg: impl AsRef<str>) {
        if !self.enabled(level) {
            return;
        }
        let msg = msg.as_ref();
        let line = format!(
            "{} {:<5} {msg}",
            humantime::format_rfc3339_millis(SystemTime::now()),
            level.tag()
        );
        eprintln!("{line}");

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{line}");
            }
        }
        if let Some(writer) = &self.syslog {
            if let Ok(mut writer) = writer.lock() {
                let _ = match level {
                    LogLevel::Error => writer.err(msg),
                    LogLevel::Warn => writer.warning(msg),
                    LogLevel::Info => writer.info(msg),
                    LogLevel::Debug | LogLevel::Trace => writer.debug(msg),
                };
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Error, msg);
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Warn, msg);
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Info, msg);
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Debug, msg);
    }

    pub fn trace(&self, msg: impl AsRef<str>) {
        self.log(LogLevel::Trace, msg);
    }
}
