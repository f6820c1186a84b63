use crate::{
    cli::RunOptions,
    config::{
        self, Config, DEFAULT_CYCLE_INTERVAL, DEFAULT_I2C_DEVICE, DEFAULT_IP_PROBE,
        DEFAULT_LOG_PATH, DEFAULT_OLED_ADDR, DEFAULT_TAIL_LINES, DEFAULT_TITLE,
    },
    display::{HeadlessPanel, OledPanel, Renderer},
    metrics::{HostMetrics, HostProbe, MetricsSource},
    status::StatusSnapshot,
    Error, Result,
};
use serde::Serialize;
use std::time::Duration;

mod cycle;
mod lifecycle;
mod logger;
mod panel_loop;

pub use cycle::{gather_frame, LogWindow};
pub use logger::{LogLevel, Logger};
use lifecycle::create_shutdown_flag;
use panel_loop::run_panel_loop;

/// Config for the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_path: String,
    pub tail_lines: usize,
    pub cycle_interval: Duration,
    pub ip_probe: String,
    pub i2c_device: String,
    pub oled_addr: u8,
    pub title: String,
    pub headless: bool,
    pub syslog: bool,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
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
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_sources(config: Config, opts: RunOptions) -> Self {
        Self {
            log_path: opts.log_path.unwrap_or(config.log_path),
            tail_lines: opts.tail_lines.unwrap_or(config.tail_lines),
            cycle_interval: opts.interval.unwrap_or(config.cycle_interval),
            ip_probe: config.ip_probe,
            i2c_device: opts.i2c_device.unwrap_or(config.i2c_device),
            oled_addr: opts.oled_addr.unwrap_or(config.oled_addr),
            title: config.title,
            headless: opts.headless || config.headless,
            syslog: config.syslog,
            log_level: opts.log_level.unwrap_or_default(),
            log_file: opts.log_file,
        }
    }

    /// Re-check values that CLI flags may have overridden.
    pub fn validate(&self) -> Result<()> {
        config::validate_tail_lines(self.tail_lines)?;
        config::validate_cycle_interval(self.cycle_interval)
    }

    pub fn log_window(&self) -> LogWindow {
        LogWindow::new(&self.log_path, self.tail_lines)
    }

    fn host_probe(&self) -> HostProbe {
        HostProbe::new(self.ip_probe.as_str())
    }
}

/// One-shot output of the `status` command.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub metrics: HostMetrics,
    pub status: StatusSnapshot,
}

pub struct App {
    config: AppConfig,
    logger: Logger,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let mut logger = Logger::new(config.log_level, config.log_file.clone());
        if config.syslog {
            logger = logger.with_syslog();
        }
        Ok(Self { config, logger })
    }

    pub fn from_options(opts: RunOptions) -> Result<Self> {
        let cfg_file = Config::load_or_default()?;
        let merged = AppConfig::from_sources(cfg_file, opts);
        Self::new(merged)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Entry point for the daemon. Opens the panel and cycles until interrupted.
    pub fn run(&self) -> Result<()> {
        let running = create_shutdown_flag()?;
        let mut panel = self.open_panel()?;
        let mut metrics = self.config.host_probe();
        self.logger.info(format!(
            "panel start (log={}, window={} lines, interval={}, output={})",
            self.config.log_path,
            self.config.tail_lines,
            humantime::format_duration(self.config.cycle_interval),
            if self.config.headless {
                "headless".to_string()
            } else {
                format!("{}@{:#04x}", self.config.i2c_device, self.config.oled_addr)
            }
        ));
        run_panel_loop(
            panel.as_mut(),
            &mut metrics,
            &self.config,
            &self.logger,
            &running,
        )
    }

    /// Sample metrics and fold the log tail once, without touching the panel.
    pub fn status_report(&self) -> Result<StatusReport> {
        let mut metrics = self.config.host_probe();
        // CPU usage is a delta between two refreshes.
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        Ok(StatusReport {
            metrics: metrics.sample(),
            status: self.config.log_window().snapshot(&self.logger),
        })
    }

    pub fn status_json(&self) -> Result<String> {
        let report = self.status_report()?;
        serde_json::to_string_pretty(&report).map_err(|e| Error::Io(std::io::Error::other(e)))
    }

    fn open_panel(&self) -> Result<Box<dyn Renderer>> {
        if self.config.headless {
            self.logger.info("headless mode: frames are drawn in memory only");
            return Ok(Box::new(HeadlessPanel::new()));
        }
        let panel = OledPanel::open(&self.config.i2c_device, self.config.oled_addr)?;
        Ok(Box::new(panel))
    }
}
