use std::path::PathBuf;

use super::{LogLevel, Logger};
use crate::{
    logtail::{self, TailError},
    metrics::MetricsSource,
    screen::{compose, ScreenKind, ScreenState},
    status::StatusSnapshot,
};

/// The bounded slice of the SVXLink log that each cycle re-reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWindow {
    pub path: PathBuf,
    pub lines: usize,
}

impl LogWindow {
    pub fn new(path: impl Into<PathBuf>, lines: usize) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Read the window and fold it. Read problems are logged and folded into
    /// the snapshot, never returned.
    pub fn snapshot(&self, logger: &Logger) -> StatusSnapshot {
        let tail = logtail::read_tail(&self.path, self.lines);
        match &tail {
            Ok(lines) if logger.enabled(LogLevel::Trace) => {
                for line in lines {
                    logger.trace(format!("log: {line}"));
                }
            }
            Ok(_) => {}
            Err(TailError::NotFound(path)) => {
                logger.info(format!("log not found: {}", path.display()));
            }
            Err(TailError::Io(err)) => {
                logger.warn(format!("failed to read {}: {err}", self.path.display()));
            }
        }
        StatusSnapshot::from_tail(&tail)
    }
}

/// Gather inputs for one cycle and compose the requested screen.
pub fn gather_frame<M: MetricsSource + ?Sized>(
    kind: ScreenKind,
    title: &str,
    metrics: &mut M,
    window: &LogWindow,
    logger: &Logger,
) -> ScreenState {
    let host = metrics.sample();
    let status = window.snapshot(logger);
    logger.debug(format!(
        "status: conference={} speaker={} radio={}",
        status.conference, status.speaker, status.radio
    ));
    compose(kind, title, &host, &status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HostMetrics;
    use crate::screen::Glyph;
    use std::io::Write;

    struct FixedMetrics;

    impl MetricsSource for FixedMetrics {
        fn sample(&mut self) -> HostMetrics {
            HostMetrics {
                ip_address: "192.168.0.10".into(),
                cpu_percent: 7.0,
                temperature: "45.0°C".into(),
            }
        }
    }

    fn quiet() -> Logger {
        Logger::new(LogLevel::Error, None)
    }

    #[test]
    fn status_frame_reflects_log_tail() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            log,
            "10:00:00: EchoLink chat message received from NodeA --- hello"
        )
        .unwrap();
        writeln!(log, "10:00:01: NodeA -> Bob").unwrap();
        writeln!(log, "10:00:02: Tx1: Turning the transmitter ON").unwrap();
        log.flush().unwrap();

        let window = LogWindow::new(log.path(), 20);
        let screen = gather_frame(
            ScreenKind::Status,
            "INTERLINK",
            &mut FixedMetrics,
            &window,
            &quiet(),
        );
        assert_eq!(screen.rows[0].label, "NodeA");
        assert_eq!(screen.rows[1].label, "Bob");
        assert!(screen.indicators.tx().highlighted);
    }

    #[test]
    fn metrics_frame_uses_log_for_indicators() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "Tx1: Turning the transmitter ON").unwrap();
        log.flush().unwrap();

        let window = LogWindow::new(log.path(), 20);
        let screen = gather_frame(
            ScreenKind::Metrics,
            "INTERLINK",
            &mut FixedMetrics,
            &window,
            &quiet(),
        );
        assert_eq!(screen.rows[0].glyph, Glyph::Wifi);
        assert_eq!(screen.rows[0].label, "192.168.0.10");
        assert!(screen.indicators.tx().highlighted);
        assert!(!screen.indicators.rx().highlighted);
    }

    #[test]
    fn window_bound_drops_older_events() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "EchoLink chat message received from OldNode --- hi").unwrap();
        for n in 0..5 {
            writeln!(log, "noise {n}").unwrap();
        }
        log.flush().unwrap();

        let snapshot = LogWindow::new(log.path(), 5).snapshot(&quiet());
        assert_eq!(snapshot, StatusSnapshot::default());
        let snapshot = LogWindow::new(log.path(), 6).snapshot(&quiet());
        assert_eq!(snapshot.conference, "OldNode");
    }

    #[test]
    fn missing_log_is_default_status() {
        let dir = tempfile::tempdir().unwrap();
        let window = LogWindow::new(dir.path().join("svxlink"), 20);
        assert_eq!(window.snapshot(&quiet()), StatusSnapshot::default());
    }
}
