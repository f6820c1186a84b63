use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use super::cycle::gather_frame;
use super::lifecycle::render_shutdown;
use super::{AppConfig, Logger};
use crate::{display::Renderer, metrics::MetricsSource, screen::ScreenKind, Result};

const SLEEP_SLICE_MS: u64 = 100;

/// Drive the panel: one sequential cycle per interval, alternating screens,
/// until the running flag drops. Cycle failures are logged and never end the loop.
pub(super) fn run_panel_loop<R, M>(
    panel: &mut R,
    metrics: &mut M,
    config: &AppConfig,
    logger: &Logger,
    running: &AtomicBool,
) -> Result<()>
where
    R: Renderer + ?Sized,
    M: MetricsSource + ?Sized,
{
    let window = config.log_window();
    let mut kind = ScreenKind::default();
    let mut cycles: u64 = 0;

    while running.load(Ordering::SeqCst) {
        let screen = gather_frame(kind, &config.title, metrics, &window, logger);
        logger.debug(format!("frame: {}", screen.summary()));
        if let Err(err) = panel.render(&screen) {
            logger.warn(format!("render failed: {err}; previous frame kept"));
        }
        kind = kind.toggle();
        cycles += 1;
        sleep_while_running(running, config.cycle_interval);
    }

    render_shutdown(panel, logger);
    logger.info(format!("panel loop exiting after {cycles} cycles"));
    Ok(())
}

/// Sleep up to `interval`, waking early once shutdown is requested.
fn sleep_while_running(running: &AtomicBool, interval: Duration) {
    let deadline = Instant::now() + interval;
    let slice = Duration::from_millis(SLEEP_SLICE_MS);
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(slice));
    }
}
