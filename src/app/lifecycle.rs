use super::Logger;
use crate::{display::Renderer, Error, Result};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Install a ctrl-c/SIGTERM handler that flips the shared running flag instead of exiting immediately.
pub(super) fn create_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handle = running.clone();

    ctrlc::set_handler(move || {
        running_handle.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(running)
}

/// Blank the panel before exiting so no stale status is left on the glass.
pub(super) fn render_shutdown<R: Renderer + ?Sized>(panel: &mut R, logger: &Logger) {
    if let Err(err) = panel.blank() {
        logger.warn(format!("failed to blank panel on shutdown: {err}"));
    }
}
