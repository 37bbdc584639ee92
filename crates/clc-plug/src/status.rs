//! Status display shown while blocking work runs.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Renders progress text during a blocking call.
pub trait StatusDisplay: Send + Sync {
    /// Show `text`. Called repeatedly while work is in flight.
    fn render(&self, text: &str);

    /// Clear the display. Called exactly once per blocking scope.
    fn stop(&self);
}

/// Status display that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStatus;

impl StatusDisplay for NoopStatus {
    fn render(&self, _text: &str) {}

    fn stop(&self) {}
}

/// Single-line spinner on stderr.
#[derive(Debug, Default)]
pub struct TerminalSpinner {
    frame: Mutex<usize>,
}

impl TerminalSpinner {
    /// A spinner starting at its first frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for TerminalSpinner {
    fn render(&self, text: &str) {
        let frame = {
            let mut index = self.frame.lock();
            let frame = SPINNER_FRAMES[*index % SPINNER_FRAMES.len()];
            *index += 1;
            frame
        };
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort.
        let _ = write!(stderr, "\r\x1b[2K{frame} {text}");
        let _ = stderr.flush();
    }

    fn stop(&self) {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}

/// Handle work uses to update the status text.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: Arc<watch::Sender<String>>,
}

impl StatusHandle {
    pub(crate) fn channel(initial: &str) -> (Self, watch::Receiver<String>) {
        let (tx, rx) = watch::channel(initial.to_string());
        (Self { tx: Arc::new(tx) }, rx)
    }

    /// Replace the status text.
    pub fn set_text(&self, text: impl Into<String>) {
        self.tx.send_replace(text.into());
    }
}

/// Stops the display when dropped, on every exit path.
pub(crate) struct StatusGuard<'a> {
    display: &'a dyn StatusDisplay,
}

impl<'a> StatusGuard<'a> {
    pub(crate) fn new(display: &'a dyn StatusDisplay) -> Self {
        Self { display }
    }

    pub(crate) fn render(&self, text: &str) {
        self.display.render(text);
    }
}

impl Drop for StatusGuard<'_> {
    fn drop(&mut self) {
        self.display.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counting {
        stops: AtomicUsize,
    }

    impl StatusDisplay for Counting {
        fn render(&self, _text: &str) {}

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn guard_stops_once_on_drop() {
        let display = Counting::default();
        {
            let guard = StatusGuard::new(&display);
            guard.render("working");
        }
        assert_eq!(display.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handle_updates_receiver() {
        let (handle, rx) = StatusHandle::channel("start");
        handle.set_text("halfway");
        assert_eq!(*rx.borrow(), "halfway");
    }
}
