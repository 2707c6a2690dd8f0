use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Captures formatted `tracing` output for the current thread so tests can
/// assert on the level and message a code path logged.
///
/// The guard returned by [`LogCapture::install`] must stay alive for the
/// duration of the assertions. Only the installing thread is captured, so use
/// it from plain `#[test]`s or current-thread `#[tokio::test]`s.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl LogCapture {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// True when some line was logged at `level` and contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|line| line.trim_start().starts_with(level.as_str()) && line.contains(needle))
    }

    pub fn count(&self, level: Level, needle: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.trim_start().starts_with(level.as_str()) && line.contains(needle))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_level_and_message() {
        let (logs, _guard) = LogCapture::install();
        tracing::warn!("Empty token in Authorization header");
        tracing::info!("unrelated");

        assert!(logs.contains(Level::WARN, "Empty token"));
        assert!(!logs.contains(Level::ERROR, "Empty token"));
        assert_eq!(logs.count(Level::INFO, "unrelated"), 1);
    }
}
