//! Error sink for captured evaluation errors.
//!
//! When `run` is asked to capture errors, formatted reports are directed
//! to a configurable destination:
//! - Native: stderr (default)
//! - Tests / embedding hosts: buffer for assertions
//! - Silent: discard
//!
//! Uses enum dispatch instead of trait objects for static dispatch on this
//! path.

use parking_lot::Mutex;

/// Default sink that writes reports to stderr.
#[derive(Default)]
pub struct StderrErrorSink;

impl StderrErrorSink {
    /// Report a formatted error line.
    pub fn report(&self, msg: &str) {
        eprintln!("{msg}");
    }
}

/// Sink that captures reports to a buffer.
pub struct BufferErrorSink {
    buffer: Mutex<String>,
}

impl BufferErrorSink {
    pub fn new() -> Self {
        BufferErrorSink {
            buffer: Mutex::new(String::new()),
        }
    }

    /// Report a formatted error line.
    pub fn report(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    /// Get all captured reports.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Clear captured reports.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for BufferErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Error sink implementation using enum dispatch.
pub enum ErrorSinkImpl {
    /// Writes to stderr (default).
    Stderr(StderrErrorSink),
    /// Captures to buffer (testing, embedding).
    Buffer(BufferErrorSink),
    /// Discards all reports.
    Silent,
}

impl ErrorSinkImpl {
    /// Report a formatted error line.
    pub fn report(&self, msg: &str) {
        match self {
            Self::Stderr(s) => s.report(msg),
            Self::Buffer(s) => s.report(msg),
            Self::Silent => {}
        }
    }

    /// Get all captured reports.
    ///
    /// Returns an empty string for sinks that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(s) => s.get_output(),
            Self::Stderr(_) | Self::Silent => String::new(),
        }
    }

    /// Clear captured reports.
    pub fn clear(&self) {
        if let Self::Buffer(s) = self {
            s.clear();
        }
    }
}

/// Shared error sink handle.
pub type SharedErrorSink = std::sync::Arc<ErrorSinkImpl>;

/// Create the default stderr sink.
pub fn stderr_sink() -> SharedErrorSink {
    std::sync::Arc::new(ErrorSinkImpl::Stderr(StderrErrorSink))
}

/// Create a buffer sink for capturing reports.
pub fn buffer_sink() -> SharedErrorSink {
    std::sync::Arc::new(ErrorSinkImpl::Buffer(BufferErrorSink::new()))
}

/// Create a silent sink that discards all reports.
pub fn silent_sink() -> SharedErrorSink {
    std::sync::Arc::new(ErrorSinkImpl::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_captures_lines() {
        let sink = BufferErrorSink::new();
        sink.report("first");
        sink.report("second");
        assert_eq!(sink.get_output(), "first\nsecond\n");
    }

    #[test]
    fn test_buffer_sink_clear() {
        let sink = BufferErrorSink::new();
        sink.report("entry");
        sink.clear();
        assert_eq!(sink.get_output(), "");
    }

    #[test]
    fn test_silent_sink_discards() {
        let sink = silent_sink();
        sink.report("dropped");
        assert_eq!(sink.get_output(), "");
    }
}
