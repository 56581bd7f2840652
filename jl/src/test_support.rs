//! Test-only helpers for capturing logger output.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::logging::{LogFormat, LoggerConfig, LoggerHandle, Severity};

/// In-memory destination shared between a logger and the test reading it.
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Build a handle from `config` whose only destination is a fresh capture.
pub fn capture_logger(config: LoggerConfig) -> (LoggerHandle, CaptureWriter) {
    let capture = CaptureWriter::new();
    let logger = LoggerHandle::builder(config)
        .writer("capture", capture.clone())
        .build();
    (logger, capture)
}

/// DEBUG-level config rendering `template`.
pub fn debug_config(template: &str) -> LoggerConfig {
    LoggerConfig {
        level: Severity::Debug,
        format: LogFormat::parse(template).expect("valid template"),
        ..LoggerConfig::default()
    }
}
