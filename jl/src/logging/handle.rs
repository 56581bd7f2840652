//! The shared logging sink and its output destinations.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Dispatch;
use tracing::dispatcher;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;

use super::format::TemplateFormat;
use super::{LogFormat, LoggerConfig, Severity};
use crate::error::ConfigError;

/// Where a handle writes its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stderr,
    File(PathBuf),
    /// Caller-supplied writer, identified by a label.
    Writer(String),
}

/// Configured logging sink.
///
/// Holds the snapshot it was built from and a private `tracing` dispatcher
/// whose fmt layer renders the template into every destination. Configuration
/// is fixed at construction.
#[derive(Debug)]
pub struct LoggerHandle {
    name: String,
    level: Severity,
    format: LogFormat,
    destinations: Vec<Destination>,
    dispatch: Dispatch,
}

/// Binds a [`LoggerConfig`] to output destinations.
///
/// A builder starts with no destinations, so a handle never inherits output
/// bindings from an earlier configuration.
pub struct LoggerBuilder {
    config: LoggerConfig,
    outputs: Vec<(Destination, BoxMakeWriter)>,
}

impl LoggerBuilder {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            outputs: Vec::new(),
        }
    }

    pub fn stderr(mut self) -> Self {
        self.outputs
            .push((Destination::Stderr, BoxMakeWriter::new(io::stderr)));
        self
    }

    /// Append lines to `path`, creating the file if needed.
    pub fn file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        self.outputs.push((
            Destination::File(path.to_path_buf()),
            BoxMakeWriter::new(Mutex::new(file)),
        ));
        Ok(self)
    }

    pub fn writer<W>(mut self, label: impl Into<String>, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.outputs.push((
            Destination::Writer(label.into()),
            BoxMakeWriter::new(make_writer),
        ));
        self
    }

    pub fn build(self) -> LoggerHandle {
        let LoggerConfig {
            name, level, format, ..
        } = self.config;
        let (destinations, writers): (Vec<_>, Vec<_>) = self.outputs.into_iter().unzip();

        let layer = tracing_subscriber::fmt::layer()
            .event_format(TemplateFormat::new(format.clone(), name.clone(), level))
            .with_writer(Fanout { writers });
        let subscriber = tracing_subscriber::registry()
            .with(level.level_filter())
            .with(layer);

        LoggerHandle {
            name,
            level,
            format,
            destinations,
            dispatch: Dispatch::new(subscriber),
        }
    }
}

impl LoggerHandle {
    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    /// Handle writing to stderr only.
    pub fn console(config: LoggerConfig) -> Self {
        LoggerBuilder::new(config).stderr().build()
    }

    /// Stderr plus the configured `log_file`, if any.
    pub fn from_config(config: LoggerConfig) -> Result<Self, ConfigError> {
        let log_file = config.log_file.clone();
        let mut builder = LoggerBuilder::new(config).stderr();
        if let Some(path) = log_file {
            builder = builder.file(&path)?;
        }
        Ok(builder.build())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Make this handle the process-wide `tracing` default.
    ///
    /// Returns `false` if another global subscriber was already installed.
    pub fn install_global(&self) -> bool {
        dispatcher::set_global_default(self.dispatch.clone()).is_ok()
    }

    /// Write one line at `severity`; returns once the line is handed to
    /// every destination.
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        if !self.enabled(severity) {
            return;
        }
        dispatcher::with_default(&self.dispatch, || emit(severity, &message));
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }
}

fn emit(severity: Severity, message: &dyn fmt::Display) {
    let name = severity.as_str();
    match severity {
        Severity::Debug => tracing::debug!(severity = name, "{message}"),
        Severity::Info => tracing::info!(severity = name, "{message}"),
        Severity::Warning => tracing::warn!(severity = name, "{message}"),
        Severity::Error | Severity::Critical => {
            tracing::error!(severity = name, "{message}");
        }
    }
}

/// Writes each line to every destination in order.
struct Fanout {
    writers: Vec<BoxMakeWriter>,
}

impl<'a> MakeWriter<'a> for Fanout {
    type Writer = FanoutWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FanoutWriter {
            writers: self
                .writers
                .iter()
                .map(|writer| writer.make_writer())
                .collect(),
        }
    }
}

struct FanoutWriter<'a> {
    writers: Vec<Box<dyn io::Write + 'a>>,
}

impl io::Write for FanoutWriter<'_> {
    /// Every destination gets the line even if an earlier one fails; the
    /// first error is returned.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        first_error(self.writers.iter_mut().map(|writer| writer.write_all(buf)))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        first_error(self.writers.iter_mut().map(|writer| writer.flush()))
    }
}

/// Drains `results`, keeping the first error.
fn first_error(results: impl Iterator<Item = io::Result<()>>) -> io::Result<()> {
    results.fold(Ok(()), |first, result| first.and(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CaptureWriter, capture_logger};

    fn config(level: Severity) -> LoggerConfig {
        LoggerConfig {
            level,
            ..LoggerConfig::default()
        }
    }

    #[test]
    fn writes_one_line_per_call() {
        let (logger, capture) = capture_logger(config(Severity::Debug));
        logger.debug("one");
        logger.info("two");
        logger.warning("three");
        logger.error("four");
        logger.critical("five");
        assert_eq!(
            capture.lines(),
            vec![
                "DEBUG:one",
                "INFO:two",
                "WARNING:three",
                "ERROR:four",
                "CRITICAL:five",
            ]
        );
    }

    #[test]
    fn drops_messages_below_level() {
        let (logger, capture) = capture_logger(config(Severity::Warning));
        logger.debug("hidden");
        logger.info("hidden");
        logger.warning("shown");
        assert_eq!(capture.lines(), vec!["WARNING:shown"]);
    }

    #[test]
    fn critical_level_filters_plain_errors() {
        let (logger, capture) = capture_logger(config(Severity::Critical));
        logger.error("hidden");
        logger.critical("shown");
        assert_eq!(capture.lines(), vec!["CRITICAL:shown"]);
    }

    #[test]
    fn fans_out_to_every_destination() {
        let first = CaptureWriter::new();
        let second = CaptureWriter::new();
        let logger = LoggerHandle::builder(config(Severity::Info))
            .writer("first", first.clone())
            .writer("second", second.clone())
            .build();
        logger.info("hello");
        assert_eq!(first.lines(), vec!["INFO:hello"]);
        assert_eq!(second.lines(), vec!["INFO:hello"]);
        assert_eq!(
            logger.destinations(),
            &[
                Destination::Writer("first".to_string()),
                Destination::Writer("second".to_string()),
            ]
        );
    }

    #[test]
    fn file_destination_appends_lines() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("app.log");
        let logger = LoggerHandle::from_config(LoggerConfig {
            log_file: Some(path.clone()),
            ..config(Severity::Info)
        })
        .expect("logger");
        assert_eq!(
            logger.destinations(),
            &[Destination::Stderr, Destination::File(path.clone())]
        );
        logger.info("persisted");
        let contents = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "INFO:persisted\n");
    }

    #[test]
    fn missing_log_directory_is_a_config_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = LoggerHandle::from_config(LoggerConfig {
            log_file: Some(temp.path().join("missing").join("app.log")),
            ..LoggerConfig::default()
        })
        .expect_err("missing dir");
        assert!(matches!(err, ConfigError::LogFile { .. }));
    }

    #[test]
    fn uses_configured_name_in_template() {
        let (logger, capture) = capture_logger(LoggerConfig {
            name: "thermo".to_string(),
            format: LogFormat::parse("%(name)s - %(levelname)s - %(message)s").expect("format"),
            ..LoggerConfig::default()
        });
        logger.info("ready");
        assert_eq!(capture.lines(), vec!["thermo - INFO - ready"]);
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failing_destination_does_not_starve_later_ones() {
        let capture = CaptureWriter::new();
        let fanout = Fanout {
            writers: vec![
                BoxMakeWriter::new(|| Broken),
                BoxMakeWriter::new(capture.clone()),
            ],
        };

        let err = io::Write::write(&mut fanout.make_writer(), b"line\n").expect_err("broken");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(capture.contents(), "line\n");

        let logger = LoggerHandle::builder(config(Severity::Info))
            .writer("broken", || Broken)
            .writer("capture", capture.clone())
            .build();
        logger.info("still here");
        assert_eq!(capture.lines(), vec!["line", "INFO:still here"]);
    }
}
