//! `%`-style line templates such as `%(levelname)s:%(message)s`.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

use chrono::Local;
use regex::Regex;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::{DEFAULT_LOG_FORMAT, Severity};
use crate::error::ConfigError;

const PLACEHOLDER: &str =
    r"%(?:\((?P<field>[A-Za-z_]+)\)(?P<width>-?[0-9]+)?[sd]|(?P<escape>%))";
const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Event field carrying the exact severity (`CRITICAL` has no `tracing` level).
const SEVERITY_FIELD: &str = "severity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordField {
    AscTime,
    LevelName,
    LevelNo,
    Message,
    Name,
}

impl RecordField {
    fn lookup(name: &str) -> Result<Self, ConfigError> {
        match name {
            "asctime" => Ok(RecordField::AscTime),
            "levelname" => Ok(RecordField::LevelName),
            "levelno" => Ok(RecordField::LevelNo),
            "message" => Ok(RecordField::Message),
            "name" => Ok(RecordField::Name),
            other => Err(ConfigError::UnknownFormatField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: RecordField,
        width: usize,
        left_align: bool,
    },
}

/// Parsed line template.
///
/// Supports `%(asctime)s`, `%(levelname)s`, `%(levelno)d`, `%(message)s`,
/// `%(name)s`, an optional width (`%(levelname)-8s` pads right, `%(name)10s`
/// pads left) and `%%` for a literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    source: String,
    segments: Vec<Segment>,
}

/// The values a template line is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub name: &'a str,
    pub severity: Severity,
    pub message: &'a str,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            source: DEFAULT_LOG_FORMAT.to_string(),
            segments: vec![
                Segment::Field {
                    field: RecordField::LevelName,
                    width: 0,
                    left_align: false,
                },
                Segment::Literal(":".to_string()),
                Segment::Field {
                    field: RecordField::Message,
                    width: 0,
                    left_align: false,
                },
            ],
        }
    }
}

impl LogFormat {
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let placeholder = Regex::new(PLACEHOLDER).map_err(|err| invalid(template, err))?;
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in placeholder.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut segments, template, &template[cursor..whole.start()])?;
            cursor = whole.end();

            if caps.name("escape").is_some() {
                push_text(&mut segments, "%");
                continue;
            }
            let Some(name) = caps.name("field") else {
                continue;
            };
            let field = RecordField::lookup(name.as_str())?;
            let (width, left_align) = match caps.name("width") {
                Some(width) => {
                    let raw = width.as_str();
                    let digits = raw.trim_start_matches('-');
                    let width = digits.parse::<usize>().map_err(|err| invalid(template, err))?;
                    (width, raw.starts_with('-'))
                }
                None => (0, false),
            };
            segments.push(Segment::Field {
                field,
                width,
                left_align,
            });
        }
        push_literal(&mut segments, template, &template[cursor..])?;

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// The template text this format was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn render(&self, record: &LogRecord<'_>) -> String {
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = self.write(&mut line, record);
        line
    }

    pub fn write(&self, out: &mut impl fmt::Write, record: &LogRecord<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Field {
                    field,
                    width,
                    left_align,
                } => {
                    let value: Cow<'_, str> = match field {
                        RecordField::AscTime => {
                            Cow::Owned(Local::now().format(ASCTIME_FORMAT).to_string())
                        }
                        RecordField::LevelName => Cow::Borrowed(record.severity.as_str()),
                        RecordField::LevelNo => Cow::Owned(record.severity.levelno().to_string()),
                        RecordField::Message => Cow::Borrowed(record.message),
                        RecordField::Name => Cow::Borrowed(record.name),
                    };
                    let width = *width;
                    if *left_align {
                        write!(out, "{value:<width$}")?;
                    } else {
                        write!(out, "{value:>width$}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(template: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidFormat {
        format: template.to_string(),
        reason: reason.to_string(),
    }
}

fn push_literal(segments: &mut Vec<Segment>, template: &str, text: &str) -> Result<(), ConfigError> {
    if text.contains('%') {
        return Err(invalid(template, "dangling '%' (use '%%' for a literal percent)"));
    }
    push_text(segments, text);
    Ok(())
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

/// `tracing-subscriber` event formatter that renders each event through a
/// [`LogFormat`].
///
/// Events below `min` are dropped here rather than by the level filter,
/// since `CRITICAL` and `ERROR` share a `tracing` level.
pub(crate) struct TemplateFormat {
    format: LogFormat,
    name: String,
    min: Severity,
}

impl TemplateFormat {
    pub(crate) fn new(format: LogFormat, name: String, min: Severity) -> Self {
        Self { format, name, min }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let severity = visitor
            .severity
            .unwrap_or_else(|| Severity::from_level(event.metadata().level()));
        if severity < self.min {
            return Ok(());
        }

        let message = visitor.into_message();
        let record = LogRecord {
            name: &self.name,
            severity,
            message: &message,
        };
        self.format.write(&mut writer, &record)?;
        writeln!(writer)
    }
}

/// Collects the message, the severity override and any structured fields
/// (appended as ` key=value`).
#[derive(Default)]
struct EventVisitor {
    message: String,
    severity: Option<Severity>,
    fields: String,
}

impl EventVisitor {
    fn into_message(mut self) -> String {
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            SEVERITY_FIELD => self.severity = value.parse().ok(),
            "message" => self.message.push_str(value),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            SEVERITY_FIELD => self.severity = format!("{value:?}").parse().ok(),
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}
