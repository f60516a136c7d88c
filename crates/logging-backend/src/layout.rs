//! crates/logging-backend/src/layout.rs
//! Pattern layouts that render log events into text.
//!
//! # Directives
//!
//! | Directive | Renders |
//! |-----------|---------|
//! | `%m` | the message |
//! | `%l` | the level label (`DEBUG`, `INFO`, ...) |
//! | `%c` | the logger name |
//! | `%d` | a UTC timestamp, `YYYY-MM-DDTHH:MM:SS` |
//! | `%r` | milliseconds since the backend was first used |
//! | `%p` | the process id |
//! | `%t` | the thread id |
//! | `%T` | the thread name |
//! | `%F` / `%L` / `%M` | call-site file, line and method, empty when unknown |
//! | `%X{key}` | the MDC value stored under `key` |
//! | `%%` | a literal `%` |
//!
//! Unknown directives are rendered verbatim.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::color::{ColorScheme, Property};
use crate::level::Level;
use crate::mdc::Mdc;

/// Pattern used when a layout is built without one.
pub const DEFAULT_PATTERN: &str = "%m\n";

const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

fn process_start() -> Instant {
    static START: OnceLock<Instant> = OnceLock::new();
    *START.get_or_init(Instant::now)
}

/// Options a [`PatternLayout`] is built from.
///
/// `color_scheme` names a scheme registered with the backend; it is resolved
/// when the layout is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// The pattern, [`DEFAULT_PATTERN`] when absent.
    pub pattern: Option<String>,
    /// Name of a registered color scheme.
    pub color_scheme: Option<String>,
}

/// Call-site information attached to an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Source file.
    pub file: &'static str,
    /// Source line.
    pub line: u32,
    /// Enclosing function, when known.
    pub method: Option<&'static str>,
}

impl From<&'static std::panic::Location<'static>> for Location {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            method: None,
        }
    }
}

/// A single log event as seen by a layout.
#[derive(Clone, Copy, Debug)]
pub struct Event<'a> {
    /// Name of the logger that produced the event.
    pub logger: &'a str,
    /// Severity of the event.
    pub level: Level,
    /// The user supplied message.
    pub message: &'a str,
    /// Call site, when captured.
    pub location: Option<Location>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Message,
    Level,
    Logger,
    Date,
    Time,
    Pid,
    ThreadId,
    Thread,
    File,
    Line,
    Method,
    Mdc(String),
}

impl Segment {
    const fn property(&self) -> Option<Property> {
        match self {
            Self::Message => Some(Property::Message),
            Self::Logger => Some(Property::Logger),
            Self::Date => Some(Property::Date),
            Self::Time => Some(Property::Time),
            Self::Pid => Some(Property::Pid),
            Self::ThreadId => Some(Property::ThreadId),
            Self::Thread => Some(Property::Thread),
            Self::File => Some(Property::File),
            Self::Line => Some(Property::Line),
            Self::Method => Some(Property::Method),
            Self::Literal(_) | Self::Level | Self::Mdc(_) => None,
        }
    }
}

fn parse(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            literal.push(ch);
            continue;
        }
        let directive = match chars.next() {
            Some('m') => Segment::Message,
            Some('l') => Segment::Level,
            Some('c') => Segment::Logger,
            Some('d') => Segment::Date,
            Some('r') => Segment::Time,
            Some('p') => Segment::Pid,
            Some('t') => Segment::ThreadId,
            Some('T') => Segment::Thread,
            Some('F') => Segment::File,
            Some('L') => Segment::Line,
            Some('M') => Segment::Method,
            Some('X') if chars.peek() == Some(&'{') => {
                chars.next();
                let key: String = chars.by_ref().take_while(|c| *c != '}').collect();
                Segment::Mdc(key)
            }
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                literal.push('%');
                literal.push(other);
                continue;
            }
            None => {
                literal.push('%');
                continue;
            }
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(directive);
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Renders events according to a pattern and an optional color scheme.
#[derive(Clone, Debug)]
pub struct PatternLayout {
    pattern: String,
    color_scheme: Option<Arc<ColorScheme>>,
    segments: Vec<Segment>,
}

impl PatternLayout {
    /// Builds a layout from a pattern and an already resolved scheme.
    pub fn new(pattern: impl Into<String>, color_scheme: Option<Arc<ColorScheme>>) -> Self {
        let pattern = pattern.into();
        let segments = parse(&pattern);
        Self {
            pattern,
            color_scheme,
            segments,
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the color scheme, if any.
    pub fn color_scheme(&self) -> Option<&Arc<ColorScheme>> {
        self.color_scheme.as_ref()
    }

    /// Renders `event`, reading `%X{key}` values from `mdc`.
    pub fn format(&self, event: &Event<'_>, mdc: &Mdc) -> String {
        let scheme = self.color_scheme.as_deref();
        let mut out = String::new();

        for segment in &self.segments {
            let text = match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Level => {
                    let label = event.level.label();
                    match scheme {
                        Some(scheme) => out.push_str(&scheme.level(event.level, label)),
                        None => out.push_str(label),
                    }
                    continue;
                }
                Segment::Mdc(key) => {
                    out.push_str(&mdc.get(key).unwrap_or_default());
                    continue;
                }
                Segment::Message => event.message.to_string(),
                Segment::Logger => event.logger.to_string(),
                Segment::Date => OffsetDateTime::now_utc()
                    .format(DATE_FORMAT)
                    .unwrap_or_default(),
                Segment::Time => process_start().elapsed().as_millis().to_string(),
                Segment::Pid => std::process::id().to_string(),
                Segment::ThreadId => format!("{:?}", std::thread::current().id()),
                Segment::Thread => std::thread::current()
                    .name()
                    .unwrap_or_default()
                    .to_string(),
                Segment::File => event.location.map(|l| l.file).unwrap_or_default().to_string(),
                Segment::Line => event
                    .location
                    .map(|l| l.line.to_string())
                    .unwrap_or_default(),
                Segment::Method => event
                    .location
                    .and_then(|l| l.method)
                    .unwrap_or_default()
                    .to_string(),
            };
            match (scheme, segment.property()) {
                (Some(scheme), Some(property)) => out.push_str(&scheme.property(property, &text)),
                _ => out.push_str(&text),
            }
        }

        match scheme {
            Some(scheme) if scheme.colors_lines() => {
                let body = out.trim_end_matches('\n');
                let newlines = out.len() - body.len();
                let mut line = scheme.line(event.level, body);
                for _ in 0..newlines {
                    line.push('\n');
                }
                line
            }
            _ => out,
        }
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN, None)
    }
}

impl std::fmt::Display for PatternLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)?;
        if let Some(scheme) = &self.color_scheme {
            write!(f, " [{}]", scheme.name())?;
        }
        Ok(())
    }
}
