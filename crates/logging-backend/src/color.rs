//! crates/logging-backend/src/color.rs
//! ANSI color schemes applied by pattern layouts.
//!
//! A [`ColorScheme`] is compiled from [`SchemeOptions`]: per-property colors
//! (date, message, logger name, ...) plus either per-level colors, which tint
//! only the level label, or per-line colors, which tint the whole rendered
//! line. A scheme never carries both.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anstyle::{AnsiColor, Style};
use thiserror::Error;

use crate::error::BackendError;
use crate::level::Level;

/// A single ANSI display attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum Color {
    Clear,
    Bold,
    Dark,
    Underline,
    Blink,
    Reverse,
    Concealed,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    OnBlack,
    OnRed,
    OnGreen,
    OnYellow,
    OnBlue,
    OnMagenta,
    OnCyan,
    OnWhite,
}

impl Color {
    /// Returns `style` with the attribute applied.
    ///
    /// `Clear` discards everything applied before it. A later foreground or
    /// background color replaces an earlier one.
    pub fn apply(self, style: Style) -> Style {
        match self {
            Self::Clear => Style::new(),
            Self::Bold => style.bold(),
            Self::Dark => style.dimmed(),
            Self::Underline => style.underline(),
            Self::Blink => style.blink(),
            Self::Reverse => style.invert(),
            Self::Concealed => style.hidden(),
            Self::Black => fg(style, AnsiColor::Black),
            Self::Red => fg(style, AnsiColor::Red),
            Self::Green => fg(style, AnsiColor::Green),
            Self::Yellow => fg(style, AnsiColor::Yellow),
            Self::Blue => fg(style, AnsiColor::Blue),
            Self::Magenta => fg(style, AnsiColor::Magenta),
            Self::Cyan => fg(style, AnsiColor::Cyan),
            Self::White => fg(style, AnsiColor::White),
            Self::OnBlack => bg(style, AnsiColor::Black),
            Self::OnRed => bg(style, AnsiColor::Red),
            Self::OnGreen => bg(style, AnsiColor::Green),
            Self::OnYellow => bg(style, AnsiColor::Yellow),
            Self::OnBlue => bg(style, AnsiColor::Blue),
            Self::OnMagenta => bg(style, AnsiColor::Magenta),
            Self::OnCyan => bg(style, AnsiColor::Cyan),
            Self::OnWhite => bg(style, AnsiColor::White),
        }
    }

    /// Returns the snake_case name of the attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Bold => "bold",
            Self::Dark => "dark",
            Self::Underline => "underline",
            Self::Blink => "blink",
            Self::Reverse => "reverse",
            Self::Concealed => "concealed",
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::OnBlack => "on_black",
            Self::OnRed => "on_red",
            Self::OnGreen => "on_green",
            Self::OnYellow => "on_yellow",
            Self::OnBlue => "on_blue",
            Self::OnMagenta => "on_magenta",
            Self::OnCyan => "on_cyan",
            Self::OnWhite => "on_white",
        }
    }

    /// Looks an attribute up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [Color; 23] = [
            Color::Clear,
            Color::Bold,
            Color::Dark,
            Color::Underline,
            Color::Blink,
            Color::Reverse,
            Color::Concealed,
            Color::Black,
            Color::Red,
            Color::Green,
            Color::Yellow,
            Color::Blue,
            Color::Magenta,
            Color::Cyan,
            Color::White,
            Color::OnBlack,
            Color::OnRed,
            Color::OnGreen,
            Color::OnYellow,
            Color::OnBlue,
            Color::OnMagenta,
            Color::OnCyan,
            Color::OnWhite,
        ];
        let name = name.to_ascii_lowercase();
        ALL.into_iter().find(|color| color.as_str() == name)
    }
}

fn fg(style: Style, color: AnsiColor) -> Style {
    style.fg_color(Some(anstyle::Color::Ansi(color)))
}

fn bg(style: Style, color: AnsiColor) -> Style {
    style.bg_color(Some(anstyle::Color::Ansi(color)))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised color name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown color: {0}")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// An ordered combination of attributes, e.g. white text on a red background.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColorSpec(Vec<Color>);

impl ColorSpec {
    /// Builds a spec from attributes applied in order.
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self(colors.into_iter().collect())
    }

    /// Returns the attributes in application order.
    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    /// Folds the attributes into a terminal style.
    pub fn style(&self) -> Style {
        self.0
            .iter()
            .fold(Style::new(), |style, color| color.apply(style))
    }

    /// Returns the escape sequence that switches the attributes on.
    pub fn escape(&self) -> String {
        self.style().render().to_string()
    }

    /// Wraps `text` in the spec's escape sequence and a trailing reset.
    pub fn paint(&self, text: &str) -> String {
        let style = self.style();
        if style.is_plain() {
            return text.to_string();
        }
        format!("{}{text}{}", style.render(), style.render_reset())
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self(vec![color])
    }
}

impl<const N: usize> From<[Color; N]> for ColorSpec {
    fn from(colors: [Color; N]) -> Self {
        Self(colors.to_vec())
    }
}

impl From<Vec<Color>> for ColorSpec {
    fn from(colors: Vec<Color>) -> Self {
        Self(colors)
    }
}

/// Pattern properties a scheme can color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Property {
    /// `%c`, name of the logger that produced the event.
    Logger,
    /// `%d`, timestamp.
    Date,
    /// `%m`, the user supplied message.
    Message,
    /// `%r`, milliseconds since the process started.
    Time,
    /// `%p`, process id.
    Pid,
    /// `%T`, thread name.
    Thread,
    /// `%t`, thread id.
    ThreadId,
    /// `%F`, file of the call site.
    File,
    /// `%L`, line of the call site.
    Line,
    /// `%M`, method of the call site.
    Method,
}

impl Property {
    /// Every property, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Logger,
        Self::Date,
        Self::Message,
        Self::Time,
        Self::Pid,
        Self::Thread,
        Self::ThreadId,
        Self::File,
        Self::Line,
        Self::Method,
    ];
}

/// Declarative input of a [`ColorScheme`].
///
/// Only keys that were explicitly set are present. `levels` and `lines` are
/// `None` unless at least one of their entries is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemeOptions {
    /// Colors for individual pattern properties.
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<Property, ColorSpec>,
    /// Colors for the level label, keyed by level.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub levels: Option<BTreeMap<Level, ColorSpec>>,
    /// Colors for the whole line, keyed by level.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub lines: Option<BTreeMap<Level, ColorSpec>>,
}

/// A compiled, registered color scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    name: String,
    options: SchemeOptions,
}

impl ColorScheme {
    /// Compiles `options` under `name`.
    ///
    /// Fails when the options color both level labels and whole lines.
    pub fn new(name: impl Into<String>, options: SchemeOptions) -> Result<Self, BackendError> {
        let name = name.into();
        if options.levels.is_some() && options.lines.is_some() {
            return Err(BackendError::ConflictingColorScheme { name });
        }
        Ok(Self { name, options })
    }

    /// Returns the registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the options the scheme was compiled from.
    pub const fn options(&self) -> &SchemeOptions {
        &self.options
    }

    /// Reports whether the scheme colors whole lines.
    pub fn colors_lines(&self) -> bool {
        self.options.lines.is_some()
    }

    /// Colors `text` rendered for `property`, or returns it unchanged.
    pub fn property(&self, property: Property, text: &str) -> String {
        match self.options.properties.get(&property) {
            Some(spec) => spec.paint(text),
            None => text.to_string(),
        }
    }

    /// Colors the level label for `level`, or returns it unchanged.
    pub fn level(&self, level: Level, text: &str) -> String {
        paint_for_level(self.options.levels.as_ref(), level, text)
    }

    /// Colors a whole rendered line for `level`, or returns it unchanged.
    pub fn line(&self, level: Level, text: &str) -> String {
        paint_for_level(self.options.lines.as_ref(), level, text)
    }
}

fn paint_for_level(map: Option<&BTreeMap<Level, ColorSpec>>, level: Level, text: &str) -> String {
    match map.and_then(|map| map.get(&level)) {
        Some(spec) => spec.paint(text),
        None => text.to_string(),
    }
}
