//! crates/logging-backend/src/level.rs
//! Severity levels shared by loggers, layouts and color schemes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log event and threshold of a logger.
///
/// Levels are totally ordered: a logger set to [`Level::Warn`] records
/// `warn`, `error`, `fatal` and `any` events and drops `debug` and `info`.
/// [`Level::Any`] is the unleveled severity; it is always recorded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Fine-grained diagnostics.
    Debug,
    /// Progress of the application.
    #[default]
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Failures the application survives.
    Error,
    /// Failures the application does not survive.
    Fatal,
    /// Unleveled events, recorded regardless of threshold.
    Any,
}

impl Level {
    /// The five standard levels, lowest first.
    pub const STANDARD: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Looks a level up by name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_backend::Level;
    ///
    /// assert_eq!(Level::from_name("WARN"), Some(Level::Warn));
    /// assert_eq!(Level::from_name("verbose"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "fatal" => Some(Self::Fatal),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Returns the lowercase name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Any => "any",
        }
    }

    /// Returns the label rendered by the `%l` layout directive.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Any => "ANY",
        }
    }

    /// Returns the ordinal of the level, `debug` being `0`.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warn,
            3 => Self::Error,
            4 => Self::Fatal,
            _ => Self::Any,
        }
    }

    /// Reports whether an event at `event` passes a threshold of `self`.
    pub fn allows(self, event: Self) -> bool {
        event == Self::Any || event >= self
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised level name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
