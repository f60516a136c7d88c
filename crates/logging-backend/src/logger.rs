//! crates/logging-backend/src/logger.rs
//! Named loggers holding a level threshold and a list of appenders.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::appender::{Appender, AppenderKind};
use crate::layout::{Event, Location};
use crate::level::Level;
use crate::mdc::Mdc;

/// A named logger.
///
/// Events below the logger's level are dropped; the rest are rendered by
/// every attached appender, in attachment order. Loggers are shared through
/// [`Arc`] and are safe to use from several threads.
pub struct Logger {
    name: String,
    level: AtomicU8,
    appenders: RwLock<Vec<Arc<Appender>>>,
    mdc: Mdc,
}

impl Logger {
    pub(crate) fn new(name: impl Into<String>, mdc: Mdc) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(Level::default().ordinal()),
            appenders: RwLock::new(Vec::new()),
            mdc,
        }
    }

    /// Returns the logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the level threshold.
    pub fn level(&self) -> Level {
        Level::from_ordinal(self.level.load(Ordering::Relaxed))
    }

    /// Sets the level threshold.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.ordinal(), Ordering::Relaxed);
    }

    /// Attaches `appender` unless one of the same kind and name is attached.
    ///
    /// Returns whether the appender was attached.
    pub fn add_appender(&self, appender: Arc<Appender>) -> bool {
        let mut appenders = self
            .appenders
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if appenders
            .iter()
            .any(|existing| existing.matches(appender.kind(), appender.name()))
        {
            return false;
        }
        appenders.push(appender);
        true
    }

    /// Reports whether an appender of `kind` named `name` is attached.
    pub fn has_appender(&self, kind: AppenderKind, name: &str) -> bool {
        self.appenders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|appender| appender.matches(kind, name))
    }

    /// Returns the attached appenders in attachment order.
    pub fn appenders(&self) -> Vec<Arc<Appender>> {
        self.appenders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Detaches every appender.
    pub fn clear_appenders(&self) {
        self.appenders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Reports whether an event at `level` would be recorded.
    pub fn enabled(&self, level: Level) -> bool {
        self.level().allows(level)
    }

    /// Records `message` at `level`.
    ///
    /// Appender failures are reported through `tracing` and do not stop the
    /// remaining appenders.
    pub fn log(&self, level: Level, message: &str) {
        self.log_at(level, message, None);
    }

    /// Records `message` at `level` with the call site attached.
    pub fn log_at(&self, level: Level, message: &str, location: Option<Location>) {
        if !self.enabled(level) {
            return;
        }
        let event = Event {
            logger: &self.name,
            level,
            message,
            location,
        };
        for appender in self.appenders() {
            if let Err(error) = appender.append(&event, &self.mdc) {
                tracing::warn!(
                    target: "logging_backend::appender",
                    logger = %self.name,
                    appender = appender.name(),
                    %error,
                    "failed to write log event"
                );
            }
        }
    }

    /// Records a `debug` event.
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Records an `info` event.
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Records a `warn` event.
    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Records an `error` event.
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Records a `fatal` event.
    pub fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }

    /// Records an unleveled event.
    pub fn unknown(&self, message: &str) {
        self.log(Level::Any, message);
    }

    /// Reports whether `debug` events are recorded.
    pub fn is_debug(&self) -> bool {
        self.enabled(Level::Debug)
    }

    /// Reports whether `info` events are recorded.
    pub fn is_info(&self) -> bool {
        self.enabled(Level::Info)
    }

    /// Reports whether `warn` events are recorded.
    pub fn is_warn(&self) -> bool {
        self.enabled(Level::Warn)
    }

    /// Reports whether `error` events are recorded.
    pub fn is_error(&self) -> bool {
        self.enabled(Level::Error)
    }

    /// Reports whether `fatal` events are recorded.
    pub fn is_fatal(&self) -> bool {
        self.enabled(Level::Fatal)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("appenders", &self.appenders())
            .finish_non_exhaustive()
    }
}
