//! crates/logging/src/logger.rs
//! Facade loggers that fan out to one backend logger per output.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use logging_backend::{Appender, AppenderKind, Backend, Level, Location, syslog};

use crate::error::Result;
use crate::options::LoggerOptions;
use crate::settings::Settings;

type Delegate = logging_backend::Logger;

fn next_instance_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// A logger for one log type, writing to every configured output.
///
/// Each output name resolves, through [`Settings`], to its own backend
/// logger (a *delegate*) carrying the output's appender and level. Severity
/// calls go to every delegate; severity predicates are true when any
/// delegate would record the event.
///
/// Output names that are not registered are skipped. Requesting the same
/// name twice attaches it once.
pub struct Logger {
    log_type: String,
    level: Level,
    outputs: Vec<String>,
    instance_id: u64,
    output_loggers: Vec<(String, Arc<Delegate>)>,
    backend: Backend,
    file_path: OnceLock<Option<String>>,
}

macro_rules! severity_methods {
    ($($level:ident => $log:ident, $log_with:ident, $is:ident;)*) => {
        $(
            #[doc = concat!("Records `message` at `", stringify!($log), "` on every output.")]
            #[track_caller]
            pub fn $log(&self, message: impl AsRef<str>) {
                self.log(Level::$level, message);
            }

            #[doc = concat!("Builds and records a `", stringify!($log), "` message if any output would record it.")]
            #[track_caller]
            pub fn $log_with<F>(&self, message: F)
            where
                F: FnOnce() -> String,
            {
                self.log_with(Level::$level, message);
            }

            #[doc = concat!("Reports whether any output records `", stringify!($log), "` events.")]
            pub fn $is(&self) -> bool {
                self.enabled(Level::$level)
            }
        )*
    };
}

impl Logger {
    /// Builds a logger from the global [`Settings`].
    ///
    /// # Errors
    ///
    /// Fails when an output's color definition is invalid or an output
    /// cannot produce an appender.
    pub fn new(log_type: impl Into<String>, options: impl Into<LoggerOptions>) -> Result<Self> {
        Self::with_settings(Settings::global(), log_type, options)
    }

    /// Builds a logger from `settings`.
    ///
    /// Output builders receive the logger under construction, so they can
    /// read its [`log_type`](Self::log_type) and [`level`](Self::level).
    ///
    /// # Errors
    ///
    /// See [`Logger::new`].
    pub fn with_settings(
        settings: &Settings<Self>,
        log_type: impl Into<String>,
        options: impl Into<LoggerOptions>,
    ) -> Result<Self> {
        let options = options.into();
        let mut logger = Self {
            log_type: log_type.into(),
            level: options.effective_level(),
            outputs: options.unique_outputs(),
            instance_id: next_instance_id(),
            output_loggers: Vec::new(),
            backend: settings.backend().clone(),
            file_path: OnceLock::new(),
        };
        logger.output_loggers = logger.attach_outputs(settings)?;
        tracing::debug!(
            target: "logging::logger",
            log_type = %logger.log_type,
            level = %logger.level,
            delegates = logger.output_loggers.len(),
            "built logger"
        );
        Ok(logger)
    }

    fn attach_outputs(&self, settings: &Settings<Self>) -> Result<Vec<(String, Arc<Delegate>)>> {
        let mut resolved = Vec::with_capacity(self.outputs.len());
        for name in &self.outputs {
            let output = settings.output(name);
            let Some(data) = output.data(self) else {
                tracing::debug!(
                    target: "logging::logger",
                    log_type = %self.log_type,
                    output = %name,
                    "skipping unregistered output"
                );
                continue;
            };

            let level = data.level().unwrap_or(self.level);
            match data.to_appender(self, settings) {
                Ok(appender) => resolved.push((name, level, appender)),
                Err(err) => {
                    self.discard(resolved.iter().map(|(_, _, appender)| appender));
                    return Err(err);
                }
            }
        }

        // Delegates are registered only once every output produced an appender.
        Ok(resolved
            .into_iter()
            .map(|(name, level, appender)| {
                let delegate = self.backend.logger(&self.delegate_name(name));
                delegate.set_level(level);
                delegate.add_appender(Arc::new(appender));
                (name.clone(), delegate)
            })
            .collect())
    }

    /// Releases backend state held by appenders that will never be attached.
    fn discard<'a>(&self, appenders: impl Iterator<Item = &'a Appender>) {
        let mut opened_syslog = false;
        for appender in appenders {
            self.release_scheme(appender);
            opened_syslog |= appender.kind() == AppenderKind::Syslog;
        }
        if opened_syslog {
            syslog::close();
        }
    }

    fn release_scheme(&self, appender: &Appender) {
        if let Some(scheme) = appender.layout().color_scheme() {
            self.backend.remove_color_scheme(scheme.name());
        }
    }

    fn delegate_name(&self, output: &str) -> String {
        format!("Logger-{}-{}-{output}", self.log_type, self.instance_id)
    }

    /// Returns the log type.
    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    /// Returns the requested level.
    ///
    /// Outputs that set their own level ignore it.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Returns the requested output names, without duplicates.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Returns the delegate loggers keyed by output name, in attachment order.
    pub fn output_loggers(&self) -> &[(String, Arc<Delegate>)] {
        &self.output_loggers
    }

    /// Returns the delegate for `output`.
    pub fn output_logger(&self, output: &str) -> Option<&Arc<Delegate>> {
        self.output_loggers
            .iter()
            .find(|(name, _)| name == output)
            .map(|(_, delegate)| delegate)
    }

    /// Returns every appender attached to the delegates.
    pub fn appenders(&self) -> Vec<Arc<Appender>> {
        self.output_loggers
            .iter()
            .flat_map(|(_, delegate)| delegate.appenders())
            .collect()
    }

    /// Stores `value` under `key` in the backend's mapped diagnostic context.
    ///
    /// The context is shared by every logger on the same backend.
    pub fn mdc(&self, key: impl Into<String>, value: impl Into<String>) {
        self.backend.mdc().insert(key, value);
    }

    /// Returns the path of the first file output, computed once.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path
            .get_or_init(|| {
                self.appenders()
                    .iter()
                    .find(|appender| appender.kind() == AppenderKind::File)
                    .map(|appender| appender.name().to_string())
            })
            .as_deref()
    }

    /// Reports whether any delegate records events at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.output_loggers
            .iter()
            .any(|(_, delegate)| delegate.enabled(level))
    }

    /// Records `message` at `level` on every delegate.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        let location = Location::from(std::panic::Location::caller());
        self.log_at(level, message.as_ref(), Some(location));
    }

    /// Records `message` at `level` with an explicit call site.
    pub fn log_at(&self, level: Level, message: &str, location: Option<Location>) {
        for (_, delegate) in &self.output_loggers {
            delegate.log_at(level, message, location);
        }
    }

    /// Builds the message only when some delegate records `level`.
    #[track_caller]
    pub fn log_with<F>(&self, level: Level, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.enabled(level) {
            self.log(level, message());
        }
    }

    severity_methods! {
        Debug => debug, debug_with, is_debug;
        Info => info, info_with, is_info;
        Warn => warn, warn_with, is_warn;
        Error => error, error_with, is_error;
        Fatal => fatal, fatal_with, is_fatal;
        Any => unknown, unknown_with, is_unknown;
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for (_, delegate) in &self.output_loggers {
            self.backend.remove_logger(delegate.name());
            for appender in delegate.appenders() {
                self.release_scheme(&appender);
            }
        }
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        let ours: BTreeSet<&str> = self.outputs.iter().map(String::as_str).collect();
        let theirs: BTreeSet<&str> = other.outputs.iter().map(String::as_str).collect();
        self.log_type == other.log_type && self.level == other.level && ours == theirs
    }
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("log_type", &self.log_type)
            .field("level", &self.level)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}
