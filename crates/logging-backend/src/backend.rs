//! crates/logging-backend/src/backend.rs
//! Registries of loggers and color schemes, plus the shared MDC.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::color::{ColorScheme, SchemeOptions};
use crate::error::BackendError;
use crate::layout::{DEFAULT_PATTERN, LayoutOptions, PatternLayout};
use crate::logger::Logger;
use crate::mdc::Mdc;
use crate::syslog;

#[derive(Debug, Default)]
struct Registries {
    loggers: DashMap<String, Arc<Logger>>,
    color_schemes: DashMap<String, Arc<ColorScheme>>,
    mdc: Mdc,
}

/// Handle to a set of registries.
///
/// Cloning a `Backend` yields another handle to the same registries.
/// [`Backend::global`] is the process-wide instance; [`Backend::new`] builds
/// an isolated one.
#[derive(Clone, Debug, Default)]
pub struct Backend {
    inner: Arc<Registries>,
}

impl Backend {
    /// Creates empty, isolated registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide backend.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Backend> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the logger registered under `name`, creating it on first use.
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        if let Some(existing) = self.inner.loggers.get(name) {
            return Arc::clone(existing.value());
        }
        Arc::clone(
            self.inner
                .loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name, self.inner.mdc.clone())))
                .value(),
        )
    }

    /// Returns the logger registered under `name` without creating it.
    pub fn find_logger(&self, name: &str) -> Option<Arc<Logger>> {
        self.inner
            .loggers
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Unregisters the logger named `name` and returns it.
    ///
    /// Handles already given out keep working; the logger and its appenders
    /// are released once the last one is dropped.
    pub fn remove_logger(&self, name: &str) -> Option<Arc<Logger>> {
        self.inner.loggers.remove(name).map(|(_, logger)| logger)
    }

    /// Number of registered loggers.
    pub fn logger_count(&self) -> usize {
        self.inner.loggers.len()
    }

    /// Compiles `options` and registers the scheme under `name`.
    ///
    /// A scheme already registered under `name` is replaced.
    pub fn color_scheme(
        &self,
        name: impl Into<String>,
        options: SchemeOptions,
    ) -> Result<Arc<ColorScheme>, BackendError> {
        let scheme = Arc::new(ColorScheme::new(name, options)?);
        self.inner
            .color_schemes
            .insert(scheme.name().to_string(), Arc::clone(&scheme));
        Ok(scheme)
    }

    /// Returns the scheme registered under `name`.
    pub fn find_color_scheme(&self, name: &str) -> Option<Arc<ColorScheme>> {
        self.inner
            .color_schemes
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Unregisters the scheme named `name` and returns it.
    pub fn remove_color_scheme(&self, name: &str) -> Option<Arc<ColorScheme>> {
        self.inner
            .color_schemes
            .remove(name)
            .map(|(_, scheme)| scheme)
    }

    /// Number of registered color schemes.
    pub fn color_scheme_count(&self) -> usize {
        self.inner.color_schemes.len()
    }

    /// Builds a pattern layout, resolving the named color scheme.
    pub fn pattern_layout(&self, options: &LayoutOptions) -> Result<PatternLayout, BackendError> {
        let scheme = match &options.color_scheme {
            Some(name) => Some(self.find_color_scheme(name).ok_or_else(|| {
                BackendError::UnknownColorScheme { name: name.clone() }
            })?),
            None => None,
        };
        let pattern = options.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        Ok(PatternLayout::new(pattern, scheme))
    }

    /// Returns the mapped diagnostic context shared by this backend's loggers.
    pub fn mdc(&self) -> &Mdc {
        &self.inner.mdc
    }

    /// Drops every logger and color scheme, clears the MDC and closes syslog.
    ///
    /// Loggers handed out before the reset keep working but are no longer
    /// reachable by name.
    pub fn reset(&self) {
        for entry in &self.inner.loggers {
            entry.value().clear_appenders();
        }
        self.inner.loggers.clear();
        self.inner.color_schemes.clear();
        self.inner.mdc.clear();
        syslog::close();
        tracing::debug!(target: "logging_backend::backend", "reset backend registries");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::color::Color;
    use crate::level::Level;

    #[test]
    fn logger_is_created_once_per_name() {
        let backend = Backend::new();
        let first = backend.logger("a");
        let second = backend.logger("a");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.logger_count(), 1);
        assert!(backend.find_logger("b").is_none());
    }

    #[test]
    fn removed_loggers_are_recreated_fresh() {
        let backend = Backend::new();
        let first = backend.logger("a");
        first.set_level(Level::Error);

        let removed = backend.remove_logger("a").expect("registered");
        assert!(Arc::ptr_eq(&first, &removed));
        assert_eq!(backend.logger_count(), 0);
        assert!(backend.remove_logger("a").is_none());

        let second = backend.logger("a");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn removed_schemes_stop_resolving() {
        let backend = Backend::new();
        backend
            .color_scheme("temp", SchemeOptions::default())
            .expect("valid scheme");
        assert_eq!(backend.color_scheme_count(), 1);

        assert!(backend.remove_color_scheme("temp").is_some());
        assert_eq!(backend.color_scheme_count(), 0);
        assert!(backend.find_color_scheme("temp").is_none());
    }

    #[test]
    fn backends_are_isolated() {
        let one = Backend::new();
        let two = Backend::new();
        one.logger("only-here");
        assert!(two.find_logger("only-here").is_none());
    }

    #[test]
    fn pattern_layout_resolves_registered_schemes() {
        let backend = Backend::new();
        backend
            .color_scheme(
                "warm",
                SchemeOptions {
                    levels: Some(BTreeMap::from([(Level::Warn, Color::Yellow.into())])),
                    ..SchemeOptions::default()
                },
            )
            .expect("valid scheme");

        let layout = backend
            .pattern_layout(&LayoutOptions {
                pattern: Some("%d : %m\n".to_string()),
                color_scheme: Some("warm".to_string()),
            })
            .expect("layout");
        assert_eq!(layout.pattern(), "%d : %m\n");
        assert_eq!(layout.color_scheme().map(|s| s.name()), Some("warm"));
    }

    #[test]
    fn pattern_layout_defaults_pattern() {
        let layout = Backend::new()
            .pattern_layout(&LayoutOptions::default())
            .expect("layout");
        assert_eq!(layout.pattern(), DEFAULT_PATTERN);
        assert!(layout.color_scheme().is_none());
    }

    #[test]
    fn pattern_layout_rejects_unknown_schemes() {
        let err = Backend::new()
            .pattern_layout(&LayoutOptions {
                pattern: None,
                color_scheme: Some("nope".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, BackendError::UnknownColorScheme { ref name } if name == "nope"));
    }

    #[test]
    #[serial_test::serial(syslog)]
    fn reset_drops_registrations() {
        let backend = Backend::new();
        backend.logger("gone");
        backend
            .color_scheme("gone", SchemeOptions::default())
            .expect("valid scheme");
        backend.mdc().insert("k", "v");

        backend.reset();

        assert!(backend.find_logger("gone").is_none());
        assert!(backend.find_color_scheme("gone").is_none());
        assert!(backend.mdc().is_empty());
    }
}
