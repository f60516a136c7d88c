//! crates/logging/src/settings.rs
//! Registry of named color definitions and outputs.

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use logging_backend::Backend;

use crate::colors::{Colors, ColorsData, ColorsDefinition};
use crate::logger::Logger;
use crate::outputs::{FileSink, Output, OutputDefinition, SinkData, StdoutSink, SyslogSink};

/// Named color definitions and outputs, plus the backend they compile into.
///
/// Registering a name that is already taken replaces the old definition.
/// Looking up an unknown name returns the null definition instead of failing.
///
/// `C` is the context builders receive. Facade loggers use the default,
/// [`Logger`]; [`Settings::global`] is the registry [`Logger::new`] reads.
pub struct Settings<C = Logger> {
    colors: DashMap<String, Arc<Colors<C>>>,
    outputs: DashMap<String, OutputDefinition<C>>,
    backend: Backend,
}

impl Settings<Logger> {
    /// Returns the process-wide registry, bound to [`Backend::global`].
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Settings<Logger>> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::with_backend(Backend::global().clone()))
    }
}

impl<C> Settings<C> {
    /// Creates an empty registry with its own backend.
    pub fn new() -> Self {
        Self::with_backend(Backend::new())
    }

    /// Creates an empty registry that compiles into `backend`.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            colors: DashMap::new(),
            outputs: DashMap::new(),
            backend,
        }
    }

    /// Returns the backend color schemes and loggers are registered with.
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Registers a color definition built by `build`.
    pub fn colors<F>(&self, name: impl Into<String>, build: F) -> Arc<Colors<C>>
    where
        F: Fn(&mut ColorsData, &C) + Send + Sync + 'static,
    {
        self.register_colors(Colors::new(name, build))
    }

    /// Registers `colors` under its own name.
    pub fn register_colors(&self, colors: Colors<C>) -> Arc<Colors<C>> {
        let colors = Arc::new(colors);
        tracing::debug!(target: "logging::settings", name = colors.name(), "registered colors");
        self.colors
            .insert(colors.name().to_string(), Arc::clone(&colors));
        colors
    }

    /// Looks up a color definition.
    pub fn find_colors(&self, name: &str) -> ColorsDefinition<C> {
        self.colors
            .get(name)
            .map_or(ColorsDefinition::Null, |entry| {
                ColorsDefinition::Defined(Arc::clone(entry.value()))
            })
    }

    /// Registers a console output.
    pub fn stdout<F>(&self, name: impl Into<String>, build: F) -> OutputDefinition<C>
    where
        F: Fn(&mut SinkData<StdoutSink>, &C) + Send + Sync + 'static,
    {
        self.register_output(name, OutputDefinition::Stdout(Arc::new(Output::new(build))))
    }

    /// Registers a file output.
    pub fn file<F>(&self, name: impl Into<String>, build: F) -> OutputDefinition<C>
    where
        F: Fn(&mut SinkData<FileSink>, &C) + Send + Sync + 'static,
    {
        self.register_output(name, OutputDefinition::File(Arc::new(Output::new(build))))
    }

    /// Registers a syslog output.
    pub fn syslog<F>(&self, name: impl Into<String>, build: F) -> OutputDefinition<C>
    where
        F: Fn(&mut SinkData<SyslogSink>, &C) + Send + Sync + 'static,
    {
        self.register_output(name, OutputDefinition::Syslog(Arc::new(Output::new(build))))
    }

    /// Registers `definition` under `name`.
    ///
    /// Registering the null definition removes the name.
    pub fn register_output(
        &self,
        name: impl Into<String>,
        definition: OutputDefinition<C>,
    ) -> OutputDefinition<C> {
        let name = name.into();
        if definition.is_null() {
            tracing::debug!(target: "logging::settings", name = %name, "removed output");
            self.outputs.remove(&name);
        } else {
            tracing::debug!(
                target: "logging::settings",
                name = %name,
                kind = definition.kind(),
                "registered output"
            );
            self.outputs.insert(name, definition.clone());
        }
        definition
    }

    /// Looks up an output.
    pub fn output(&self, name: &str) -> OutputDefinition<C> {
        self.outputs
            .get(name)
            .map_or(OutputDefinition::Null, |entry| entry.value().clone())
    }

    /// Drops every definition and resets the backend.
    ///
    /// Scheme names compiled before the reset no longer resolve.
    pub fn reset(&self) {
        self.colors.clear();
        self.outputs.clear();
        self.backend.reset();
        tracing::debug!(target: "logging::settings", "reset settings");
    }
}

impl<C> Default for Settings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Settings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut colors: Vec<String> = self.colors.iter().map(|e| e.key().clone()).collect();
        let mut outputs: Vec<String> = self.outputs.iter().map(|e| e.key().clone()).collect();
        colors.sort();
        outputs.sort();
        f.debug_struct("Settings")
            .field("colors", &colors)
            .field("outputs", &outputs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use logging_backend::{Color, Level};
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::token::ContextToken;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn removing_an_output_is_logged_as_a_removal() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let settings = Settings::<()>::new();

        tracing::subscriber::with_default(subscriber, || {
            settings.stdout("gone", |_, ()| {});
            settings.register_output("gone", OutputDefinition::Null);
        });

        let logs = captured.contents();
        assert_eq!(logs.matches("registered output").count(), 1);
        assert_eq!(logs.matches("removed output").count(), 1);
        assert!(!logs.contains("null"));
        assert!(settings.output("gone").is_null());
    }

    #[test]
    fn unknown_names_resolve_to_null_definitions() {
        let settings = Settings::<()>::new();
        assert!(settings.find_colors("nope").is_null());
        assert!(settings.output("nope").is_null());
    }

    #[test]
    fn registration_is_keyed_by_name() {
        let settings = Settings::<()>::new();
        settings.colors("warm", |c, ()| {
            c.warn(Color::Yellow);
        });
        settings.stdout("console", |_, ()| {});
        settings.file("disk", |data, ()| {
            data.set_path("app.log");
        });
        settings.syslog("system", |_, ()| {});

        assert_eq!(
            settings.find_colors("warm").colors().map(|c| c.name().to_string()),
            Some("warm".to_string())
        );
        assert_eq!(settings.output("console").kind(), "stdout");
        assert_eq!(settings.output("disk").kind(), "file");
        assert_eq!(settings.output("system").kind(), "syslog");
    }

    #[test]
    fn registering_again_replaces_the_definition() {
        let settings = Settings::<()>::new();
        settings.stdout("out", |data, ()| {
            data.set_level(Level::Warn);
        });
        settings.file("out", |data, ()| {
            data.set_path("replaced.log");
        });

        let data = settings.output("out").data(&()).expect("registered");
        assert_eq!(data.kind(), "file");
        assert!(data.level().is_none());
    }

    #[test]
    fn registering_null_removes_the_name() {
        let settings = Settings::<()>::new();
        settings.stdout("out", |_, ()| {});
        settings.register_output("out", OutputDefinition::Null);
        assert!(settings.output("out").is_null());
    }

    #[test]
    #[serial_test::serial(syslog)]
    fn reset_forgets_definitions_and_compiled_schemes() {
        let settings = Settings::<()>::new();
        let colors = settings.colors("warm", |c, ()| {
            c.warn(Color::Yellow);
        });
        settings.stdout("console", |_, ()| {});
        let scheme = colors
            .to_scheme(&(), ContextToken::next(), settings.backend())
            .expect("compiled");
        assert!(settings.backend().find_color_scheme(&scheme).is_some());

        settings.reset();

        assert!(settings.find_colors("warm").is_null());
        assert!(settings.output("console").is_null());
        assert!(settings.backend().find_color_scheme(&scheme).is_none());
    }

    #[test]
    fn debug_lists_registered_names() {
        let settings = Settings::<()>::new();
        settings.stdout("b", |_, ()| {});
        settings.stdout("a", |_, ()| {});
        let debug = format!("{settings:?}");
        assert!(debug.contains(r#"outputs: ["a", "b"]"#));
    }
}
