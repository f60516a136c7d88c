//! crates/logging/src/outputs/mod.rs
//! Output definitions and the appenders they produce.
//!
//! An [`Output`] stores a builder closure for one output kind. Nothing runs
//! when the output is registered: each [`Output::data`] call evaluates the
//! builder against a context and yields a fresh [`SinkData`], which then
//! produces the backend [`Appender`].
//!
//! The kind is a type parameter implementing [`SinkKind`]. [`BaseSink`] has no
//! appender; asking it for one fails with [`Error::NotImplemented`].

mod data;
mod file;
mod stdout;
mod syslog;

use std::fmt;
use std::sync::Arc;

use logging_backend::{Appender, Level, PatternLayout};

pub use data::SinkData;
pub use file::FileSink;
pub use stdout::StdoutSink;
pub use syslog::SyslogSink;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// An output kind: the fields it adds to [`SinkData`] and the appender it
/// opens.
pub trait SinkKind: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Kind name used in diagnostics.
    const NAME: &'static str;

    /// Opens the backend appender for one evaluation.
    ///
    /// # Errors
    ///
    /// The default implementation fails with [`Error::NotImplemented`].
    fn open_appender(_data: &SinkData<Self>, _layout: PatternLayout) -> Result<Appender> {
        Err(Error::NotImplemented {
            kind: Self::NAME,
            operation: "to_appender",
        })
    }
}

/// The abstract kind: shared fields only, no appender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseSink;

impl SinkKind for BaseSink {
    const NAME: &'static str = "base";
}

type OutputBuild<K, C> = Arc<dyn Fn(&mut SinkData<K>, &C) + Send + Sync>;

/// A registered output of kind `K` whose builder receives a `C`.
pub struct Output<K, C> {
    build: OutputBuild<K, C>,
}

impl<K: SinkKind, C> Output<K, C> {
    /// Creates an output from a builder closure.
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&mut SinkData<K>, &C) + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }

    /// Evaluates the builder against `context`.
    pub fn data(&self, context: &C) -> SinkData<K> {
        let mut data = SinkData::new();
        (self.build)(&mut data, context);
        data
    }

    /// Evaluates the builder and opens the resulting appender.
    ///
    /// # Errors
    ///
    /// See [`SinkData::to_appender`].
    pub fn to_appender(&self, context: &C, settings: &Settings<C>) -> Result<Appender> {
        self.data(context).to_appender(context, settings)
    }
}

impl<K, C> Clone for Output<K, C> {
    fn clone(&self) -> Self {
        Self {
            build: Arc::clone(&self.build),
        }
    }
}

impl<K: SinkKind, C> fmt::Debug for Output<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("kind", &K::NAME)
            .finish_non_exhaustive()
    }
}

/// One evaluation of a registered output, whatever its kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputData {
    /// Console output.
    Stdout(SinkData<StdoutSink>),
    /// File output.
    File(SinkData<FileSink>),
    /// Syslog output.
    Syslog(SinkData<SyslogSink>),
}

impl OutputData {
    /// Returns the kind name.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stdout(_) => StdoutSink::NAME,
            Self::File(_) => FileSink::NAME,
            Self::Syslog(_) => SyslogSink::NAME,
        }
    }

    /// Returns the output-specific level, if set.
    pub const fn level(&self) -> Option<Level> {
        match self {
            Self::Stdout(data) => data.level(),
            Self::File(data) => data.level(),
            Self::Syslog(data) => data.level(),
        }
    }

    /// Opens the appender for this evaluation.
    ///
    /// # Errors
    ///
    /// See [`SinkData::to_appender`].
    pub fn to_appender<C>(&self, context: &C, settings: &Settings<C>) -> Result<Appender> {
        match self {
            Self::Stdout(data) => data.to_appender(context, settings),
            Self::File(data) => data.to_appender(context, settings),
            Self::Syslog(data) => data.to_appender(context, settings),
        }
    }
}

/// Result of an output lookup: a registered output or the null output.
///
/// The null output evaluates to nothing and opens no appender.
pub enum OutputDefinition<C> {
    /// No output is registered under the requested name.
    Null,
    /// A console output.
    Stdout(Arc<Output<StdoutSink, C>>),
    /// A file output.
    File(Arc<Output<FileSink, C>>),
    /// A syslog output.
    Syslog(Arc<Output<SyslogSink, C>>),
}

impl<C> OutputDefinition<C> {
    /// Returns the kind name, `"null"` for the null output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Stdout(_) => StdoutSink::NAME,
            Self::File(_) => FileSink::NAME,
            Self::Syslog(_) => SyslogSink::NAME,
        }
    }

    /// Reports whether this is the null output.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Evaluates the builder against `context`; `None` for the null output.
    pub fn data(&self, context: &C) -> Option<OutputData> {
        match self {
            Self::Null => None,
            Self::Stdout(output) => Some(OutputData::Stdout(output.data(context))),
            Self::File(output) => Some(OutputData::File(output.data(context))),
            Self::Syslog(output) => Some(OutputData::Syslog(output.data(context))),
        }
    }

    /// Evaluates the builder and opens its appender; `None` for the null
    /// output.
    ///
    /// # Errors
    ///
    /// See [`SinkData::to_appender`].
    pub fn to_appender(&self, context: &C, settings: &Settings<C>) -> Result<Option<Appender>> {
        self.data(context)
            .map(|data| data.to_appender(context, settings))
            .transpose()
    }
}

impl<C> Clone for OutputDefinition<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Stdout(output) => Self::Stdout(Arc::clone(output)),
            Self::File(output) => Self::File(Arc::clone(output)),
            Self::Syslog(output) => Self::Syslog(Arc::clone(output)),
        }
    }
}

impl<C> fmt::Debug for OutputDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputDefinition({})", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_kind_has_no_appender() {
        let settings = Settings::<()>::new();
        let output = Output::<BaseSink, ()>::new(|data, ()| {
            data.set_pattern("%m");
        });

        assert_eq!(output.data(&()).pattern(), "%m");
        let err = output.to_appender(&(), &settings).unwrap_err();
        assert!(matches!(
            err,
            Error::NotImplemented {
                kind: "base",
                operation: "to_appender"
            }
        ));
    }

    #[test]
    fn builder_reads_the_context() {
        let output = Output::<FileSink, String>::new(|data, log_type| {
            data.set_path(format!("log/development-{log_type}.log"));
        });
        let data = output.data(&"test".to_string());
        assert_eq!(
            data.path().and_then(|p| p.to_str()),
            Some("log/development-test.log")
        );
    }

    #[test]
    fn null_definition_is_inert() {
        let settings = Settings::<()>::new();
        let null = OutputDefinition::<()>::Null;
        assert!(null.is_null());
        assert_eq!(null.kind(), "null");
        assert!(null.data(&()).is_none());
        assert!(null.to_appender(&(), &settings).expect("no-op").is_none());
    }

    #[test]
    fn definition_data_keeps_the_kind() {
        let stdout = OutputDefinition::<()>::Stdout(Arc::new(Output::new(|data, ()| {
            data.set_level(Level::Debug);
        })));
        let data = stdout.data(&()).expect("data");
        assert_eq!(data.kind(), "stdout");
        assert_eq!(data.level(), Some(Level::Debug));
    }
}
