#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides per-log-type loggers configured through named outputs
//! and color definitions. Outputs (console, file, syslog) and color
//! definitions are registered once in a [`Settings`] registry as builder
//! closures; each [`Logger`] evaluates the builders of the outputs it names,
//! with itself as context, and attaches the resulting appenders to one backend
//! logger per output.
//!
//! # Design
//!
//! - [`Settings`] maps names to [`OutputDefinition`]s and [`Colors`]. Unknown
//!   names resolve to null definitions, so a logger naming an unregistered
//!   output skips it instead of failing.
//! - [`Output`] is generic over its kind ([`StdoutSink`], [`FileSink`],
//!   [`SyslogSink`], [`BaseSink`]); evaluating it yields a [`SinkData`] with the
//!   shared fields (pattern, colors, level) and the kind's own fields.
//! - Each evaluation draws a [`ContextToken`]. The referenced color definition
//!   is compiled into a backend scheme named `"{colors}-{token}"`, so loggers
//!   never overwrite each other's schemes.
//! - The backend (`logging-backend`) owns named loggers, appenders, pattern
//!   layouts, the MDC and the process-wide syslog connection.
//!
//! # Invariants
//!
//! - An output's level wins over the logger's requested level, which defaults
//!   to [`DEFAULT_LEVEL`].
//! - A logger has one delegate per distinct registered output name, and an
//!   appender of the same kind and name is never attached twice.
//! - Severity predicates are true when any delegate records the level.
//! - A color definition cannot set per-level and per-line colors together.
//!
//! # Errors
//!
//! Building a [`Logger`] fails with [`Error::ColorConflict`] for invalid color
//! definitions and [`Error::MissingField`] for file outputs without a path.
//! [`Error::NotImplemented`] signals an output kind without an appender.
//!
//! # Examples
//!
//! ```
//! use logging::{Color, Level, Logger, LoggerOptions, Settings};
//!
//! let settings: Settings = Settings::new();
//! settings.colors("console", |c, _| {
//!     c.date(Color::Blue).error(Color::Red);
//! });
//! settings.stdout("my_stdout", |data, _| {
//!     data.set_pattern("[%l] %m\n").set_colors("console");
//! });
//! settings.file("my_file", |data, logger| {
//!     data.set_path(format!("log/{}.log", logger.log_type()))
//!         .set_level(Level::Debug);
//! });
//!
//! let logger = Logger::with_settings(
//!     &settings,
//!     "jobs",
//!     LoggerOptions::new().outputs(["my_stdout", "my_file", "undefined"]),
//! )
//! .unwrap();
//!
//! assert_eq!(logger.output_loggers().len(), 2);
//! assert_eq!(logger.file_path(), Some("log/jobs.log"));
//! assert!(logger.is_debug());
//! ```

mod colors;
mod error;
mod logger;
mod options;
mod outputs;
mod settings;
mod token;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use colors::{Colors, ColorsData, ColorsDefinition};
pub use error::{Error, Result};
pub use logger::Logger;
pub use options::{DEFAULT_LEVEL, LoggerOptions};
pub use outputs::{
    BaseSink, FileSink, Output, OutputData, OutputDefinition, SinkData, SinkKind, StdoutSink,
    SyslogSink,
};
pub use settings::Settings;
pub use token::ContextToken;
#[cfg(feature = "tracing")]
pub use tracing_bridge::FacadeLayer;

pub use logging_backend::{
    Appender, AppenderKind, Backend, Color, ColorSpec, Level, Property, SyslogFacility,
    SyslogOptions,
};
