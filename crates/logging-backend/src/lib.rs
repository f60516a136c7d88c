#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-backend/src/lib.rs
//!
//! # Overview
//!
//! `logging-backend` is the engine behind the `logging` facade: named
//! [`Logger`]s with a [`Level`] threshold, [`Appender`]s that write rendered
//! events to stdout, files or syslog, [`PatternLayout`]s that render events
//! and [`ColorScheme`]s that tint them.
//!
//! # Design
//!
//! All registries hang off a [`Backend`] handle. [`Backend::global`] is the
//! process-wide instance; tests build isolated ones with [`Backend::new`] so
//! loggers and schemes registered by one test never leak into another.
//! Loggers are looked up by unique name and shared through [`std::sync::Arc`].
//!
//! # Invariants
//!
//! - A logger never holds two appenders of the same [`AppenderKind`] and name.
//! - A color scheme colors either level labels or whole lines, never both.
//! - At most one syslog connection is open per process; opening a syslog
//!   appender replaces any open connection.
//!
//! # Errors
//!
//! Registry operations return [`BackendError`]. Appender write failures are
//! reported through `tracing` and never reach the code that logged the event.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use logging_backend::{Appender, Backend, LayoutOptions, Level};
//!
//! let backend = Backend::new();
//! let layout = backend.pattern_layout(&LayoutOptions {
//!     pattern: Some("%l %m\n".to_string()),
//!     color_scheme: None,
//! })?;
//!
//! let logger = backend.logger("app");
//! logger.set_level(Level::Debug);
//! logger.add_appender(Arc::new(Appender::stdout(layout)));
//! assert!(logger.is_debug());
//! # Ok::<(), logging_backend::BackendError>(())
//! ```

mod appender;
mod backend;
mod color;
mod error;
mod layout;
mod level;
mod logger;
mod mdc;
#[allow(unsafe_code)]
pub mod syslog;

pub use appender::{Appender, AppenderKind, STDOUT_NAME, SYSLOG_NAME};
pub use backend::Backend;
pub use color::{Color, ColorScheme, ColorSpec, ParseColorError, Property, SchemeOptions};
pub use error::BackendError;
pub use layout::{DEFAULT_PATTERN, Event, LayoutOptions, Location, PatternLayout};
pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use mdc::Mdc;
pub use syslog::{SyslogFacility, SyslogOptions, SyslogPriority};
