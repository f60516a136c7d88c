//! crates/logging-backend/src/appender.rs
//! Console, file and syslog destinations for rendered events.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::BackendError;
use crate::layout::{Event, PatternLayout};
use crate::mdc::Mdc;
use crate::syslog::{self, SyslogFacility, SyslogOptions, SyslogPriority};

/// Name given to console appenders.
pub const STDOUT_NAME: &str = "stdout";
/// Name given to syslog appenders opened without an identity.
pub const SYSLOG_NAME: &str = "syslog";

/// The backend class of an appender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppenderKind {
    /// Writes to standard output.
    Stdout,
    /// Appends to a file.
    File,
    /// Sends to the process-wide syslog connection.
    Syslog,
}

impl AppenderKind {
    /// Returns the lowercase kind name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::File => "file",
            Self::Syslog => "syslog",
        }
    }
}

impl fmt::Display for AppenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Target {
    Stdout,
    File {
        path: PathBuf,
        handle: Option<File>,
    },
    Syslog,
}

/// A destination for rendered events.
///
/// Appenders are identified by their [`AppenderKind`] and name: the name of a
/// file appender is its path and the name of a syslog appender is its
/// identity.
pub struct Appender {
    name: String,
    kind: AppenderKind,
    layout: PatternLayout,
    target: Mutex<Target>,
}

impl Appender {
    /// Creates a console appender.
    pub fn stdout(layout: PatternLayout) -> Self {
        Self {
            name: STDOUT_NAME.to_string(),
            kind: AppenderKind::Stdout,
            layout,
            target: Mutex::new(Target::Stdout),
        }
    }

    /// Creates a file appender for `path`.
    ///
    /// The file is opened in append mode on the first write; missing parent
    /// directories are created then.
    pub fn file(path: impl Into<PathBuf>, layout: PatternLayout) -> Self {
        let path = path.into();
        Self {
            name: path.to_string_lossy().into_owned(),
            kind: AppenderKind::File,
            layout,
            target: Mutex::new(Target::File { path, handle: None }),
        }
    }

    /// Creates a syslog appender and opens the process-wide connection.
    ///
    /// Any connection that is already open is replaced.
    pub fn syslog(
        identity: Option<&str>,
        options: SyslogOptions,
        facility: SyslogFacility,
        layout: PatternLayout,
    ) -> Self {
        syslog::open(identity, options, facility);
        Self {
            name: identity.unwrap_or(SYSLOG_NAME).to_string(),
            kind: AppenderKind::Syslog,
            layout,
            target: Mutex::new(Target::Syslog),
        }
    }

    /// Returns the appender name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the backend class.
    pub const fn kind(&self) -> AppenderKind {
        self.kind
    }

    /// Returns the layout events are rendered with.
    pub const fn layout(&self) -> &PatternLayout {
        &self.layout
    }

    /// Reports whether this appender has the given class and name.
    pub fn matches(&self, kind: AppenderKind, name: &str) -> bool {
        self.kind == kind && self.name == name
    }

    /// Renders `event` and writes it to the destination.
    pub fn append(&self, event: &Event<'_>, mdc: &Mdc) -> Result<(), BackendError> {
        let rendered = self.layout.format(event, mdc);
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);

        match &mut *target {
            Target::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(rendered.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| BackendError::io(STDOUT_NAME, e))
            }
            Target::File { path, handle } => {
                if handle.is_none() {
                    *handle = Some(open_append(path).map_err(|e| BackendError::io(&*path, e))?);
                }
                match handle.as_mut() {
                    Some(file) => file
                        .write_all(rendered.as_bytes())
                        .map_err(|e| BackendError::io(&*path, e)),
                    None => Ok(()),
                }
            }
            Target::Syslog => {
                syslog::send(SyslogPriority::from(event.level), rendered.trim_end());
                Ok(())
            }
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl fmt::Debug for Appender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Appender")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("layout", &self.layout.pattern())
            .finish_non_exhaustive()
    }
}
