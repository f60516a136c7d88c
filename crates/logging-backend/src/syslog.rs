//! Process-wide syslog connection used by syslog appenders.
//!
//! syslog(3) keeps one connection per process: `openlog` replaces the ident,
//! options and facility of any previous call. This module tracks whether a
//! connection is open so callers reconfiguring syslog can close before they
//! open. `open` and `close` are not atomic as a pair; concurrent reconfiguration
//! must be serialized by the caller.
//!
//! On non-unix targets the state is tracked but no messages are delivered.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::{Mutex, PoisonError};

use crate::level::Level;

/// Syslog facility codes matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum SyslogFacility {
    /// Kernel messages (LOG_KERN).
    Kern = 0,
    /// User-level messages (LOG_USER).
    User = 1 << 3,
    /// Mail system (LOG_MAIL).
    Mail = 2 << 3,
    /// System daemons (LOG_DAEMON).
    Daemon = 3 << 3,
    /// Security/authorization messages (LOG_AUTH).
    Auth = 4 << 3,
    /// Messages generated internally by syslogd (LOG_SYSLOG).
    Syslog = 5 << 3,
    /// Line printer subsystem (LOG_LPR).
    Lpr = 6 << 3,
    /// Network news subsystem (LOG_NEWS).
    News = 7 << 3,
    /// UUCP subsystem (LOG_UUCP).
    Uucp = 8 << 3,
    /// Clock daemon (LOG_CRON).
    Cron = 9 << 3,
    /// Reserved for local use (LOG_LOCAL0), the appender default.
    #[default]
    Local0 = 16 << 3,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = 17 << 3,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = 18 << 3,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = 19 << 3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = 20 << 3,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = 21 << 3,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = 22 << 3,
    /// Reserved for local use (LOG_LOCAL7).
    Local7 = 23 << 3,
}

impl SyslogFacility {
    /// Parses a facility name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_backend::syslog::SyslogFacility;
    ///
    /// assert_eq!(SyslogFacility::from_name("LOCAL3"), Some(SyslogFacility::Local3));
    /// assert_eq!(SyslogFacility::from_name("unknown"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kern" => Some(Self::Kern),
            "user" => Some(Self::User),
            "mail" => Some(Self::Mail),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "syslog" => Some(Self::Syslog),
            "lpr" => Some(Self::Lpr),
            "news" => Some(Self::News),
            "uucp" => Some(Self::Uucp),
            "cron" => Some(Self::Cron),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// Returns the lowercase facility name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }

    /// Returns the numeric facility code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `openlog(3)` option bitmask.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SyslogOptions(i32);

impl SyslogOptions {
    /// No options.
    pub const NONE: Self = Self(0);
    /// Include the PID with each message (LOG_PID).
    pub const PID: Self = Self(0x01);
    /// Write to the console if the logger is unavailable (LOG_CONS).
    pub const CONS: Self = Self(0x02);
    /// Delay opening the connection until the first message (LOG_ODELAY).
    pub const ODELAY: Self = Self(0x04);
    /// Open the connection immediately (LOG_NDELAY).
    pub const NDELAY: Self = Self(0x08);
    /// Don't wait for child processes (LOG_NOWAIT).
    pub const NOWAIT: Self = Self(0x10);
    /// Also log to stderr (LOG_PERROR).
    pub const PERROR: Self = Self(0x20);

    /// Builds options from a raw bitmask.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> i32 {
        self.0
    }

    /// Reports whether every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for SyslogOptions {
    fn default() -> Self {
        Self::PID | Self::CONS
    }
}

impl BitOr for SyslogOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SyslogOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Syslog priority levels matching POSIX syslog(3) severity constants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    /// System is unusable (LOG_EMERG).
    Emergency = 0,
    /// Action must be taken immediately (LOG_ALERT).
    Alert = 1,
    /// Critical conditions (LOG_CRIT).
    Critical = 2,
    /// Error conditions (LOG_ERR).
    Error = 3,
    /// Warning conditions (LOG_WARNING).
    Warning = 4,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = 5,
    /// Informational messages (LOG_INFO).
    Info = 6,
    /// Debug-level messages (LOG_DEBUG).
    Debug = 7,
}

impl From<Level> for SyslogPriority {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => Self::Debug,
            Level::Info => Self::Info,
            Level::Warn => Self::Warning,
            Level::Error => Self::Error,
            Level::Fatal => Self::Critical,
            Level::Any => Self::Alert,
        }
    }
}

/// Parameters of the currently open connection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connection {
    /// Ident passed to `openlog`, `None` for the program name.
    pub identity: Option<String>,
    /// Option bitmask passed to `openlog`.
    pub options: SyslogOptions,
    /// Facility passed to `openlog`.
    pub facility: SyslogFacility,
}

struct OpenState {
    connection: Connection,
    // syslog(3) keeps the ident pointer until the next openlog/closelog.
    #[cfg(unix)]
    _ident: Option<std::ffi::CString>,
}

static STATE: Mutex<Option<OpenState>> = Mutex::new(None);

/// Reports whether a syslog connection is open.
pub fn is_open() -> bool {
    STATE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Returns the parameters of the open connection.
pub fn connection() -> Option<Connection> {
    STATE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|state| state.connection.clone())
}

/// Opens the process-wide connection, replacing any open one.
///
/// Identities containing NUL bytes fall back to the program name.
pub fn open(identity: Option<&str>, options: SyslogOptions, facility: SyslogFacility) {
    let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);

    #[cfg(unix)]
    let ident = identity.and_then(|id| std::ffi::CString::new(id).ok());

    // SAFETY: the ident pointer, when present, is kept alive in STATE until
    // the next open or close, which is as long as syslog(3) may read it.
    #[cfg(unix)]
    unsafe {
        let ptr = ident.as_ref().map_or(std::ptr::null(), |s| s.as_ptr());
        libc::openlog(ptr, options.bits(), facility.code());
    }

    *state = Some(OpenState {
        connection: Connection {
            identity: identity.map(str::to_string),
            options,
            facility,
        },
        #[cfg(unix)]
        _ident: ident,
    });
    tracing::debug!(target: "logging_backend::syslog", ?identity, %facility, "opened syslog");
}

/// Closes the process-wide connection if one is open.
pub fn close() {
    let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    if state.take().is_some() {
        // SAFETY: closelog has no preconditions beyond a prior openlog,
        // which the presence of the state guarantees.
        #[cfg(unix)]
        unsafe {
            libc::closelog();
        }
        tracing::debug!(target: "logging_backend::syslog", "closed syslog");
    }
}

/// Sends `message` at `priority` over the open connection.
///
/// Messages sent while no connection is open, or containing NUL bytes, are
/// dropped.
pub fn send(priority: SyslogPriority, message: &str) {
    let state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    if state.is_none() {
        return;
    }

    #[cfg(unix)]
    {
        let Ok(c_message) = std::ffi::CString::new(message) else {
            return;
        };
        // syslog(3) interprets `%` in the format; pass the message as an argument.
        // SAFETY: the format and message are valid NUL-terminated C strings and
        // the connection is open while STATE is held.
        unsafe {
            libc::syslog(priority as libc::c_int, c"%s".as_ptr(), c_message.as_ptr());
        }
    }
    #[cfg(not(unix))]
    let _ = (priority, message);
}
