//! crates/logging/src/outputs/syslog.rs

use logging_backend::syslog;
use logging_backend::{Appender, PatternLayout, SyslogFacility, SyslogOptions};

use super::{SinkData, SinkKind};
use crate::error::Result;

/// Syslog output fields.
///
/// Defaults to the `PID | CONS` options and the `LOCAL0` facility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyslogSink {
    identity: Option<String>,
    log_opts: SyslogOptions,
    facility: SyslogFacility,
}

impl Default for SyslogSink {
    fn default() -> Self {
        Self {
            identity: None,
            log_opts: SyslogOptions::PID | SyslogOptions::CONS,
            facility: SyslogFacility::Local0,
        }
    }
}

impl SinkKind for SyslogSink {
    const NAME: &'static str = "syslog";

    /// The process holds one syslog connection; an open one is closed first.
    fn open_appender(data: &SinkData<Self>, layout: PatternLayout) -> Result<Appender> {
        if syslog::is_open() {
            tracing::debug!(target: "logging::outputs", "closing open syslog connection");
            syslog::close();
        }
        Ok(Appender::syslog(
            data.identity(),
            data.log_opts(),
            data.facility(),
            layout,
        ))
    }
}

impl SinkData<SyslogSink> {
    /// Returns the syslog identity.
    pub fn identity(&self) -> Option<&str> {
        self.fields().identity.as_deref()
    }

    /// Sets the syslog identity.
    pub fn set_identity(&mut self, identity: impl Into<String>) -> &mut Self {
        self.fields_mut().identity = Some(identity.into());
        self
    }

    /// Returns the `openlog` options.
    pub fn log_opts(&self) -> SyslogOptions {
        self.fields().log_opts
    }

    /// Sets the `openlog` options.
    pub fn set_log_opts(&mut self, log_opts: SyslogOptions) -> &mut Self {
        self.fields_mut().log_opts = log_opts;
        self
    }

    /// Returns the facility.
    pub fn facility(&self) -> SyslogFacility {
        self.fields().facility
    }

    /// Sets the facility.
    pub fn set_facility(&mut self, facility: SyslogFacility) -> &mut Self {
        self.fields_mut().facility = facility;
        self
    }
}

#[cfg(test)]
mod tests {
    use logging_backend::AppenderKind;
    use serial_test::serial;

    use super::*;
    use crate::settings::Settings;

    #[test]
    fn defaults_to_pid_cons_and_local0() {
        let data = SinkData::<SyslogSink>::new();
        assert!(data.identity().is_none());
        assert_eq!(data.log_opts(), SyslogOptions::PID | SyslogOptions::CONS);
        assert_eq!(data.facility(), SyslogFacility::Local0);
    }

    #[test]
    #[serial(syslog)]
    fn replaces_an_open_connection() {
        let settings = Settings::<()>::new();
        syslog::open(Some("previous"), SyslogOptions::NONE, SyslogFacility::User);
        assert!(syslog::is_open());

        let mut data = SinkData::<SyslogSink>::new();
        data.set_identity("logging-test")
            .set_facility(SyslogFacility::Local3);
        let appender = data.to_appender(&(), &settings).expect("appender");

        assert_eq!(appender.kind(), AppenderKind::Syslog);
        assert_eq!(appender.name(), "logging-test");
        let connection = syslog::connection().expect("open connection");
        assert_eq!(connection.identity.as_deref(), Some("logging-test"));
        assert_eq!(connection.facility, SyslogFacility::Local3);

        syslog::close();
        assert!(!syslog::is_open());
    }
}
