//! crates/logging/src/outputs/stdout.rs

use logging_backend::{Appender, PatternLayout};

use super::{SinkData, SinkKind};
use crate::error::Result;

/// Console output. It has no fields of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdoutSink;

impl SinkKind for StdoutSink {
    const NAME: &'static str = "stdout";

    fn open_appender(_data: &SinkData<Self>, layout: PatternLayout) -> Result<Appender> {
        Ok(Appender::stdout(layout))
    }
}
