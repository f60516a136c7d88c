//! crates/logging/src/outputs/file.rs

use std::path::{Path, PathBuf};

use logging_backend::{Appender, PatternLayout};

use super::{SinkData, SinkKind};
use crate::error::{Error, Result};

/// File output fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSink {
    path: Option<PathBuf>,
}

impl SinkKind for FileSink {
    const NAME: &'static str = "file";

    fn open_appender(data: &SinkData<Self>, layout: PatternLayout) -> Result<Appender> {
        let path = data.path().ok_or(Error::MissingField {
            kind: Self::NAME,
            field: "path",
        })?;
        Ok(Appender::file(path, layout))
    }
}

impl SinkData<FileSink> {
    /// Returns the file path.
    pub fn path(&self) -> Option<&Path> {
        self.fields().path.as_deref()
    }

    /// Sets the file path.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.fields_mut().path = Some(path.into());
        self
    }
}
