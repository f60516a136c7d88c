//! crates/logging/src/options.rs
//! Construction options for facade loggers.

use logging_backend::Level;

/// Level a facade logger requests when none is given.
pub const DEFAULT_LEVEL: Level = Level::Info;

/// Options a facade [`Logger`](crate::Logger) is built from.
///
/// With the `serde` feature, `outputs` also deserializes from a single
/// string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerOptions {
    /// Requested level, [`DEFAULT_LEVEL`] when absent.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub level: Option<Level>,
    /// Output names in attachment order.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "one_or_many"))]
    pub outputs: Vec<String>,
}

impl LoggerOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested level.
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Appends one output name.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Appends several output names.
    #[must_use]
    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// The requested level, falling back to [`DEFAULT_LEVEL`].
    pub fn effective_level(&self) -> Level {
        self.level.unwrap_or(DEFAULT_LEVEL)
    }

    /// Output names with duplicates removed, first occurrence kept.
    pub fn unique_outputs(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::with_capacity(self.outputs.len());
        for name in &self.outputs {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }
        unique
    }
}

impl From<Level> for LoggerOptions {
    fn from(level: Level) -> Self {
        Self::new().level(level)
    }
}

#[cfg(feature = "serde")]
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        match <OneOrMany as serde::Deserialize>::deserialize(deserializer)? {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        assert_eq!(LoggerOptions::new().effective_level(), Level::Info);
        assert_eq!(
            LoggerOptions::from(Level::Warn).effective_level(),
            Level::Warn
        );
    }

    #[test]
    fn duplicates_collapse_in_order() {
        let options = LoggerOptions::new()
            .outputs(["my_stdout", "my_stdout", "my_file"])
            .output("my_other_file")
            .output("my_file");
        assert_eq!(
            options.unique_outputs(),
            vec!["my_stdout", "my_file", "my_other_file"]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_a_single_output() {
        let options: LoggerOptions =
            serde_json::from_str(r#"{"level":"debug","outputs":"my_stdout"}"#).expect("json");
        assert_eq!(options.level, Some(Level::Debug));
        assert_eq!(options.outputs, vec!["my_stdout"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_an_output_list_and_defaults() {
        let options: LoggerOptions =
            serde_json::from_str(r#"{"outputs":["a","b"]}"#).expect("json");
        assert!(options.level.is_none());
        assert_eq!(options.outputs, vec!["a", "b"]);

        let empty: LoggerOptions = serde_json::from_str("{}").expect("json");
        assert_eq!(empty, LoggerOptions::default());
    }
}
