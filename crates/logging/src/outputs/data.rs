//! crates/logging/src/outputs/data.rs
//! Values collected by one evaluation of an output builder.

use logging_backend::{Appender, DEFAULT_PATTERN, LayoutOptions, Level};

use super::SinkKind;
use crate::error::Result;
use crate::settings::Settings;
use crate::token::ContextToken;

/// The result of evaluating an output builder once.
///
/// Holds the fields every output kind shares plus the kind-specific fields
/// `K`. Each instance carries its own [`ContextToken`], which names the color
/// scheme compiled for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkData<K> {
    pattern: String,
    colors: Option<String>,
    level: Option<Level>,
    token: ContextToken,
    fields: K,
}

impl<K: SinkKind> SinkData<K> {
    /// Creates defaults: pattern `"%m\n"`, no colors, no level.
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            colors: None,
            level: None,
            token: ContextToken::next(),
            fields: K::default(),
        }
    }

    /// Builds the layout options for this evaluation.
    ///
    /// The color definition named by [`colors`](Self::colors) is compiled
    /// against `context` and registered with the settings' backend; unknown
    /// names leave the layout uncolored.
    ///
    /// # Errors
    ///
    /// Fails when the color definition is invalid.
    pub fn to_layout_options<C>(&self, context: &C, settings: &Settings<C>) -> Result<LayoutOptions> {
        let color_scheme = match &self.colors {
            Some(name) => settings
                .find_colors(name)
                .to_scheme(context, self.token, settings.backend())?,
            None => None,
        };
        Ok(LayoutOptions {
            pattern: Some(self.pattern.clone()),
            color_scheme,
        })
    }

    /// Builds the backend appender for this evaluation.
    ///
    /// # Errors
    ///
    /// Fails when the layout cannot be built or the kind cannot produce an
    /// appender.
    pub fn to_appender<C>(&self, context: &C, settings: &Settings<C>) -> Result<Appender> {
        let options = self.to_layout_options(context, settings)?;
        let backend = settings.backend();
        let layout = backend.pattern_layout(&options)?;
        let scheme = layout.color_scheme().map(|scheme| scheme.name().to_string());
        K::open_appender(self, layout).inspect_err(|_| {
            if let Some(name) = &scheme {
                backend.remove_color_scheme(name);
            }
        })
    }
}

impl<K: SinkKind> Default for SinkData<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SinkData<K> {
    /// Returns the layout pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Sets the layout pattern.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = pattern.into();
        self
    }

    /// Returns the name of the referenced color definition.
    pub fn colors(&self) -> Option<&str> {
        self.colors.as_deref()
    }

    /// References a color definition by name.
    pub fn set_colors(&mut self, name: impl Into<String>) -> &mut Self {
        self.colors = Some(name.into());
        self
    }

    /// Returns the output-specific level, if one was set.
    pub const fn level(&self) -> Option<Level> {
        self.level
    }

    /// Sets an output-specific level that overrides the logger's level.
    pub fn set_level(&mut self, level: Level) -> &mut Self {
        self.level = Some(level);
        self
    }

    /// Returns the token of this evaluation.
    pub const fn token(&self) -> ContextToken {
        self.token
    }

    /// Returns the kind-specific fields.
    pub const fn fields(&self) -> &K {
        &self.fields
    }

    pub(super) fn fields_mut(&mut self) -> &mut K {
        &mut self.fields
    }
}
