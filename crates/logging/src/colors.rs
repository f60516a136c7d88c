//! crates/logging/src/colors.rs
//! Named color definitions compiled into backend color schemes.
//!
//! A [`Colors`] definition is a builder closure. It runs against a fresh
//! [`ColorsData`] every time a sink that references it is materialized, so the
//! closure can look at the logger being built and pick colors accordingly.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use logging_backend::{Backend, ColorSpec, Level, Property, SchemeOptions};

use crate::error::{Error, Result};
use crate::token::ContextToken;

type ColorsBuild<C> = Arc<dyn Fn(&mut ColorsData, &C) + Send + Sync>;

/// Property, level and line colors collected by a [`Colors`] builder.
///
/// Only keys that were set reach the compiled scheme. Setting per-level and
/// per-line colors in the same definition is rejected when it is compiled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorsData {
    properties: BTreeMap<Property, ColorSpec>,
    levels: BTreeMap<Level, ColorSpec>,
    lines: BTreeMap<Level, ColorSpec>,
}

macro_rules! property_setters {
    ($($setter:ident => $property:ident),* $(,)?) => {
        $(
            #[doc = concat!("Colors the `", stringify!($property), "` property.")]
            pub fn $setter(&mut self, spec: impl Into<ColorSpec>) -> &mut Self {
                self.set_property(Property::$property, spec)
            }
        )*
    };
}

macro_rules! level_setters {
    ($($level_setter:ident, $line_setter:ident => $level:ident),* $(,)?) => {
        $(
            #[doc = concat!("Colors the level label of `", stringify!($level), "` events.")]
            pub fn $level_setter(&mut self, spec: impl Into<ColorSpec>) -> &mut Self {
                self.set_level(Level::$level, spec)
            }

            #[doc = concat!("Colors whole `", stringify!($level), "` lines.")]
            pub fn $line_setter(&mut self, spec: impl Into<ColorSpec>) -> &mut Self {
                self.set_line(Level::$level, spec)
            }
        )*
    };
}

impl ColorsData {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the color of a pattern property.
    pub fn set_property(&mut self, property: Property, spec: impl Into<ColorSpec>) -> &mut Self {
        self.properties.insert(property, spec.into());
        self
    }

    /// Sets the color of the level label for `level`.
    pub fn set_level(&mut self, level: Level, spec: impl Into<ColorSpec>) -> &mut Self {
        self.levels.insert(level, spec.into());
        self
    }

    /// Sets the color of whole lines logged at `level`.
    pub fn set_line(&mut self, level: Level, spec: impl Into<ColorSpec>) -> &mut Self {
        self.lines.insert(level, spec.into());
        self
    }

    property_setters! {
        logger => Logger,
        date => Date,
        message => Message,
        time => Time,
        pid => Pid,
        thread => Thread,
        thread_id => ThreadId,
        file => File,
        line => Line,
        method => Method,
    }

    level_setters! {
        debug, debug_line => Debug,
        info, info_line => Info,
        warn, warn_line => Warn,
        error, error_line => Error,
        fatal, fatal_line => Fatal,
    }

    /// Returns the color set for `property`.
    pub fn property_color(&self, property: Property) -> Option<&ColorSpec> {
        self.properties.get(&property)
    }

    /// Returns the label color set for `level`.
    pub fn level_color(&self, level: Level) -> Option<&ColorSpec> {
        self.levels.get(&level)
    }

    /// Returns the line color set for `level`.
    pub fn line_color(&self, level: Level) -> Option<&ColorSpec> {
        self.lines.get(&level)
    }

    /// Converts the collected colors into backend scheme options.
    ///
    /// `levels` and `lines` are present only when at least one entry was set.
    pub fn to_scheme_options(&self) -> SchemeOptions {
        SchemeOptions {
            properties: self.properties.clone(),
            levels: (!self.levels.is_empty()).then(|| self.levels.clone()),
            lines: (!self.lines.is_empty()).then(|| self.lines.clone()),
        }
    }
}

/// A named color definition.
///
/// `C` is the context the builder receives, normally the facade
/// [`Logger`](crate::Logger) being constructed.
pub struct Colors<C> {
    name: String,
    build: ColorsBuild<C>,
}

impl<C> Colors<C> {
    /// Creates a definition from a builder closure.
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&mut ColorsData, &C) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    /// Returns the definition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the builder against `context` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColorConflict`] when the builder set both level and
    /// line colors.
    pub fn data(&self, context: &C) -> Result<ColorsData> {
        let mut data = ColorsData::new();
        (self.build)(&mut data, context);
        if !data.levels.is_empty() && !data.lines.is_empty() {
            return Err(Error::ColorConflict {
                scheme: self.name.clone(),
            });
        }
        Ok(data)
    }

    /// Compiles the definition for one materialization and registers it.
    ///
    /// The scheme is registered under `"{name}-{token}"`; that name is
    /// returned.
    ///
    /// # Errors
    ///
    /// Fails when the builder output is invalid or the backend rejects it.
    pub fn to_scheme(&self, context: &C, token: ContextToken, backend: &Backend) -> Result<String> {
        let options = self.data(context)?.to_scheme_options();
        let scheme_name = format!("{}-{token}", self.name);
        backend.color_scheme(scheme_name.as_str(), options)?;
        tracing::trace!(
            target: "logging::colors",
            colors = %self.name,
            scheme = %scheme_name,
            "registered color scheme"
        );
        Ok(scheme_name)
    }
}

impl<C> Clone for Colors<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            build: Arc::clone(&self.build),
        }
    }
}

impl<C> fmt::Debug for Colors<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colors")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Result of a color lookup: a registered definition or the null definition.
///
/// The null definition compiles to no scheme at all.
pub enum ColorsDefinition<C> {
    /// No definition is registered under the requested name.
    Null,
    /// A registered definition.
    Defined(Arc<Colors<C>>),
}

impl<C> ColorsDefinition<C> {
    /// Reports whether this is the null definition.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the registered definition, if any.
    pub fn colors(&self) -> Option<&Arc<Colors<C>>> {
        match self {
            Self::Null => None,
            Self::Defined(colors) => Some(colors),
        }
    }

    /// Compiles and registers the scheme, returning its name.
    ///
    /// The null definition registers nothing and returns `None`.
    ///
    /// # Errors
    ///
    /// See [`Colors::to_scheme`].
    pub fn to_scheme(
        &self,
        context: &C,
        token: ContextToken,
        backend: &Backend,
    ) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::Defined(colors) => colors.to_scheme(context, token, backend).map(Some),
        }
    }
}

impl<C> Clone for ColorsDefinition<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Defined(colors) => Self::Defined(Arc::clone(colors)),
        }
    }
}

impl<C> fmt::Debug for ColorsDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NullColors"),
            Self::Defined(colors) => fmt::Debug::fmt(colors, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use logging_backend::Color;

    use super::*;

    #[test]
    fn levels_only_definition_has_no_lines() {
        let colors = Colors::<()>::new("levels", |c, ()| {
            c.debug(Color::Blue).info(Color::Green);
        });
        let options = colors.data(&()).expect("valid").to_scheme_options();

        assert!(options.lines.is_none());
        let levels = options.levels.expect("levels");
        assert_eq!(levels.len(), 2);
        assert_eq!(levels.get(&Level::Debug), Some(&ColorSpec::from(Color::Blue)));
    }

    #[test]
    fn property_only_definition_has_neither_levels_nor_lines() {
        let colors = Colors::<()>::new("props", |c, ()| {
            c.date(Color::Blue).message([Color::White, Color::OnRed]);
        });
        let data = colors.data(&()).expect("valid");
        let options = data.to_scheme_options();

        assert!(options.levels.is_none());
        assert!(options.lines.is_none());
        assert_eq!(
            data.property_color(Property::Message),
            Some(&ColorSpec::new([Color::White, Color::OnRed]))
        );
    }

    #[test]
    fn mixing_levels_and_lines_is_rejected() {
        let colors = Colors::<()>::new("mixed", |c, ()| {
            c.debug(Color::Blue).error_line(Color::Red);
        });
        let err = colors.data(&()).unwrap_err();
        assert!(matches!(err, Error::ColorConflict { ref scheme } if scheme == "mixed"));
    }

    #[test]
    fn builder_sees_the_context() {
        let colors = Colors::<bool>::new("ctx", |c, loud| {
            if *loud {
                c.set_line(Level::Warn, Color::Yellow);
            }
        });
        assert!(colors.data(&false).expect("valid").line_color(Level::Warn).is_none());
        assert!(colors.data(&true).expect("valid").line_color(Level::Warn).is_some());
    }

    #[test]
    fn to_scheme_registers_a_name_per_token() {
        let backend = Backend::new();
        let colors = Colors::<()>::new("sunset", |c, ()| {
            c.warn(Color::Yellow);
        });

        let first = colors
            .to_scheme(&(), ContextToken::next(), &backend)
            .expect("registered");
        let second = colors
            .to_scheme(&(), ContextToken::next(), &backend)
            .expect("registered");

        assert_ne!(first, second);
        assert!(first.starts_with("sunset-"));
        assert!(backend.find_color_scheme(&first).is_some());
        assert!(backend.find_color_scheme(&second).is_some());
    }

    #[test]
    fn null_definition_compiles_to_nothing() {
        let backend = Backend::new();
        let null = ColorsDefinition::<()>::Null;
        assert!(null.is_null());
        assert!(null.colors().is_none());
        let scheme = null
            .to_scheme(&(), ContextToken::next(), &backend)
            .expect("no-op");
        assert!(scheme.is_none());
    }
}
