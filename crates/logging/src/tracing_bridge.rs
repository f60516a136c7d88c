//! crates/logging/src/tracing_bridge.rs
//! Bridge from the `tracing` crate into a facade logger.
//!
//! [`FacadeLayer`] is a `tracing-subscriber` layer that forwards every event
//! to a facade [`Logger`], so code instrumented with `tracing` macros ends up
//! on the logger's outputs.
//!
//! | tracing level | facade level |
//! |---------------|--------------|
//! | `ERROR` | `error` |
//! | `WARN` | `warn` |
//! | `INFO` | `info` |
//! | `DEBUG`, `TRACE` | `debug` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logging::{FacadeLayer, Logger, LoggerOptions};
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! let logger = Arc::new(Logger::new("app", LoggerOptions::new().output("console"))?);
//! tracing_subscriber::registry().with(FacadeLayer::new(logger)).init();
//! tracing::info!("forwarded");
//! ```

use std::sync::Arc;

use logging_backend::{Level, Location};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};

use crate::logger::Logger;

const INTERNAL_TARGETS: [&str; 2] = ["logging::", "logging_backend::"];

/// A tracing layer that records events on a facade logger.
pub struct FacadeLayer {
    logger: Arc<Logger>,
}

impl FacadeLayer {
    /// Creates a layer forwarding to `logger`.
    #[must_use]
    pub const fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Returns the logger events are forwarded to.
    pub const fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }
}

impl<S> Layer<S> for FacadeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Diagnostics about writing to the outputs must not loop back into them.
        if INTERNAL_TARGETS
            .iter()
            .any(|prefix| metadata.target().starts_with(prefix))
        {
            return;
        }
        let level = Self::map_level(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else {
            return;
        };

        let location = metadata.file().map(|file| Location {
            file,
            line: metadata.line().unwrap_or_default(),
            method: None,
        });
        self.logger.log_at(level, &message, location);
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}
