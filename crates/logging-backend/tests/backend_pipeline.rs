//! Integration tests for the backend registries.
//!
//! These tests drive a logger end to end: scheme registration, layout
//! resolution, appender attachment and rendering into a file.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use logging_backend::{
    Appender, AppenderKind, Backend, Color, LayoutOptions, Level, SchemeOptions,
};

/// Verifies a registered scheme colors the lines written through a logger.
#[test]
fn colored_lines_reach_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("colored.log");
    let backend = Backend::new();
    backend
        .color_scheme(
            "alerts",
            SchemeOptions {
                lines: Some(BTreeMap::from([(Level::Error, Color::Red.into())])),
                ..SchemeOptions::default()
            },
        )
        .expect("scheme");
    let layout = backend
        .pattern_layout(&LayoutOptions {
            pattern: Some("%c %m\n".to_string()),
            color_scheme: Some("alerts".to_string()),
        })
        .expect("layout");

    let logger = backend.logger("pipeline");
    logger.add_appender(Arc::new(Appender::file(&path, layout)));
    logger.info("plain");
    logger.error("alarm");

    assert_eq!(
        fs::read_to_string(&path).expect("log"),
        "pipeline plain\n\x1b[31mpipeline alarm\x1b[0m\n"
    );
}

/// Verifies loggers of one backend share its MDC.
#[test]
fn loggers_share_the_backend_mdc() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mdc.log");
    let backend = Backend::new();
    let layout = backend
        .pattern_layout(&LayoutOptions {
            pattern: Some("%X{job} %m\n".to_string()),
            color_scheme: None,
        })
        .expect("layout");
    let first = backend.logger("first");
    let second = backend.logger("second");
    let appender = Arc::new(Appender::file(&path, layout));
    first.add_appender(Arc::clone(&appender));
    second.add_appender(appender);

    backend.mdc().insert("job", "nightly");
    first.warn("one");
    second.warn("two");

    assert!(first.has_appender(AppenderKind::File, &path.to_string_lossy()));
    assert_eq!(
        fs::read_to_string(&path).expect("log"),
        "nightly one\nnightly two\n"
    );
}
