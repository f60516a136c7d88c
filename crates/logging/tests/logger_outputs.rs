//! Integration tests for attaching outputs to facade loggers.
//!
//! These tests verify how a logger resolves its output names: duplicate
//! collapsing, unknown names, level precedence and the aggregated severity
//! predicates.

use std::fs;

use logging::{AppenderKind, Level, Logger, LoggerOptions, Settings};

fn registered() -> Settings {
    let settings: Settings = Settings::new();
    settings.stdout("my_stdout", |_, _| {});
    settings.file("my_file", |data, logger| {
        data.set_path(format!("log/development-{}.log", logger.log_type()));
    });
    settings.file("my_other_file", |data, _| {
        data.set_path("log/other.log");
    });
    settings
}

// ============================================================================
// Output Resolution Tests
// ============================================================================

/// Verifies repeated output names attach a single appender.
#[test]
fn duplicate_outputs_collapse() {
    let settings = registered();
    let logger = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["my_stdout", "my_stdout", "my_file", "my_other_file"]),
    )
    .expect("logger");

    assert_eq!(logger.outputs(), ["my_stdout", "my_file", "my_other_file"]);
    assert_eq!(logger.output_loggers().len(), 3);
    assert_eq!(logger.appenders().len(), 3);
}

/// Verifies unregistered output names are skipped without error.
#[test]
fn unknown_outputs_are_skipped() {
    let settings = registered();
    let logger = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["my_stdout", "undefined"]),
    )
    .expect("logger");

    assert_eq!(logger.appenders().len(), 1);
    assert!(logger.output_logger("my_stdout").is_some());
    assert!(logger.output_logger("undefined").is_none());
}

/// Verifies the file path comes from the first file output.
#[test]
fn file_path_reports_the_configured_path() {
    let settings = registered();
    let logger = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["my_stdout", "my_file", "my_other_file"]),
    )
    .expect("logger");

    assert_eq!(logger.file_path(), Some("log/development-test.log"));
    assert_eq!(logger.file_path(), Some("log/development-test.log"));
}

/// Verifies a logger without file outputs has no file path.
#[test]
fn file_path_is_absent_without_file_outputs() {
    let settings = registered();
    let logger =
        Logger::with_settings(&settings, "test", LoggerOptions::new().output("my_stdout"))
            .expect("logger");

    assert!(logger.file_path().is_none());
    assert!(
        logger
            .appenders()
            .iter()
            .all(|appender| appender.kind() == AppenderKind::Stdout)
    );
}

/// Verifies two outputs naming the same file each get their own delegate.
#[test]
fn outputs_resolving_to_the_same_target_each_get_a_delegate() {
    let settings = registered();
    settings.file("my_file_again", |data, logger| {
        data.set_path(format!("log/development-{}.log", logger.log_type()));
    });
    let logger = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["my_file", "my_file_again"]),
    )
    .expect("logger");

    assert_eq!(logger.output_loggers().len(), 2);
    for (_, delegate) in logger.output_loggers() {
        assert_eq!(delegate.appenders().len(), 1);
    }
}

// ============================================================================
// Level Tests
// ============================================================================

/// Verifies an output level wins over the requested level.
#[test]
fn output_level_beats_requested_level() {
    let settings = registered();
    settings.stdout("my_stdout", |data, _| {
        data.set_level(Level::Debug);
    });
    let logger = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().level(Level::Info).output("my_stdout"),
    )
    .expect("logger");

    let delegate = logger.output_logger("my_stdout").expect("delegate");
    assert_eq!(delegate.level(), Level::Debug);
    assert_eq!(logger.level(), Level::Info);
}

/// Verifies the requested level defaults to info.
#[test]
fn requested_level_defaults_to_info() {
    let settings = registered();
    let logger =
        Logger::with_settings(&settings, "test", LoggerOptions::new().output("my_stdout"))
            .expect("logger");

    assert_eq!(logger.level(), Level::Info);
    let delegate = logger.output_logger("my_stdout").expect("delegate");
    assert_eq!(delegate.level(), Level::Info);
}

/// Verifies severity predicates are true when any output records the level.
#[test]
fn predicates_or_across_outputs() {
    let settings: Settings = Settings::new();
    settings.stdout("debug_out", |data, _| {
        data.set_level(Level::Debug);
    });
    settings.stdout("error_out", |data, _| {
        data.set_level(Level::Error);
    });
    settings.stdout("other_error_out", |data, _| {
        data.set_level(Level::Error);
    });

    let mixed = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["debug_out", "error_out"]),
    )
    .expect("logger");
    assert!(mixed.is_debug());
    assert!(mixed.is_error());

    let strict = Logger::with_settings(
        &settings,
        "test",
        LoggerOptions::new().outputs(["error_out", "other_error_out"]),
    )
    .expect("logger");
    assert!(!strict.is_debug());
    assert!(!strict.is_warn());
    assert!(strict.is_error());
    assert!(strict.is_fatal());
}

/// Verifies a logger without outputs records nothing.
#[test]
fn predicates_are_false_without_outputs() {
    let settings = registered();
    let logger = Logger::with_settings(&settings, "test", LoggerOptions::new()).expect("logger");

    assert!(!logger.is_debug());
    assert!(!logger.is_fatal());
    assert!(!logger.is_unknown());
}

// ============================================================================
// Dispatch Tests
// ============================================================================

/// Verifies every severity call reaches each output that records it.
#[test]
fn severity_calls_fan_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let verbose = dir.path().join("verbose.log");
    let errors = dir.path().join("errors.log");
    let settings: Settings = Settings::new();
    let (verbose_path, errors_path) = (verbose.clone(), errors.clone());
    settings.file("verbose", move |data, _| {
        data.set_path(&verbose_path)
            .set_level(Level::Debug)
            .set_pattern("%l %m\n");
    });
    settings.file("errors", move |data, _| {
        data.set_path(&errors_path)
            .set_level(Level::Error)
            .set_pattern("%l %m\n");
    });

    let logger = Logger::with_settings(
        &settings,
        "jobs",
        LoggerOptions::new().outputs(["verbose", "errors"]),
    )
    .expect("logger");
    logger.debug("d");
    logger.info("i");
    logger.warn("w");
    logger.error("e");
    logger.fatal("f");
    logger.unknown("u");

    assert_eq!(
        fs::read_to_string(&verbose).expect("verbose"),
        "DEBUG d\nINFO i\nWARN w\nERROR e\nFATAL f\nANY u\n"
    );
    assert_eq!(
        fs::read_to_string(&errors).expect("errors"),
        "ERROR e\nFATAL f\nANY u\n"
    );
}

/// Verifies MDC values set through a logger render in every output.
#[test]
fn mdc_values_render_in_patterns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mdc.log");
    let settings: Settings = Settings::new();
    let target = path.clone();
    settings.file("tagged", move |data, _| {
        data.set_path(&target).set_pattern("%X{request_id} %m\n");
    });

    let logger =
        Logger::with_settings(&settings, "web", LoggerOptions::new().output("tagged"))
            .expect("logger");
    logger.mdc("request_id", "r-9");
    logger.info("served");

    assert_eq!(fs::read_to_string(&path).expect("log"), "r-9 served\n");
}

// ============================================================================
// Equality Tests
// ============================================================================

/// Verifies equality compares log type, level and the set of outputs.
#[test]
fn equality_uses_configuration_only() {
    let settings = registered();
    let build = |log_type: &str, options: LoggerOptions| {
        Logger::with_settings(&settings, log_type, options).expect("logger")
    };

    let base = build("test", LoggerOptions::new().outputs(["my_stdout", "my_file"]));
    assert_eq!(
        base,
        build("test", LoggerOptions::new().outputs(["my_file", "my_stdout"]))
    );
    assert_ne!(
        base,
        build("other", LoggerOptions::new().outputs(["my_stdout", "my_file"]))
    );
    assert_ne!(
        base,
        build(
            "test",
            LoggerOptions::new()
                .level(Level::Warn)
                .outputs(["my_stdout", "my_file"])
        )
    );
    assert_ne!(base, build("test", LoggerOptions::new().output("my_stdout")));
}
