use log::{info, LevelFilter};

// Logging bootstrap shared across crates

/// Maps a `LOG_LEVEL` style string onto a filter, defaulting to `Info`.
pub fn parse_level_filter(level: &str) -> LevelFilter {
    match level.trim().to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the global `env_logger` at the given level.
///
/// `RUST_LOG` directives are still honoured on top of the base level.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(level: &str) {
    let initialized = env_logger::Builder::from_default_env()
        .filter_level(parse_level_filter(level))
        .try_init()
        .is_ok();

    if initialized {
        info!("Logging initialized with level: {}", level);
    }
}
