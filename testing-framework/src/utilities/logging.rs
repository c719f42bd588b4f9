// File: testing-framework/src/utilities/logging.rs

/// Initializes env_logger for a test binary
///
/// Honors `RUST_LOG` and defaults to `info`. Safe to call from every test:
/// only the first call installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .format_timestamp_millis()
        .try_init();
}
