use error_stack::{Report, ResultExt};
use log::LevelFilter;

use crate::error::NetworkConfigError;

/// Initialize logging for the application.
/// Should be called once at startup; later calls return an error.
///
/// # Errors
///
/// Returns [`NetworkConfigError::Configuration`] if a logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), Report<NetworkConfigError>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} [{}] {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .change_context(NetworkConfigError::Configuration {
            message: "Failed to initialize logger".to_string(),
        })
}

/// Log level helper to determine if debug logging is enabled
#[must_use]
pub fn is_debug_enabled() -> bool {
    log::log_enabled!(log::Level::Debug)
}
