//! Controller configuration loading.
//!
//! Thin layer over `rig_common::controller::config`: reads the TOML file,
//! validates it and applies command-line overrides.

use rig_common::config::{ConfigError, ConfigLoader};
use rig_common::controller::config::ControllerConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load and validate the controller configuration file.
///
/// Does not log; report the result with [`log_loaded`] once tracing is set up.
///
/// # Errors
/// Any `ConfigError` from loading or validation.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let config = ControllerConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Report a loaded configuration.
pub fn log_loaded(config: &ControllerConfig, path: &Path) {
    info!(
        "Loaded configuration '{}' from {} (log level {})",
        config.shared.service_name,
        path.display(),
        config.shared.log_level.as_directive()
    );
}

/// Command-line values that replace configuration entries.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `[telemetry] path`.
    pub telemetry_path: Option<PathBuf>,
    /// Replaces `[driver] name`.
    pub driver: Option<String>,
}

impl Overrides {
    /// Apply the overrides and re-validate.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` if an override produced an invalid value.
    pub fn apply(self, mut config: ControllerConfig) -> Result<ControllerConfig, ConfigError> {
        if let Some(path) = self.telemetry_path {
            info!("Telemetry channel overridden: {}", path.display());
            config.telemetry.path = path;
        }
        if let Some(driver) = self.driver {
            info!("Actuator driver overridden: {}", driver);
            config.driver.name = driver;
        }
        config.validate()?;
        Ok(config)
    }
}
