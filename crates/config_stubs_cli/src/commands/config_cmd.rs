use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create a configuration file holding the default values
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check the configuration file
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command
#[instrument]
pub async fn execute(cmd: &ConfigCommands) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
    }
}

/// Initialize a new configuration file
#[instrument]
fn init_config(path: Option<&str>) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(&config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file
///
/// Checks the TOML syntax and every option the stub pipeline parses, such
/// as glob patterns and the navigation path.
#[instrument]
fn validate_config(path: Option<&str>) -> Result<(), Error> {
    let config_path = get_config_path(path);
    debug!(message = "Validating configuration", path = ?config_path);

    let config = AppConfig::load(&config_path)?;
    match config.stubs.validate() {
        Ok(validated) => {
            info!(message = "Configuration is valid", path = ?config_path);
            println!("Configuration is valid");
            println!(
                "Stub pages will be placed under '{}' in the navigation section '{}'",
                validated.placement.url_prefix().join("/"),
                validated.placement.nav_path().join(" > ")
            );
            Ok(())
        }
        Err(e) => {
            error!(
                message = "Configuration is invalid",
                path = ?config_path,
                error = ?e
            );
            Err(Error::Config(e.to_string()))
        }
    }
}
