use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{debug, info};

use super::defaults::ClientConfig;

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads the client configuration from `path`, layered under `OBC_*` environment variables.
///
/// A commented default file is written first if `path` does not exist.
/// Nested keys use a double underscore, e.g. `OBC_ENROLLMENT__ENROLL_ID`.
pub fn load_configuration(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix("OBC").prefix_separator("_").separator("__"))
        .build()
        .context("Could not build config")?;

    let client_config: ClientConfig = cfg.try_deserialize().context("Invalid client configuration")?;
    debug!(
        server = client_config.server().as_str(),
        tls = client_config.tls,
        security = client_config.security_enabled();
        "Configuration loaded"
    );
    Ok(client_config)
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    Ok(())
}
