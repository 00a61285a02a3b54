use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Layered defaults for a split run; command-line flags win over these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Output file name prefix
    pub prefix: String,

    /// Width of the zero-padded numeric suffix
    pub digits: u64,

    /// Keep partial output when a run fails
    pub keep: bool,

    /// Suppress section size reports
    pub silent: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self { prefix: "xx".to_string(), digits: 2, keep: false, silent: false }
    }
}

/// Config files probed in the working directory, first match wins.
const CONFIG_PATHS: [&str; 2] = ["csplit.toml", ".csplit.toml"];

pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Load configuration relative to `dir`: defaults, then the first config
/// file found, then `CSPLIT_*` environment variables.
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_PATHS
    {
        let path = dir.join(name);
        if path.exists()
        {
            builder = builder.add_source(
                config::File::with_name(&path.to_string_lossy()).format(config::FileFormat::Toml),
            );
            break;
        }
    }

    // Add environment variables with CSPLIT_ prefix
    builder = builder.add_source(config::Environment::with_prefix("CSPLIT").try_parsing(true));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}
