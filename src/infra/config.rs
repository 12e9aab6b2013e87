use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{AppContext, InitArgs};

/// Config file names probed in the working directory, first hit wins
pub const CONFIG_FILES: [&str; 4] = ["amalgam.toml", "amalgam.yaml", "amalgam.json", ".amalgam.toml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// File-name suffixes deciding which bundle section a file goes to
    pub classify: ClassifyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig
{
    /// Suffixes of interface units (header section)
    pub declaration: Vec<String>,

    /// Suffixes of implementation units (conditionally compiled section)
    pub definition: Vec<String>,
}

impl Default for ClassifyConfig
{
    fn default() -> Self
    {
        Self {
            declaration: [".h", ".hh", ".hpp", ".hxx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            definition: [".c", ".cc", ".cpp", ".cxx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Load configuration relative to the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<Config>
{
    load_config_from(Path::new("."), explicit)
}

/// Load configuration: defaults, then one config file, then `AMALGAM_*` env vars.
///
/// An `explicit` path must exist; otherwise the first of [`CONFIG_FILES`]
/// found in `dir` is used, if any.
pub fn load_config_from(
    dir: &Path,
    explicit: Option<&Path>,
) -> Result<Config>
{
    let mut builder = ::config::Config::builder();

    match explicit
    {
        Some(path) =>
        {
            if !path.exists()
            {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            debug!(path = %path.display(), "using explicit config file");
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        None =>
        {
            // Load from config files in priority order
            if let Some(found) = CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|p| p.exists())
            {
                debug!(path = %found.display(), "using config file");
                builder = builder.add_source(::config::File::from(found.as_path()));
            }
        }
    }

    // AMALGAM_CLASSIFY__DEFINITION=.cpp,.inl
    builder = builder.add_source(
        ::config::Environment::with_prefix("AMALGAM")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("classify.declaration")
            .with_list_parse_key("classify.definition")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path: PathBuf = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let toml_string =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: Would create {}", config_path.display());
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
