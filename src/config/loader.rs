// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, WatchConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate the
/// directory or patterns. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let raw_config = load_from_path(&path)?;
    WatchConfig::try_from(raw_config)
}

/// Config file looked up in the current directory when `--config` is absent.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchrun.toml")
}

/// Resolve the effective configuration: defaults, then the config file (if
/// any), then CLI flags.
///
/// - `--config PATH` must point at a readable file.
/// - Without it, [`default_config_path`] is used only if it exists.
pub fn resolve(args: &CliArgs) -> Result<WatchConfig> {
    let raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                debug!(path = ?default_path, "loading default config file");
                load_from_path(&default_path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    WatchConfig::try_from(apply_cli_overrides(raw, args))
}

/// Overlay CLI flags on top of a file configuration. Flags that were not
/// given leave the file's value in place.
pub fn apply_cli_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if let Some(dir) = &args.dir {
        raw.watch.dir = dir.clone();
    }
    if !args.pattern.is_empty() {
        raw.watch.pattern = args.pattern.clone();
    }
    if !args.ignore.is_empty() {
        raw.watch.ignore = args.ignore.clone();
    }
    if !args.command.is_empty() {
        raw.command.cmd = args.command.clone();
    }
    raw
}
