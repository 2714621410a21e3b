// src/config/validate.rs

use crate::config::model::{RawConfigFile, WatchConfig};
use crate::errors::{Result, WatchrunError};
use crate::watch::FilterSpec;

impl TryFrom<RawConfigFile> for WatchConfig {
    type Error = crate::errors::WatchrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let root = validate_root(&raw)?;
        let watch = clean_patterns(raw.watch.pattern);
        let ignore = clean_patterns(raw.watch.ignore);

        // Surface malformed globs now rather than on the first event.
        FilterSpec::new(watch.clone(), ignore.clone())?;

        // An empty command is allowed here; running it reports EmptyCommand.
        Ok(WatchConfig {
            root,
            command: raw.command.cmd,
            watch,
            ignore,
        })
    }
}

fn validate_root(cfg: &RawConfigFile) -> Result<std::path::PathBuf> {
    let dir = &cfg.watch.dir;
    if !dir.is_dir() {
        return Err(WatchrunError::ConfigError(format!(
            "watch directory {:?} does not exist or is not a directory",
            dir
        )));
    }
    Ok(dir.canonicalize()?)
}

/// Drop blank entries, e.g. from `--pattern ""` or a trailing comma.
fn clean_patterns(patterns: Vec<String>) -> Vec<String> {
    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
