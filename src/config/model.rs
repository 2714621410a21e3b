// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// dir = "."
/// pattern = ["*.rs"]
/// ignore = ["target/**"]
///
/// [command]
/// cmd = ["cargo", "test"]
/// ```
///
/// All sections are optional; CLI flags override anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub command: CommandSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directory to watch; also the command's working directory.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Only writes to files matching one of these re-run the command.
    /// Empty means every file.
    #[serde(default)]
    pub pattern: Vec<String>,

    /// Writes to files matching any of these never re-run the command.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pattern: Vec::new(),
            ignore: Vec::new(),
        }
    }
}

/// `[command]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSection {
    /// Program followed by its arguments.
    #[serde(default)]
    pub cmd: Vec<String>,
}

/// Validated, fully-resolved configuration.
///
/// Constructed via `TryFrom<RawConfigFile>` (see `validate.rs`), so holding
/// one means `root` exists and every pattern compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Canonical path of the watched directory.
    pub root: PathBuf,
    pub command: Vec<String>,
    pub watch: Vec<String>,
    pub ignore: Vec<String>,
}
