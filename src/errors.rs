// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchrunError {
    #[error("Could not execute empty command")]
    EmptyCommand,

    #[error("Watcher closed")]
    WatcherClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("discovering sub directories of {path:?}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("adding {path:?} to the file watcher: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("spawning {argv:?}: {source}")]
    Spawn {
        argv: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("killing process group {pgid} of {argv:?}: {source}")]
    Kill {
        pgid: i32,
        argv: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("watcher files changes error: {0}")]
    Subscription(#[source] notify::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchrunError>;
