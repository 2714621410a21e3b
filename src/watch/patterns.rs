// src/watch/patterns.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchrunError};

/// Compiled `watch` / `ignore` glob patterns.
///
/// Semantics:
/// - a path matching any `ignore` pattern never qualifies;
/// - with an empty `watch` list every other path qualifies;
/// - otherwise the path must match at least one `watch` pattern.
///
/// Callers pass the path relative to the watched root (forward slashes) and
/// the bare file name; a pattern matching either one counts, so `*.rs` and
/// `src/**/*.rs` both behave as expected.
#[derive(Clone)]
pub struct FilterSpec {
    watch: Vec<String>,
    ignore: Vec<String>,
    watch_set: Option<GlobSet>,
    ignore_set: Option<GlobSet>,
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("watch", &self.watch)
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl FilterSpec {
    /// Compile both pattern lists. A malformed glob is reported as
    /// [`WatchrunError::InvalidPattern`].
    pub fn new(watch: Vec<String>, ignore: Vec<String>) -> Result<Self> {
        let watch_set = build_globset(&watch)?;
        let ignore_set = build_globset(&ignore)?;
        Ok(Self {
            watch,
            ignore,
            watch_set,
            ignore_set,
        })
    }

    /// Filter that lets every path through.
    pub fn allow_all() -> Self {
        Self {
            watch: Vec::new(),
            ignore: Vec::new(),
            watch_set: None,
            ignore_set: None,
        }
    }

    /// Returns true if a change to this path should re-run the command.
    pub fn matches(&self, rel_path: &str, file_name: Option<&str>) -> bool {
        let hit = |set: &GlobSet| {
            set.is_match(rel_path) || file_name.is_some_and(|name| set.is_match(name))
        };

        if let Some(ignore) = &self.ignore_set {
            if hit(ignore) {
                return false;
            }
        }
        match &self.watch_set {
            Some(watch) => hit(watch),
            None => true,
        }
    }
}

/// Build a GlobSet from simple string patterns; `None` for an empty list.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| WatchrunError::InvalidPattern {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|source| WatchrunError::InvalidPattern {
            pattern: patterns.join(","),
            source,
        })?;
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_lists_match_everything() {
        let filter = FilterSpec::new(vec![], vec![]).unwrap();
        assert!(filter.matches("src/main.rs", Some("main.rs")));
        assert!(filter.matches("README", Some("README")));
    }

    #[test]
    fn ignore_wins_over_watch() {
        let filter = FilterSpec::new(strings(&["*.go"]), strings(&["*_test.go"])).unwrap();
        assert!(filter.matches("pkg/server.go", Some("server.go")));
        assert!(!filter.matches("pkg/server_test.go", Some("server_test.go")));
        assert!(!filter.matches("pkg/app.js", Some("app.js")));
    }

    #[test]
    fn matches_relative_path_or_file_name() {
        let filter = FilterSpec::new(strings(&["src/**/*.rs", "Cargo.toml"]), vec![]).unwrap();
        assert!(filter.matches("src/watch/mod.rs", Some("mod.rs")));
        assert!(filter.matches("crates/foo/Cargo.toml", Some("Cargo.toml")));
        assert!(!filter.matches("tests/engine.rs", Some("engine.rs")));
    }

    #[test]
    fn malformed_pattern_is_reported() {
        let err = FilterSpec::new(strings(&["src/[*.rs"]), vec![]).unwrap_err();
        match err {
            WatchrunError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "src/[*.rs"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
