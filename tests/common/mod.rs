#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use watchrun_test_utils::{init_tracing, wait_until, with_timeout};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Create `dirs` (relative to `root`) and return `root` plus every created
/// directory and its ancestors below `root`.
pub fn make_tree(root: &Path, dirs: &[&str]) -> Vec<PathBuf> {
    let mut all = vec![root.to_path_buf()];
    for dir in dirs {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        for ancestor in path.ancestors() {
            if ancestor == root {
                break;
            }
            if !all.iter().any(|p| p == ancestor) {
                all.push(ancestor.to_path_buf());
            }
        }
    }
    all
}

/// Canonical temp directory, so paths compare equal to what the engine sees.
pub fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    (tmp, root)
}

/// In-memory log sink shared between a test and the `fmt` subscriber it
/// installs.
#[derive(Clone, Default)]
pub struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Install an info-level subscriber writing into a fresh [`LogBuffer`] for
/// the current thread, until the returned guard is dropped.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
