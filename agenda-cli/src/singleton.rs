//! Ensure only one process writes a given events file at a time.

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Held for as long as the events file is being written; dropping it unlocks.
pub struct WriterLock {
    _file: File,
}

fn lock_dir() -> Result<PathBuf> {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine runtime directory"))?;

    Ok(runtime_dir.join("agenda"))
}

/// One lock file per events file, named after the file and a hash of its
/// absolute path so `--file` targets never share a lock.
fn lock_path(dir: &Path, events_path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(events_path)
        .with_context(|| format!("Failed to resolve {}", events_path.display()))?;

    let mut hasher = DefaultHasher::new();
    absolute.hash(&mut hasher);

    let stem = absolute
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "events".to_string());

    Ok(dir.join(format!("{}-{:016x}.lock", stem, hasher.finish())))
}

/// Take the writer lock for `events_path`, failing if another session holds it.
pub fn acquire_lock(events_path: &Path) -> Result<WriterLock> {
    acquire_lock_in(&lock_dir()?, events_path)
}

fn acquire_lock_in(dir: &Path, events_path: &Path) -> Result<WriterLock> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create lock directory {}", dir.display()))?;

    let path = lock_path(dir, events_path)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another agenda session is already editing {}.\n\
            Close it first, or if you believe this is an error, remove: {}",
            events_path.display(),
            path.display()
        )
    })?;

    Ok(WriterLock { _file: file })
}
