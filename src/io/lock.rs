//! Lock file management for single-instance enforcement.
//!
//! Only loop mode takes the lock; a one-shot evaluation may run alongside a
//! looping instance. The lock file lives in `$XDG_RUNTIME_DIR` (falling back to
//! `/tmp`) and contains the PID of the holder.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fmt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::common::constants::LOCK_FILE_NAME;

/// Another process holds the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadyRunningError {
    /// PID read from the lock file, if it could be parsed.
    pub pid: Option<u32>,
}

impl fmt::Display for AlreadyRunningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "nerdshade is already running (PID: {pid})"),
            None => write!(f, "nerdshade is already running"),
        }
    }
}

impl std::error::Error for AlreadyRunningError {}

/// An acquired instance lock. Released and removed on drop.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = FileExt::unlock(&self.file);
    }
}

/// Default lock file location.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    Path::new(&runtime_dir).join(LOCK_FILE_NAME)
}

/// Try to take the exclusive lock at `path` without blocking.
///
/// Fails with [`AlreadyRunningError`] when another process holds it.
pub fn acquire_lock_at(path: &Path) -> Result<InstanceLock> {
    // Open without truncating so a running holder's PID stays readable
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("failed to open lock file {}", path.display()))?;

    if file.try_lock_exclusive().is_err() {
        let pid = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| content.trim().parse::<u32>().ok());
        return Err(AlreadyRunningError { pid }.into());
    }

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(&file, "{}", std::process::id())?;
    file.flush()?;

    Ok(InstanceLock {
        file,
        path: path.to_path_buf(),
    })
}
