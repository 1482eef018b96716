//! Resilient staging of remote log files into the local work area.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::warn;

use super::types::{ScanTarget, StageLayout};

/// Copies remote log files into the local work area.
///
/// The source shares are kept in sync by external replication software that
/// holds transient locks, so a failed copy is retried on a fixed delay before
/// the failure is surfaced to the caller.
#[derive(Debug, Clone)]
pub struct Stager {
    attempts: u32,
    retry_delay: Duration,
}

impl Stager {
    pub fn new(attempts: u32, retry_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    /// Copy `source` to `dest`, overwriting any previous copy. The
    /// destination directory is created on demand before the first attempt.
    pub fn stage(&self, source: &Path, dest: &Path) -> io::Result<u64> {
        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        self.copy_with_retry(source, || fs::copy(source, dest))
    }

    fn copy_with_retry(
        &self,
        source: &Path,
        mut copy: impl FnMut() -> io::Result<u64>,
    ) -> io::Result<u64> {
        let mut attempt = 1;
        loop {
            match copy() {
                Ok(bytes) => return Ok(bytes),
                Err(err) if attempt < self.attempts => {
                    warn!(
                        source = %source.display(),
                        attempt,
                        error = %err,
                        "copy failed, retrying"
                    );
                    thread::sleep(self.retry_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Compute where a remote file lands under the work directory.
///
/// The per-host layout keys the subdirectory by the remote file's parent
/// directory name, which keeps hosts with identical log names apart. The
/// per-target layout collapses everything under the target's logical name.
pub fn local_destination(work_dir: &Path, target: &ScanTarget, source: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    let subdir = match target.effective_stage_layout() {
        StageLayout::PerHost => source
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from(target.name.as_str())),
        StageLayout::PerTarget => OsString::from(target.name.as_str()),
    };
    work_dir.join(subdir).join(file_name)
}
