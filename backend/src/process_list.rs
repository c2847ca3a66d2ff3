//! Process enumeration and record reading through procfs.

use crate::source::ProcSource;
use crate::types::{ProcError, ProcessRecord, Result};
use procfs::process::Process;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Mount point of the kernel process hierarchy on a normal Linux host.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Live [`ProcSource`] backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    root: PathBuf,
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::with_root(DEFAULT_PROC_ROOT)
    }
}

impl ProcfsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from an alternative procfs mount, e.g. a host `/proc` bind-mounted
    /// into a container. Such a source is read-only: its pids are refused for
    /// signalling unless the mount belongs to the caller's pid namespace.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pid_dir(&self, pid: i32) -> PathBuf {
        self.root.join(pid.to_string())
    }

    fn open(&self, pid: i32) -> Result<Process> {
        if pid <= 0 {
            return Err(ProcError::NotFound(pid));
        }
        Process::new_with_root(self.pid_dir(pid)).map_err(|e| ProcError::from_procfs(pid, e))
    }
}

/// Name and uids from `stat` and the owner of the pid directory, for when
/// `status` exists but cannot be parsed.
fn fallback_identity(pid: i32, process: &Process) -> Result<(String, u32, u32)> {
    let stat = process.stat().map_err(|e| ProcError::from_procfs(pid, e))?;
    let uid = process.uid().map_err(|e| ProcError::from_procfs(pid, e))?;
    Ok((stat.comm, uid, uid))
}

impl ProcSource for ProcfsSource {
    fn list_pids(&self) -> Result<Vec<i32>> {
        let all_procs = procfs::process::all_processes_with_root(&self.root).map_err(|e| {
            ProcError::Procfs(format!("Failed to read {}: {}", self.root.display(), e))
        })?;

        let pids = all_procs
            .filter_map(|proc_result| match proc_result {
                Ok(process) => Some(process.pid()),
                Err(e) => {
                    // Exited between readdir and open
                    trace!(error = %e, "skipping unreadable pid entry");
                    None
                }
            })
            .collect();
        Ok(pids)
    }

    fn read_record(&self, pid: i32) -> Result<ProcessRecord> {
        let process = self.open(pid)?;

        let (name, euid, ruid) = match process.status() {
            Ok(status) => (status.name, status.euid, status.ruid),
            Err(e) => {
                let err = ProcError::from_procfs(pid, e);
                if err.is_not_found() {
                    return Err(err);
                }
                debug!(pid, error = %err, "status unreadable, falling back to stat");
                fallback_identity(pid, &process).map_err(|fallback| {
                    if fallback.is_not_found() {
                        fallback
                    } else {
                        err
                    }
                })?
            }
        };

        // Kernel threads have no exe link and other users' links are unreadable
        let exe = match process.exe() {
            Ok(path) => Some(path),
            Err(e) => {
                trace!(pid, error = %e, "exe unavailable");
                None
            }
        };

        Ok(ProcessRecord::new(pid, name, exe, euid, ruid))
    }

    fn read_environ(&self, pid: i32) -> Result<Vec<u8>> {
        if pid <= 0 {
            return Err(ProcError::NotFound(pid));
        }
        // procfs' own environ() collects into a HashMap and loses ordering
        std::fs::read(self.pid_dir(pid).join("environ")).map_err(|e| ProcError::from_io(pid, e))
    }

    fn ensure_local(&self) -> Result<()> {
        // `<root>/self` links to the reader's pid as seen by that mount's namespace
        let own = std::fs::read_link(self.root.join("self"))
            .ok()
            .and_then(|link| link.to_str().and_then(|s| s.parse::<i32>().ok()));
        if own == Some(std::process::id() as i32) {
            Ok(())
        } else {
            debug!(root = %self.root.display(), ?own, "proc root is not in this pid namespace");
            Err(ProcError::ForeignNamespace(self.root.display().to_string()))
        }
    }
}
