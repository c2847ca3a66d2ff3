//! Data types and error definitions for process management.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for process management operations.
pub type Result<T> = std::result::Result<T, ProcError>;

/// Point-in-time snapshot of one process.
///
/// A record never changes after it is read. The process it describes may
/// exit at any moment afterwards, so a stale record is an expected state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pid: i32,
    name: String,
    exe: Option<PathBuf>,
    euid: u32,
    ruid: u32,
}

impl ProcessRecord {
    pub fn new(
        pid: i32,
        name: impl Into<String>,
        exe: Option<PathBuf>,
        euid: u32,
        ruid: u32,
    ) -> Self {
        Self {
            pid,
            name: name.into(),
            exe,
            euid,
            ruid,
        }
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// Short process name. The kernel truncates it to 15 bytes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executable path, absent for kernel threads or when `exe` could not be read.
    pub fn exe(&self) -> Option<&Path> {
        self.exe.as_deref()
    }

    pub fn euid(&self) -> u32 {
        self.euid
    }

    pub fn ruid(&self) -> u32 {
        self.ruid
    }

    /// True if either the effective or the real uid is `uid`.
    pub fn is_owned_by(&self, uid: u32) -> bool {
        self.euid == uid || self.ruid == uid
    }

    /// True if the name equals `name` or the executable path ends with it.
    ///
    /// The suffix test is textual, so `/usr/bin/myworker` ends with `worker`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
            || self
                .exe
                .as_ref()
                .is_some_and(|exe| exe.to_string_lossy().ends_with(name))
    }
}

/// Ordered environment of one process as read from its `environ` block.
///
/// Keys may repeat; lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentSnapshot {
    vars: Vec<(String, String)>,
}

impl EnvironmentSnapshot {
    pub fn new(vars: Vec<(String, String)>) -> Self {
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Keep only the pairs accepted by `predicate`, preserving order.
    pub fn filter<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&str, &str) -> bool,
    {
        Self {
            vars: self
                .vars
                .into_iter()
                .filter(|(k, v)| predicate(k, v))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.vars
    }
}

/// A signal number addressed to one pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalRequest {
    pub pid: i32,
    pub signal: i32,
}

impl SignalRequest {
    pub fn new(pid: i32, signal: i32) -> Self {
        Self { pid, signal }
    }
}

/// Errors that can occur during process management.
#[derive(Error, Debug)]
pub enum ProcError {
    #[error("Process {0} not found")]
    NotFound(i32),
    #[error("Permission denied for PID {0}")]
    PermissionDenied(i32),
    #[error("Invalid signal number {0}")]
    InvalidSignal(i32),
    #[error("Refusing to address PID {0}")]
    InvalidPid(i32),
    #[error("Refusing to signal: pids under {0} belong to another pid namespace")]
    ForeignNamespace(String),
    #[error("Failed to parse process data: {0}")]
    ParseError(String),
    #[error("User '{0}' not found")]
    UnknownUser(String),
    #[error("Unknown signal name '{0}'")]
    UnknownSignalName(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Procfs error: {0}")]
    Procfs(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcError {
    /// A vanished process is an expected outcome, not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcError::NotFound(_))
    }

    /// Map a procfs failure for `pid` onto the not-found / permission taxonomy.
    pub(crate) fn from_procfs(pid: i32, err: procfs::ProcError) -> Self {
        match err {
            procfs::ProcError::NotFound(_) => ProcError::NotFound(pid),
            procfs::ProcError::PermissionDenied(_) => ProcError::PermissionDenied(pid),
            procfs::ProcError::Incomplete(_) => {
                ProcError::ParseError(format!("incomplete data for PID {pid}"))
            }
            other => ProcError::Procfs(other.to_string()),
        }
    }

    /// Map an I/O failure on a per-process file for `pid`.
    pub(crate) fn from_io(pid: i32, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ProcError::NotFound(pid),
            std::io::ErrorKind::PermissionDenied => ProcError::PermissionDenied(pid),
            // ESRCH surfaces when the process exits while its files are open
            _ if err.raw_os_error() == Some(nix::libc::ESRCH) => ProcError::NotFound(pid),
            _ => ProcError::Io(err),
        }
    }
}

impl From<procfs::ProcError> for ProcError {
    fn from(err: procfs::ProcError) -> Self {
        ProcError::Procfs(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, exe: Option<&str>, euid: u32, ruid: u32) -> ProcessRecord {
        ProcessRecord::new(42, name, exe.map(PathBuf::from), euid, ruid)
    }

    #[test]
    fn owner_matches_either_uid() {
        let r = record("worker", None, 0, 1000);
        assert!(r.is_owned_by(1000));
        assert!(r.is_owned_by(0));
        assert!(!r.is_owned_by(1001));
    }

    #[test]
    fn name_matches_comm_or_exe_suffix() {
        assert!(record("worker", None, 0, 0).is_named("worker"));
        assert!(record("w", Some("/usr/bin/worker"), 0, 0).is_named("worker"));
        assert!(!record("w", Some("/usr/bin/worker2"), 0, 0).is_named("worker"));
        assert!(!record("other", None, 0, 0).is_named("worker"));
    }

    #[test]
    fn environment_lookup_first_match_wins() {
        let env = EnvironmentSnapshot::new(vec![
            ("PATH".into(), "/bin".into()),
            ("PATH".into(), "/usr/bin".into()),
        ]);
        assert_eq!(env.get("PATH"), Some("/bin"));
        assert_eq!(env.get("path"), None);
        assert_eq!(env.get_ignore_case("path"), Some("/bin"));
        assert_eq!(env.get_ignore_case("HOME"), None);
    }

    #[test]
    fn environment_filter_preserves_order() {
        let env = EnvironmentSnapshot::new(vec![
            ("A".into(), "1".into()),
            ("B".into(), "2".into()),
            ("C".into(), "3".into()),
        ]);
        let kept: Vec<_> = env.filter(|k, _| k != "B").into_vec();
        assert_eq!(
            kept,
            vec![("A".to_string(), "1".to_string()), ("C".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn io_errors_map_to_taxonomy() {
        let nf = ProcError::from_io(7, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(nf, ProcError::NotFound(7)));
        let pd = ProcError::from_io(7, std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(pd, ProcError::PermissionDenied(7)));
        let srch = ProcError::from_io(7, std::io::Error::from_raw_os_error(nix::libc::ESRCH));
        assert!(srch.is_not_found());
    }
}
