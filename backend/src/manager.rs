//! Process manager facade.
//!
//! Ties a [`ProcSource`] and a [`Signaller`] together and layers the
//! lookup and kill helpers over them.

use crate::bulk::{self, BulkReport};
use crate::config::Config;
use crate::environ::read_environment;
use crate::process_kill::NixSignaller;
use crate::process_list::ProcfsSource;
use crate::source::{ProcSource, Signaller};
use crate::target::{self, TargetSpec};
use crate::types::{EnvironmentSnapshot, ProcError, ProcessRecord, Result, SignalRequest};
use crate::users::UserResolver;
use tracing::debug;

/// Inspects and signals processes through pluggable OS seams.
#[derive(Debug, Clone)]
pub struct ProcessManager<S = ProcfsSource, K = NixSignaller> {
    source: S,
    signaller: K,
}

impl ProcessManager {
    /// Manager over the host's `/proc` using `kill(2)`.
    pub fn new() -> Self {
        Self::with_parts(ProcfsSource::new(), NixSignaller)
    }

    /// Manager over `config.proc_root`. A root outside the caller's pid
    /// namespace can be read but not signalled.
    pub fn from_config(config: &Config) -> Self {
        Self::with_parts(ProcfsSource::with_root(&config.proc_root), NixSignaller)
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ProcSource, K: Signaller> ProcessManager<S, K> {
    pub fn with_parts(source: S, signaller: K) -> Self {
        Self { source, signaller }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn list_process_ids(&self) -> Result<Vec<i32>> {
        self.source.list_pids()
    }

    pub fn read_record(&self, pid: i32) -> Result<ProcessRecord> {
        self.source.read_record(pid)
    }

    pub fn read_environment(&self, pid: i32) -> Result<EnvironmentSnapshot> {
        read_environment(&self.source, pid)
    }

    /// Fails with `ForeignNamespace` when the source's pids would reach
    /// different processes through `kill(2)`.
    pub fn send_signal(&self, pid: i32, signum: i32) -> Result<()> {
        self.source.ensure_local()?;
        self.signaller.send_signal(SignalRequest::new(pid, signum))
    }

    pub fn resolve(&self, spec: &TargetSpec) -> Result<Vec<ProcessRecord>> {
        target::resolve(&self.source, spec)
    }

    pub fn dispatch_to_matches(&self, spec: &TargetSpec, signum: i32) -> Result<BulkReport> {
        bulk::dispatch_to_matches(&self.source, &self.signaller, spec, signum)
    }

    // Lookup helpers

    pub fn process_ids(&self) -> Result<Vec<i32>> {
        self.list_process_ids()
    }

    /// Every readable process.
    pub fn processes(&self) -> Result<Vec<ProcessRecord>> {
        self.find(|_| true)
    }

    /// Records for `pids`, omitting any that have exited.
    pub fn processes_for(&self, pids: &[i32]) -> Vec<ProcessRecord> {
        target::read_matching(&self.source, pids, |_| true)
    }

    /// The record for `pid`, or `None` if it has exited or cannot be read.
    pub fn process_by_id(&self, pid: i32) -> Option<ProcessRecord> {
        self.processes_for(&[pid]).into_iter().next()
    }

    pub fn find<F>(&self, predicate: F) -> Result<Vec<ProcessRecord>>
    where
        F: Fn(&ProcessRecord) -> bool,
    {
        let pids = self.source.list_pids()?;
        Ok(target::read_matching(&self.source, &pids, predicate))
    }

    // Signal helpers

    pub fn kill(&self, pid: i32, signum: i32) -> Result<()> {
        self.send_signal(pid, signum)
    }

    /// Best-effort single signal; the reason for a failure is logged and
    /// dropped.
    pub fn try_kill(&self, pid: i32, signum: i32) -> bool {
        match self.send_signal(pid, signum) {
            Ok(()) => true,
            Err(e) => {
                debug!(pid, signal = signum, error = %e, "try_kill failed");
                false
            }
        }
    }

    /// Bulk dispatch reporting each failure to `on_error`, or discarding it
    /// when no handler is given. Returns how many targets were signalled.
    pub fn kill_matching_with(
        &self,
        spec: &TargetSpec,
        signum: i32,
        on_error: Option<&mut dyn FnMut(&ProcessRecord, ProcError)>,
    ) -> Result<usize> {
        bulk::dispatch_with(&self.source, &self.signaller, spec, signum, on_error)
    }

    /// Signal every process of `uid` named `name`. A blank name is rejected
    /// because it would suffix-match every executable path.
    pub fn kill_by_name(&self, name: &str, uid: u32, signum: i32) -> Result<BulkReport> {
        check_process_name(name)?;
        self.dispatch_to_matches(&TargetSpec::name_and_owner(name, uid), signum)
    }

    /// Like [`kill_by_name`](Self::kill_by_name) with the owner given by account name.
    ///
    /// Fails with `UnknownUser` before anything is signalled if the name does
    /// not resolve.
    pub fn kill_by_user_name<U>(
        &self,
        name: &str,
        user_name: &str,
        signum: i32,
        users: &U,
    ) -> Result<BulkReport>
    where
        U: UserResolver + ?Sized,
    {
        check_process_name(name)?;
        let uid = users
            .uid_for_name(user_name)
            .ok_or_else(|| ProcError::UnknownUser(user_name.to_string()))?;
        self.kill_by_name(name, uid, signum)
    }

    // Environment helpers

    /// Environment pairs of `pid` accepted by `predicate`, in block order.
    pub fn environment_filtered<F>(&self, pid: i32, predicate: F) -> Result<EnvironmentSnapshot>
    where
        F: FnMut(&str, &str) -> bool,
    {
        Ok(self.read_environment(pid)?.filter(predicate))
    }

    /// Case-insensitive lookup of one variable; the first occurrence wins.
    pub fn environment_variable(&self, pid: i32, name: &str) -> Result<Option<String>> {
        if name.trim().is_empty() {
            return Err(ProcError::InvalidArgument(
                "variable name must not be blank".to_string(),
            ));
        }
        let env = self.read_environment(pid)?;
        Ok(env.get_ignore_case(name).map(str::to_string))
    }
}

fn check_process_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ProcError::InvalidArgument(
            "process name must not be blank".to_string(),
        ));
    }
    Ok(())
}
