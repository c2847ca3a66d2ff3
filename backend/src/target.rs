//! Resolving logical targets into concrete process records.

use crate::source::ProcSource;
use crate::types::{ProcError, ProcessRecord, Result};
use std::fmt;
use tracing::{debug, trace};

type RecordPredicate = dyn Fn(&ProcessRecord) -> bool + Send + Sync;

/// Which processes an operation applies to.
pub enum TargetSpec {
    /// Every process the predicate accepts.
    Predicate(Box<RecordPredicate>),
    /// Processes whose name equals `name` or whose executable path ends with
    /// it, owned by `uid` as either effective or real user.
    NameAndOwner { name: String, uid: u32 },
}

impl TargetSpec {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&ProcessRecord) -> bool + Send + Sync + 'static,
    {
        TargetSpec::Predicate(Box::new(f))
    }

    pub fn name_and_owner(name: impl Into<String>, uid: u32) -> Self {
        TargetSpec::NameAndOwner {
            name: name.into(),
            uid,
        }
    }

    pub fn matches(&self, record: &ProcessRecord) -> bool {
        match self {
            TargetSpec::Predicate(f) => f(record),
            TargetSpec::NameAndOwner { name, uid } => {
                record.is_named(name) && record.is_owned_by(*uid)
            }
        }
    }
}

impl fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Predicate(_) => f.write_str("Predicate(..)"),
            TargetSpec::NameAndOwner { name, uid } => f
                .debug_struct("NameAndOwner")
                .field("name", name)
                .field("uid", uid)
                .finish(),
        }
    }
}

/// Read each of `pids` and keep the records `keep` accepts.
///
/// Processes that cannot be read are left out: a vanished pid is routine,
/// and an unreadable one cannot be tested against `keep`.
pub fn read_matching<S, F>(source: &S, pids: &[i32], mut keep: F) -> Vec<ProcessRecord>
where
    S: ProcSource + ?Sized,
    F: FnMut(&ProcessRecord) -> bool,
{
    pids.iter()
        .filter_map(|&pid| match source.read_record(pid) {
            Ok(record) => Some(record),
            Err(ProcError::NotFound(_)) => {
                trace!(pid, "process exited before it could be read");
                None
            }
            Err(e) => {
                debug!(pid, error = %e, "skipping unreadable process");
                None
            }
        })
        .filter(|record| keep(record))
        .collect()
}

/// Enumerate every process and return those matching `spec`, in enumeration order.
///
/// Only a failure to enumerate is an error. No match is an empty result.
pub fn resolve<S>(source: &S, spec: &TargetSpec) -> Result<Vec<ProcessRecord>>
where
    S: ProcSource + ?Sized,
{
    let pids = source.list_pids()?;
    let matches = read_matching(source, &pids, |record| spec.matches(record));
    debug!(?spec, candidates = pids.len(), matched = matches.len(), "resolved target");
    Ok(matches)
}
