//! Signalling every process that matches a target.
//!
//! Each matched process is signalled independently. A failure on one target,
//! most commonly a process that exited after it was resolved, is recorded and
//! the remaining targets are still attempted.

use crate::process_kill::check_signal;
use crate::source::{ProcSource, Signaller};
use crate::target::{resolve, TargetSpec};
use crate::types::{ProcError, ProcessRecord, Result, SignalRequest};
use tracing::{debug, info, warn};

/// Result of signalling one matched process.
#[derive(Debug)]
pub struct SignalOutcome {
    pub record: ProcessRecord,
    pub result: Result<()>,
}

impl SignalOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-target outcomes of one bulk dispatch, in resolution order.
#[derive(Debug)]
pub struct BulkReport {
    pub signal: i32,
    pub outcomes: Vec<SignalOutcome>,
}

impl BulkReport {
    pub fn matched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ProcessRecord, &ProcError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.record, e)))
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(SignalOutcome::is_ok)
    }
}

fn signal_each<K, F>(signaller: &K, targets: Vec<ProcessRecord>, signum: i32, mut visit: F)
where
    K: Signaller + ?Sized,
    F: FnMut(ProcessRecord, Result<()>),
{
    for record in targets {
        let result = signaller.send_signal(SignalRequest::new(record.pid(), signum));
        match &result {
            Ok(()) => debug!(pid = record.pid(), signal = signum, "signal delivered"),
            Err(e) if e.is_not_found() => {
                debug!(pid = record.pid(), "target exited before signal")
            }
            Err(e) => {
                warn!(pid = record.pid(), name = record.name(), error = %e, "signal failed")
            }
        }
        visit(record, result);
    }
}

/// Resolve `spec` and send `signum` to every match, collecting every outcome.
///
/// Errors only if `signum` is invalid, the source's pids are not signallable
/// from this namespace, or the process table cannot be enumerated. All three
/// are checked before any signal is sent.
pub fn dispatch_to_matches<S, K>(
    source: &S,
    signaller: &K,
    spec: &TargetSpec,
    signum: i32,
) -> Result<BulkReport>
where
    S: ProcSource + ?Sized,
    K: Signaller + ?Sized,
{
    check_signal(signum)?;
    source.ensure_local()?;
    let targets = resolve(source, spec)?;

    let mut outcomes = Vec::with_capacity(targets.len());
    signal_each(signaller, targets, signum, |record, result| {
        outcomes.push(SignalOutcome { record, result })
    });

    let report = BulkReport { signal: signum, outcomes };
    if report.matched() > 0 {
        info!(
            signal = signum,
            matched = report.matched(),
            delivered = report.delivered(),
            "bulk dispatch finished"
        );
    }
    Ok(report)
}

/// Resolve `spec` and send `signum` to every match, handing each failure to
/// `on_error` as it happens. With no handler failures are dropped.
///
/// Returns the number of processes that were signalled successfully.
pub fn dispatch_with<S, K>(
    source: &S,
    signaller: &K,
    spec: &TargetSpec,
    signum: i32,
    mut on_error: Option<&mut dyn FnMut(&ProcessRecord, ProcError)>,
) -> Result<usize>
where
    S: ProcSource + ?Sized,
    K: Signaller + ?Sized,
{
    check_signal(signum)?;
    source.ensure_local()?;
    let targets = resolve(source, spec)?;

    let mut delivered = 0;
    signal_each(signaller, targets, signum, |record, result| match result {
        Ok(()) => delivered += 1,
        Err(e) => {
            if let Some(handler) = on_error.as_mut() {
                handler(&record, e);
            }
        }
    });
    Ok(delivered)
}
