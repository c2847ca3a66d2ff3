//! In-memory sources for exercising resolver and dispatch logic.

use crate::source::{ProcSource, Signaller};
use crate::types::{ProcError, ProcessRecord, Result, SignalRequest};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

pub fn record(pid: i32, name: &str, exe: Option<&str>, euid: u32, ruid: u32) -> ProcessRecord {
    ProcessRecord::new(pid, name, exe.map(PathBuf::from), euid, ruid)
}

/// Process table whose entries can be made to vanish or refuse reads.
#[derive(Default)]
pub struct FakeSource {
    pids: Vec<i32>,
    records: HashMap<i32, ProcessRecord>,
    environs: HashMap<i32, Vec<u8>>,
    denied: HashSet<i32>,
}

impl FakeSource {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        let mut source = Self::default();
        for r in records {
            source.pids.push(r.pid());
            source.records.insert(r.pid(), r);
        }
        source
    }

    /// Listed by enumeration but gone by the time it is read.
    pub fn with_vanished(mut self, pid: i32) -> Self {
        self.pids.push(pid);
        self
    }

    pub fn with_denied(mut self, pid: i32) -> Self {
        self.pids.push(pid);
        self.denied.insert(pid);
        self
    }

    pub fn with_environ(mut self, pid: i32, raw: &[u8]) -> Self {
        self.environs.insert(pid, raw.to_vec());
        self
    }
}

impl ProcSource for FakeSource {
    fn list_pids(&self) -> Result<Vec<i32>> {
        Ok(self.pids.clone())
    }

    fn read_record(&self, pid: i32) -> Result<ProcessRecord> {
        if self.denied.contains(&pid) {
            return Err(ProcError::PermissionDenied(pid));
        }
        self.records.get(&pid).cloned().ok_or(ProcError::NotFound(pid))
    }

    fn read_environ(&self, pid: i32) -> Result<Vec<u8>> {
        if self.denied.contains(&pid) {
            return Err(ProcError::PermissionDenied(pid));
        }
        self.environs.get(&pid).cloned().ok_or(ProcError::NotFound(pid))
    }
}

/// Records every request; pids marked gone or protected fail accordingly.
#[derive(Default)]
pub struct RecordingSignaller {
    gone: HashSet<i32>,
    protected: HashSet<i32>,
    sent: Mutex<Vec<SignalRequest>>,
}

impl RecordingSignaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process exits after resolution but before it is signalled.
    pub fn with_gone(mut self, pid: i32) -> Self {
        self.gone.insert(pid);
        self
    }

    pub fn with_protected(mut self, pid: i32) -> Self {
        self.protected.insert(pid);
        self
    }

    /// Pids that were attempted, successful or not, in order.
    pub fn attempted(&self) -> Vec<i32> {
        self.sent.lock().unwrap().iter().map(|r| r.pid).collect()
    }
}

impl Signaller for RecordingSignaller {
    fn send_signal(&self, request: SignalRequest) -> Result<()> {
        self.sent.lock().unwrap().push(request);
        if self.gone.contains(&request.pid) {
            return Err(ProcError::NotFound(request.pid));
        }
        if self.protected.contains(&request.pid) {
            return Err(ProcError::PermissionDenied(request.pid));
        }
        Ok(())
    }
}
