//! Seams between the resolver logic and the operating system.
//!
//! [`ProcSource`] supplies kernel-exposed process state and [`Signaller`]
//! delivers signals. The live implementations are
//! [`ProcfsSource`](crate::ProcfsSource) and [`NixSignaller`](crate::NixSignaller);
//! tests substitute in-memory versions.

use crate::types::{ProcessRecord, Result, SignalRequest};

/// Read-only access to per-process kernel state.
pub trait ProcSource {
    /// Every pid currently visible to the caller, in enumeration order.
    fn list_pids(&self) -> Result<Vec<i32>>;

    /// Read one process in a single pass.
    ///
    /// Fails with `NotFound` if the process has exited and with
    /// `PermissionDenied` if nothing about it can be read.
    fn read_record(&self, pid: i32) -> Result<ProcessRecord>;

    /// Raw NUL-delimited `environ` block.
    fn read_environ(&self, pid: i32) -> Result<Vec<u8>>;

    /// Fails with `ForeignNamespace` unless the pids this source reports name
    /// processes in the caller's own pid namespace, where `kill(2)` on them
    /// reaches the same process.
    fn ensure_local(&self) -> Result<()> {
        Ok(())
    }
}

/// Delivers a signal to a single process.
pub trait Signaller {
    /// Queue `request.signal` for `request.pid`. Returns once the kernel has
    /// accepted the signal, not once the target has handled it.
    fn send_signal(&self, request: SignalRequest) -> Result<()>;
}

impl<T: ProcSource + ?Sized> ProcSource for &T {
    fn list_pids(&self) -> Result<Vec<i32>> {
        (**self).list_pids()
    }

    fn read_record(&self, pid: i32) -> Result<ProcessRecord> {
        (**self).read_record(pid)
    }

    fn read_environ(&self, pid: i32) -> Result<Vec<u8>> {
        (**self).read_environ(pid)
    }

    fn ensure_local(&self) -> Result<()> {
        (**self).ensure_local()
    }
}

impl<T: Signaller + ?Sized> Signaller for &T {
    fn send_signal(&self, request: SignalRequest) -> Result<()> {
        (**self).send_signal(request)
    }
}
