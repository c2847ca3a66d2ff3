//! Signal delivery.

use crate::source::Signaller;
use crate::types::{ProcError, Result, SignalRequest};
use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::trace;

/// Validate a raw signal number against the kernel's range, real-time
/// signals included. `0` only checks that the pid exists.
pub fn check_signal(signum: i32) -> Result<()> {
    if (0..=libc::SIGRTMAX()).contains(&signum) {
        Ok(())
    } else {
        Err(ProcError::InvalidSignal(signum))
    }
}

/// Send signal `signum` to `pid`.
///
/// Non-positive pids are rejected: `kill(2)` treats `0` and `-1` as process
/// group and broadcast targets.
pub fn send_signal(pid: i32, signum: i32) -> Result<()> {
    if pid <= 0 {
        return Err(ProcError::InvalidPid(pid));
    }
    check_signal(signum)?;

    trace!(pid, signal = signum, "sending signal");
    let sent = match signum {
        0 => signal::kill(Pid::from_raw(pid), None),
        _ => match Signal::try_from(signum) {
            Ok(sig) => signal::kill(Pid::from_raw(pid), sig),
            // Real-time signals have no nix::Signal variant
            Err(_) => Errno::result(unsafe { libc::kill(pid, signum) }).map(drop),
        },
    };
    sent.map_err(|errno| match errno {
        Errno::ESRCH => ProcError::NotFound(pid),
        Errno::EPERM => ProcError::PermissionDenied(pid),
        Errno::EINVAL => ProcError::InvalidSignal(signum),
        other => ProcError::Io(other.into()),
    })
}

/// Live [`Signaller`] issuing `kill(2)` through nix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl Signaller for NixSignaller {
    fn send_signal(&self, request: SignalRequest) -> Result<()> {
        send_signal(request.pid, request.signal)
    }
}
