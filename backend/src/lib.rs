//! Process inspection and signal dispatch for Linux.
//!
//! Enumerates processes, reads their identity and environment from procfs,
//! and delivers signals to single pids or to every process matching a target.
//! Bulk dispatch isolates failures per target. Uses `nix` and `procfs` for
//! system interaction.

mod bulk;
mod config;
mod environ;
mod manager;
mod process_kill;
mod process_list;
mod signals;
mod source;
mod target;
#[cfg(test)]
mod testing;
mod types;
mod users;

pub use bulk::{dispatch_to_matches, dispatch_with, BulkReport, SignalOutcome};
pub use config::{Config, CONFIG_ENV, PROC_ROOT_ENV};
pub use environ::{parse_environ, read_environment};
pub use manager::ProcessManager;
pub use process_kill::{check_signal, send_signal, NixSignaller};
pub use process_list::{ProcfsSource, DEFAULT_PROC_ROOT};
pub use signals::{parse_signal, signal_name};
pub use source::{ProcSource, Signaller};
pub use target::{read_matching, resolve, TargetSpec};
pub use types::{EnvironmentSnapshot, ProcError, ProcessRecord, Result, SignalRequest};
pub use users::{SystemUsers, UserResolver};
