//! Process table rendering with filtering and sorting.

use clap::ValueEnum;
use procman::ProcessRecord;
use std::cmp::Ordering;
use std::fmt::Write;

/// Keep processes whose name or pid contains `search_text`, ignoring case.
pub fn filter_processes(processes: Vec<ProcessRecord>, search_text: &str) -> Vec<ProcessRecord> {
    if search_text.is_empty() {
        return processes;
    }

    let search_lower = search_text.to_lowercase();
    processes
        .into_iter()
        .filter(|p| {
            p.name().to_lowercase().contains(&search_lower)
                || p.pid().to_string().contains(&search_lower)
        })
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    #[default]
    Pid,
    Name,
    Euid,
    Ruid,
    Exe,
}

pub struct ProcessTable {
    pub sort_column: SortColumn,
    pub sort_descending: bool,
}

impl ProcessTable {
    pub fn new(sort_column: SortColumn, sort_descending: bool) -> Self {
        Self {
            sort_column,
            sort_descending,
        }
    }

    pub fn sort(&self, processes: &mut [ProcessRecord]) {
        processes.sort_by(|a, b| {
            let ord = match self.sort_column {
                SortColumn::Pid => a.pid().cmp(&b.pid()),
                SortColumn::Name => a.name().cmp(b.name()),
                SortColumn::Euid => a.euid().cmp(&b.euid()),
                SortColumn::Ruid => a.ruid().cmp(&b.ruid()),
                SortColumn::Exe => ord_exe(a, b),
            };
            if self.sort_descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    /// Fixed-width table, one row per process.
    pub fn render(&self, processes: &[ProcessRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>8} {:>6} {:>6} {:<15} EXE", "PID", "EUID", "RUID", "NAME");
        for p in processes {
            let exe = p.exe().map(|e| e.display().to_string()).unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:>8} {:>6} {:>6} {:<15} {}",
                p.pid(),
                p.euid(),
                p.ruid(),
                p.name(),
                exe
            );
        }
        out
    }
}

// Processes without an exe sort last
fn ord_exe(a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
    match (a.exe(), b.exe()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
