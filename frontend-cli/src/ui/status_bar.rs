//! Summary lines printed under tables and bulk reports.

use procman::{BulkReport, ProcessRecord};

pub struct StatusBar;

impl StatusBar {
    pub fn processes(total: usize, shown: &[ProcessRecord], uid: u32) -> String {
        let mut parts = vec![format!("Total processes: {total}")];
        if shown.len() != total {
            parts.push(format!("Shown: {}", shown.len()));
        }
        let owned = shown.iter().filter(|p| p.is_owned_by(uid)).count();
        parts.push(format!("Owned by uid {uid}: {owned}"));
        parts.join(" | ")
    }

    pub fn bulk(report: &BulkReport) -> String {
        let signal = procman::signal_name(report.signal)
            .map(str::to_string)
            .unwrap_or_else(|| report.signal.to_string());
        format!(
            "{signal}: matched {}, delivered {}, failed {}",
            report.matched(),
            report.delivered(),
            report.matched() - report.delivered()
        )
    }
}
