//! Symbolic signal names.

use crate::process_kill::check_signal;
use crate::types::{ProcError, Result};
use nix::sys::signal::Signal;
use std::str::FromStr;

/// Parse a signal given as a number, a POSIX name with or without the `SIG`
/// prefix (`SIGTERM`, `term`), or a descriptive alias (`terminate`, `hang-up`).
pub fn parse_signal(input: &str) -> Result<i32> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<i32>() {
        check_signal(number)?;
        return Ok(number);
    }

    let alias = match trimmed.to_ascii_lowercase().as_str() {
        "terminate" => Some(Signal::SIGTERM),
        "hang-up" | "hangup" => Some(Signal::SIGHUP),
        "interrupt" => Some(Signal::SIGINT),
        "quit" => Some(Signal::SIGQUIT),
        _ => None,
    };
    if let Some(signal) = alias {
        return Ok(signal as i32);
    }

    let upper = trimmed.to_ascii_uppercase();
    let canonical = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    Signal::from_str(&canonical)
        .map(|signal| signal as i32)
        .map_err(|_| ProcError::UnknownSignalName(input.to_string()))
}

/// `SIGTERM`-style name of `signum`, if the OS defines one.
pub fn signal_name(signum: i32) -> Option<&'static str> {
    Signal::try_from(signum).ok().map(Signal::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_numbers_and_aliases() {
        assert_eq!(parse_signal("SIGTERM").unwrap(), 15);
        assert_eq!(parse_signal("term").unwrap(), 15);
        assert_eq!(parse_signal("terminate").unwrap(), 15);
        assert_eq!(parse_signal("KILL").unwrap(), 9);
        assert_eq!(parse_signal("kill").unwrap(), 9);
        assert_eq!(parse_signal("hang-up").unwrap(), 1);
        assert_eq!(parse_signal(" 2 ").unwrap(), 2);
        assert_eq!(parse_signal("0").unwrap(), 0);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(parse_signal("SIGBOGUS"), Err(ProcError::UnknownSignalName(_))));
        assert!(matches!(parse_signal("777"), Err(ProcError::InvalidSignal(777))));
    }

    #[test]
    fn names_known_signals() {
        assert_eq!(signal_name(9), Some("SIGKILL"));
        assert_eq!(signal_name(0), None);
    }
}
