//! Environment block parsing.

use crate::source::ProcSource;
use crate::types::{EnvironmentSnapshot, Result};
use tracing::trace;

/// Parse a NUL-delimited `environ` block into ordered pairs.
///
/// Each entry is split on its first `=`. Entries without one are skipped.
/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn parse_environ(raw: &[u8]) -> EnvironmentSnapshot {
    let vars = raw
        .split(|&b| b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let Some(eq) = entry.iter().position(|&b| b == b'=') else {
                trace!(entry = %String::from_utf8_lossy(entry), "skipping malformed environ entry");
                return None;
            };
            let key = String::from_utf8_lossy(&entry[..eq]).into_owned();
            let value = String::from_utf8_lossy(&entry[eq + 1..]).into_owned();
            Some((key, value))
        })
        .collect();
    EnvironmentSnapshot::new(vars)
}

/// Read and parse the environment of `pid`.
pub fn read_environment<S>(source: &S, pid: i32) -> Result<EnvironmentSnapshot>
where
    S: ProcSource + ?Sized,
{
    let raw = source.read_environ(pid)?;
    Ok(parse_environ(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(env: &EnvironmentSnapshot) -> Vec<(&str, &str)> {
        env.iter().collect()
    }

    #[test]
    fn parses_in_order() {
        let env = parse_environ(b"A=1\0B=2\0");
        assert_eq!(pairs(&env), vec![("A", "1"), ("B", "2")]);
    }

    #[test]
    fn skips_entries_without_equals() {
        let env = parse_environ(b"A=1\0C\0B=2\0");
        assert_eq!(pairs(&env), vec![("A", "1"), ("B", "2")]);
    }

    #[test]
    fn splits_on_first_equals_only() {
        let env = parse_environ(b"OPTS=a=b=c\0EMPTY=\0");
        assert_eq!(pairs(&env), vec![("OPTS", "a=b=c"), ("EMPTY", "")]);
    }

    #[test]
    fn tolerates_missing_trailing_nul() {
        let env = parse_environ(b"A=1\0B=2");
        assert_eq!(pairs(&env), vec![("A", "1"), ("B", "2")]);
    }

    #[test]
    fn empty_block_is_empty_snapshot() {
        assert!(parse_environ(b"").is_empty());
        assert!(parse_environ(b"\0\0").is_empty());
    }

    #[test]
    fn keeps_duplicate_keys() {
        let env = parse_environ(b"K=first\0K=second\0");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("K"), Some("first"));
    }
}
