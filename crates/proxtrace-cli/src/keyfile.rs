//! Text key files.
//!
//! One entry per line: a base64 key or identifier, whitespace, and its index
//! (day index for disclosures, capture interval for observations). Blank
//! lines and lines starting with `#` are ignored.
//!
//! ```text
//! # disclosed daily keys
//! AzZ389DsGecAjZqby1sLNQ== 12
//! p7LrsTReTw3k721eIWDjRw== 0
//! ```

use std::{fs, path::Path, str::FromStr};

use proxtrace_core::{DisclosedKeys, ObservedIdentifiers};

use crate::error::CliError;

/// A parsed, not yet decoded, key file line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<'a> {
    line: usize,
    key: &'a str,
    index: &'a str,
}

/// Read a file of disclosed daily keys.
pub fn read_disclosed(path: &Path) -> Result<DisclosedKeys, CliError> {
    let text = fs::read_to_string(path)?;
    parse_disclosed(path, &text)
}

/// Read a file of observed identifiers.
pub fn read_observed(path: &Path) -> Result<ObservedIdentifiers, CliError> {
    let text = fs::read_to_string(path)?;
    parse_observed(path, &text)
}

/// Parse disclosed daily keys; `path` is only used in error messages.
pub fn parse_disclosed(path: &Path, text: &str) -> Result<DisclosedKeys, CliError> {
    let mut disclosed = DisclosedKeys::new();
    for entry in entries(path, text)? {
        let day_index: u32 = parse_index(path, &entry)?;
        disclosed
            .add_disclosure_base64(entry.key, day_index)
            .map_err(|e| key_file_error(path, entry.line, e.to_string()))?;
    }

    tracing::debug!(path = %path.display(), count = disclosed.len(), "loaded disclosed keys");
    Ok(disclosed)
}

/// Parse observed identifiers; `path` is only used in error messages.
pub fn parse_observed(path: &Path, text: &str) -> Result<ObservedIdentifiers, CliError> {
    let mut observed = ObservedIdentifiers::new();
    for entry in entries(path, text)? {
        let interval_index: u8 = parse_index(path, &entry)?;
        observed
            .add_observation_base64(entry.key, interval_index)
            .map_err(|e| key_file_error(path, entry.line, e.to_string()))?;
    }

    tracing::debug!(path = %path.display(), count = observed.len(), "loaded observations");
    Ok(observed)
}

fn entries<'a>(path: &Path, text: &'a str) -> Result<Vec<Entry<'a>>, CliError> {
    let mut entries = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (Some(key), Some(index), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(key_file_error(path, line, "expected `<base64> <index>`".to_string()));
        };

        entries.push(Entry { line, key, index });
    }

    Ok(entries)
}

fn parse_index<T>(path: &Path, entry: &Entry<'_>) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    entry.index.parse().map_err(|e| {
        key_file_error(path, entry.line, format!("invalid index `{}`: {e}", entry.index))
    })
}

fn key_file_error(path: &Path, line: usize, reason: String) -> CliError {
    CliError::KeyFile { path: path.to_path_buf(), line, reason }
}

#[cfg(test)]
mod tests {
    use proxtrace_crypto::DailyKey;

    use super::*;

    fn path() -> &'static Path {
        Path::new("keys.txt")
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n\nAzZ389DsGecAjZqby1sLNQ== 12\n   \np7LrsTReTw3k721eIWDjRw==\t0\n";
        let disclosed = parse_disclosed(path(), text).unwrap();

        let days: Vec<u32> = disclosed.iter().map(DailyKey::day_index).collect();
        assert_eq!(days, vec![12, 0]);
    }

    #[test]
    fn reports_line_of_missing_index() {
        let text = "AzZ389DsGecAjZqby1sLNQ== 12\nAzZ389DsGecAjZqby1sLNQ==\n";
        let err = parse_disclosed(path(), text).unwrap_err();

        assert!(matches!(err, CliError::KeyFile { line: 2, .. }));
    }

    #[test]
    fn rejects_trailing_fields() {
        let err = parse_observed(path(), "GrqeroryZQ+Uvhx10zfKWw== 82 extra\n").unwrap_err();
        assert!(matches!(err, CliError::KeyFile { line: 1, .. }));
    }

    #[test]
    fn rejects_interval_that_does_not_fit() {
        let err = parse_observed(path(), "GrqeroryZQ+Uvhx10zfKWw== 300\n").unwrap_err();
        assert!(err.to_string().contains("invalid index `300`"));
    }

    #[test]
    fn rejects_interval_past_end_of_day() {
        let err = parse_observed(path(), "GrqeroryZQ+Uvhx10zfKWw== 150\n").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn rejects_malformed_key() {
        let err = parse_disclosed(path(), "not-a-key 4\n").unwrap_err();
        assert!(matches!(err, CliError::KeyFile { line: 1, .. }));
    }

    #[test]
    fn parses_observations() {
        let observed =
            parse_observed(path(), "++ucH9hoIkGwCzM+J09faQ== 0\nGrqeroryZQ+Uvhx10zfKWw== 82\n")
                .unwrap();
        assert_eq!(observed.len(), 2);
    }
}
