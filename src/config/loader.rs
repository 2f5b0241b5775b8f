//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FoldError, FoldResult};

use super::types::Config;

/// Non-fatal configuration warning surfaced in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> FoldResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| FoldError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (config, warnings) = parse_with_warnings(&content, path)?;
    Ok((config.with_env_overrides(), warnings))
}

/// Parse a configuration document, reporting unknown keys instead of rejecting them.
pub fn parse_with_warnings(content: &str, path: &Path) -> FoldResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(content);

    let config: Config = serde_ignored::deserialize(&mut deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .and_then(|config| deserializer.end().map(|()| config))
    .map_err(|source| FoldError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (JSONFOLD_* prefix)
pub(super) fn apply_env_overrides(mut config: Config) -> Config {
    // JSONFOLD_DELAY (microseconds)
    if let Ok(delay) = std::env::var("JSONFOLD_DELAY") {
        match delay.trim().parse::<u64>() {
            Ok(value) => config.delay = value,
            Err(_) => tracing::warn!(value = %delay, "ignoring non-numeric JSONFOLD_DELAY"),
        }
    }

    config
}

/// Keys a config document may hold, at any level
const KNOWN_KEYS: &[&str] = &[
    "delay",
    "list",
    "name",
    "output",
    "suffix",
    "folderType",
    "keyType",
    "tsInterfaceOutput",
    "tsInterfaceName",
    "keyOutput",
    "keyValueName",
    "keyFlatten",
    "watchList",
    "files",
    "folders",
    "fanOutRoot",
];

/// 1-based line of the first occurrence of `"key"`
fn find_line_number(content: &str, key: &str) -> Option<usize> {
    let quoted = format!("\"{key}\"");
    content
        .lines()
        .position(|line| line.contains(&quoted))
        .map(|index| index + 1)
}

/// Closest known key within two edits; ties go to the earlier key.
fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|key| (edit_distance(unknown, key), *key))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, key)| key.to_string())
}

/// Character-level edit distance, one row at a time
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}
