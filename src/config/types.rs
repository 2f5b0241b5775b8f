//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FoldResult;

use super::loader::{self, ConfigWarning};

/// Default debounce delay, in microseconds (300ms)
pub const DEFAULT_DELAY_MICROS: u64 = 300_000;

/// Default suffix for folder scans
pub const DEFAULT_SUFFIX: &str = ".json";

/// Root configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Debounce delay in microseconds, shared by every group
    #[serde(default = "default_delay")]
    pub delay: u64,

    /// Ordered watch group specifications
    #[serde(default)]
    pub list: Vec<GroupSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            list: Vec::new(),
        }
    }
}

fn default_delay() -> u64 {
    DEFAULT_DELAY_MICROS
}

/// How a group's sources are turned into watch groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FolderMode {
    /// One group, one output
    #[default]
    Single,
    /// One child group per immediate subdirectory of the fan-out root
    #[serde(alias = "fanOut")]
    Locales,
}

/// Whether directory and file names become keys in the merged tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyStrategy {
    /// Subdirectories are flattened away
    #[default]
    Original,
    /// Subdirectories become namespaces named after the folder
    JoinFolderFile,
}

/// Explicit files and folders watched by a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchList {
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub folders: Vec<PathBuf>,
}

/// One configured watch group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    #[serde(default)]
    pub name: String,

    /// Merged JSON output (a directory for fan-out groups)
    pub output: PathBuf,

    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default)]
    pub folder_type: FolderMode,

    #[serde(default)]
    pub key_type: KeyStrategy,

    #[serde(default)]
    pub ts_interface_output: Option<PathBuf>,

    #[serde(default)]
    pub ts_interface_name: Option<String>,

    #[serde(default)]
    pub key_output: Option<PathBuf>,

    #[serde(default)]
    pub key_value_name: Option<String>,

    #[serde(default)]
    pub key_flatten: bool,

    #[serde(default)]
    pub watch_list: Vec<WatchList>,

    /// Directory whose subdirectories each get a child group
    #[serde(default)]
    pub fan_out_root: Option<PathBuf>,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl GroupSpec {
    /// Create a single-mode group writing to `output`
    pub fn new(name: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            suffix: default_suffix(),
            folder_type: FolderMode::Single,
            key_type: KeyStrategy::Original,
            ts_interface_output: None,
            ts_interface_name: None,
            key_output: None,
            key_value_name: None,
            key_flatten: false,
            watch_list: Vec::new(),
            fan_out_root: None,
        }
    }

    /// Add a watch list entry
    pub fn with_watch(mut self, files: Vec<PathBuf>, folders: Vec<PathBuf>) -> Self {
        self.watch_list.push(WatchList { files, folders });
        self
    }

    /// Set the folder-key strategy
    pub fn with_key_type(mut self, key_type: KeyStrategy) -> Self {
        self.key_type = key_type;
        self
    }

    /// Set the folder scan suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Configure the TypeScript interface stub
    pub fn with_ts_interface(mut self, output: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        self.ts_interface_output = Some(output.into());
        self.ts_interface_name = Some(name.into());
        self
    }

    /// Configure the key export file
    pub fn with_key_export(mut self, output: impl Into<PathBuf>, flatten: bool) -> Self {
        self.key_output = Some(output.into());
        self.key_flatten = flatten;
        self
    }

    /// Switch to fan-out mode
    pub fn with_fan_out(mut self, root: Option<PathBuf>) -> Self {
        self.folder_type = FolderMode::Locales;
        self.fan_out_root = root;
        self
    }

    pub fn is_fan_out(&self) -> bool {
        self.folder_type == FolderMode::Locales
    }

    /// Name used in logs; falls back to the output path
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.output.display().to_string()
        } else {
            self.name.clone()
        }
    }

    /// TS stub output, ignoring empty strings
    pub fn ts_output(&self) -> Option<&Path> {
        self.ts_interface_output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// TS interface name, ignoring empty strings
    pub fn ts_name(&self) -> Option<&str> {
        self.ts_interface_name.as_deref().filter(|n| !n.is_empty())
    }

    /// Key export output, ignoring empty strings
    pub fn key_export_output(&self) -> Option<&Path> {
        self.key_output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Exported constant name for the key file
    pub fn key_export_name(&self) -> &str {
        self.key_value_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_KEY_EXPORT_NAME)
    }

    /// Directory scanned for fan-out children
    pub fn fan_out_source(&self) -> Option<&Path> {
        self.fan_out_root.as_deref().or_else(|| {
            self.watch_list
                .first()
                .and_then(|list| list.folders.first())
                .map(PathBuf::as_path)
        })
    }
}

/// Constant name used when `keyValueName` is not set
pub const DEFAULT_KEY_EXPORT_NAME: &str = "i18nKeys";

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> FoldResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> FoldResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (JSONFOLD_* prefix)
    ///
    /// `JSONFOLD_DELAY` replaces `delay` (microseconds); a value that is
    /// not a number is logged and ignored.
    pub fn with_env_overrides(self) -> Self {
        loader::apply_env_overrides(self)
    }

    /// Debounce delay as a duration
    pub fn delay(&self) -> Duration {
        Duration::from_micros(self.delay)
    }
}
