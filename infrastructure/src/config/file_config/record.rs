//! Run recording configuration from TOML (`[record]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw run-recording configuration from TOML
///
/// ```toml
/// [record]
/// path = "~/.local/share/llm-consensus/runs.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecordConfig {
    /// JSONL file receiving one line per completed run; disabled when unset
    pub path: Option<PathBuf>,
}

impl FileRecordConfig {
    /// Configured path with a leading `~/` expanded to the home directory
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}
