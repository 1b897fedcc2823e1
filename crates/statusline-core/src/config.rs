use crate::error::{Result, StatuslineError};
use crate::width::DEFAULT_EMOJI_WIDTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// StatuslineConfig
// ---------------------------------------------------------------------------

/// Render settings. Passed explicitly into every render call; nothing in the
/// core reads global state for these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatuslineConfig {
    /// Trailing path components shown for the working directory (0 = all).
    #[serde(default = "default_path_segments")]
    pub path_segments: usize,
    /// Append `@hostname` to the user cell.
    #[serde(default = "default_show_host")]
    pub show_host: bool,
    /// Columns counted for each symbol/emoji code point: 1 or 2.
    #[serde(default = "default_emoji_width")]
    pub emoji_width: usize,
    /// Command queried with `--version` for the version cell. `None` disables it.
    #[serde(default = "default_host_tool")]
    pub host_tool: Option<String>,
    /// Per-subprocess timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_path_segments() -> usize {
    3
}

fn default_show_host() -> bool {
    true
}

fn default_emoji_width() -> usize {
    DEFAULT_EMOJI_WIDTH
}

fn default_host_tool() -> Option<String> {
    Some("claude".to_string())
}

fn default_timeout_ms() -> u64 {
    3_000
}

impl Default for StatuslineConfig {
    fn default() -> Self {
        Self {
            path_segments: default_path_segments(),
            show_host: default_show_host(),
            emoji_width: default_emoji_width(),
            host_tool: default_host_tool(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl StatuslineConfig {
    /// Load and validate a YAML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: StatuslineConfig = if data.trim().is_empty() {
            StatuslineConfig::default()
        } else {
            serde_yaml::from_str(&data)?
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded statusline config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.emoji_width, 1 | 2) {
            return Err(StatuslineError::InvalidConfig(format!(
                "emoji_width must be 1 or 2, got {}",
                self.emoji_width
            )));
        }
        if self.timeout_ms == 0 {
            return Err(StatuslineError::InvalidConfig(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The host tool to query, ignoring blank names.
    pub fn host_tool(&self) -> Option<&str> {
        self.host_tool
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
