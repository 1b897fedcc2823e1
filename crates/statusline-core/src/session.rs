use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StatuslineError};

/// Model name shown when the host does not report one.
pub const UNKNOWN_MODEL: &str = "Unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Context the host tool pipes in on every redraw. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInput {
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub model: Option<ModelInfo>,
}

impl SessionInput {
    pub fn parse(input: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        if !value.is_object() {
            return Err(StatuslineError::InvalidInput(
                "expected a JSON object on stdin".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Working directory from the input, else the process's own.
    pub fn working_dir(&self) -> PathBuf {
        match self.cwd.as_deref().filter(|c| !c.is_empty()) {
            Some(cwd) => PathBuf::from(cwd),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_ref()
            .and_then(|m| m.display_name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_fields_and_ignores_extras() {
        let input = r#"{
            "session_id": "abc",
            "cwd": "/work/statusline",
            "model": { "id": "m-1", "display_name": "Opus" },
            "workspace": { "current_dir": "/work" }
        }"#;
        let session = SessionInput::parse(input).unwrap();
        assert_eq!(session.working_dir(), PathBuf::from("/work/statusline"));
        assert_eq!(session.model_name(), "Opus");
    }

    #[test]
    fn missing_fields_fall_back() {
        let session = SessionInput::parse("{}").unwrap();
        assert_eq!(session.model_name(), UNKNOWN_MODEL);
        assert_eq!(session.working_dir(), std::env::current_dir().unwrap());

        let session = SessionInput::parse(r#"{"model": {}}"#).unwrap();
        assert_eq!(session.model_name(), UNKNOWN_MODEL);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SessionInput::parse("not json").is_err());
        assert!(SessionInput::parse("").is_err());
        assert!(SessionInput::parse(r#"{"cwd": "/x""#).is_err());
    }

    #[test]
    fn non_object_is_invalid_input() {
        let err = SessionInput::parse("[1, 2]").unwrap_err();
        assert!(matches!(err, StatuslineError::InvalidInput(_)));
    }

    #[test]
    fn wrong_field_types_are_rejected() {
        assert!(SessionInput::parse(r#"{"cwd": 42}"#).is_err());
    }
}
