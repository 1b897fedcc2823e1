use serde::Serialize;
use std::io::Write;

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// The single line printed in place of the statusline when anything fails.
pub fn error_line(message: &str) -> String {
    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    let message = if message.is_empty() {
        "unknown error".to_string()
    } else {
        message
    };
    format!("[Statusline Error: {message}]")
}

/// Write `text` plus a newline to stdout. A closed pipe is ignored.
pub fn emit(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_wraps_message() {
        assert_eq!(
            error_line("expected value at line 1 column 1"),
            "[Statusline Error: expected value at line 1 column 1]"
        );
    }

    #[test]
    fn error_line_is_single_line() {
        let line = error_line("invalid config:\n  emoji_width must be 1 or 2");
        assert!(!line.contains('\n'));
        assert_eq!(line, "[Statusline Error: invalid config: emoji_width must be 1 or 2]");
    }

    #[test]
    fn empty_message_still_has_text() {
        assert_eq!(error_line("  "), "[Statusline Error: unknown error]");
    }

    #[test]
    fn json_is_pretty() {
        let json = to_json(&serde_json::json!({"branch": "main"})).unwrap();
        assert!(json.contains("\n"));
        assert!(json.contains("\"branch\": \"main\""));
    }
}
