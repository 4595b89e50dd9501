//! Splits free-form ingredient text into individual entries.

use serde_json::Value;

use super::PipelineError;

/// Separators tried in order; the first one present in the text wins.
const SEPARATORS: [&str; 3] = [",", "\n", "/s"];

/// Split ingredient text into trimmed entries.
///
/// Empty entries are kept and nothing is de-duplicated.
pub fn normalize(raw: &Value) -> Result<Vec<String>, PipelineError> {
    let Value::String(text) = raw else {
        return Err(PipelineError::InvalidInput(format!(
            "expected ingredients as text, got {}",
            json_kind(raw)
        )));
    };
    Ok(split_entries(text))
}

fn split_entries(text: &str) -> Vec<String> {
    match SEPARATORS.iter().find(|sep| text.contains(*sep)) {
        Some(sep) => text.split(sep).map(|s| s.trim().to_string()).collect(),
        None => vec![text.trim().to_string()],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(s: &str) -> Vec<String> {
        normalize(&json!(s)).unwrap()
    }

    #[test]
    fn test_comma_split_is_trimmed() {
        assert_eq!(split("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_newline_split() {
        assert_eq!(split("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_comma_wins_over_newline() {
        assert_eq!(split("eggs, milk\nflour"), vec!["eggs", "milk\nflour"]);
    }

    #[test]
    fn test_newline_wins_over_slash_s() {
        assert_eq!(split("salt/spepper\noil"), vec!["salt/spepper", "oil"]);
    }

    #[test]
    fn test_slash_s_split() {
        assert_eq!(split("rice/s beans /s corn"), vec!["rice", "beans", "corn"]);
    }

    #[test]
    fn test_single_ingredient() {
        assert_eq!(split("  one big potato "), vec!["one big potato"]);
    }

    #[test]
    fn test_empty_entries_are_kept() {
        assert_eq!(split("a,,b, "), vec!["a", "", "b", ""]);
        assert_eq!(split(""), vec![""]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(split("egg, egg"), vec!["egg", "egg"]);
    }

    #[test]
    fn test_non_string_is_invalid_input() {
        assert!(matches!(
            normalize(&json!(42)),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            normalize(&Value::Null),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            normalize(&json!(["a", "b"])),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
