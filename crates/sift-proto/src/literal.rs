//! Raw operand literals as they appear in a filter document.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// An untyped scalar operand, before coercion to a field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal, kept in its JSON form.
    Number(serde_json::Number),
    /// String literal.
    Text(String),
}

impl Literal {
    /// Convert a JSON value into a literal. Returns `None` for `null`,
    /// arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Literal::Bool(*b)),
            serde_json::Value::Number(n) => Some(Literal::Number(n.clone())),
            serde_json::Value::String(s) => Some(Literal::Text(s.clone())),
            _ => None,
        }
    }

    /// The textual form the coercer parses.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Literal::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Literal::Number(n) => Cow::Owned(n.to_string()),
            Literal::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Short name of the JSON type this literal came from.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "bool",
            Literal::Number(_) => "number",
            Literal::Text(_) => "string",
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.text()),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars_only() {
        assert_eq!(Literal::from_json(&json!(10)), Some(Literal::from(10i64)));
        assert_eq!(Literal::from_json(&json!("x")), Some(Literal::from("x")));
        assert_eq!(Literal::from_json(&json!(false)), Some(Literal::from(false)));
        assert_eq!(Literal::from_json(&json!(null)), None);
        assert_eq!(Literal::from_json(&json!([1])), None);
        assert_eq!(Literal::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Literal::from_json(&json!(33.2)).unwrap().text(), "33.2");
        assert_eq!(Literal::from_json(&json!(-4)).unwrap().text(), "-4");
        assert_eq!(Literal::Bool(true).text(), "true");
        assert_eq!(Literal::from("2024-05-01").text(), "2024-05-01");
    }

    #[test]
    fn test_number_text_is_kept_as_written() {
        let parsed: serde_json::Value =
            serde_json::from_str("[12345678901234567.89, -0]").unwrap();
        let texts: Vec<String> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|v| Literal::from_json(v).unwrap().text().into_owned())
            .collect();
        assert_eq!(texts, vec!["12345678901234567.89", "-0"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::from("Bob").to_string(), "\"Bob\"");
        assert_eq!(Literal::from(7i64).to_string(), "7");
    }
}
