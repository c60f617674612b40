//! Units of dispatched work and their results.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Response format requested from a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Plain text body.
    Text,
    /// Arbitrary JSON value.
    Json,
}

impl Format {
    /// Path segment the server expects for this format.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// One request: ask `plugin` about `argument` in `format`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    pub format: Format,
    pub plugin: String,
    pub argument: String,
}

impl RequestDescriptor {
    pub fn new(format: Format, plugin: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            format,
            plugin: plugin.into(),
            argument: argument.into(),
        }
    }
}

/// Cartesian product of `plugins × arguments`, plugins in the outer loop.
pub fn descriptors(format: Format, plugins: &[String], arguments: &[String]) -> Vec<RequestDescriptor> {
    plugins
        .iter()
        .flat_map(|plugin| {
            arguments
                .iter()
                .map(move |arg| RequestDescriptor::new(format, plugin.as_str(), arg.as_str()))
        })
        .collect()
}

/// Body of one plugin response, or the error that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
    Error(String),
}

impl Payload {
    /// Whether there is nothing worth showing.
    ///
    /// Empty text, and JSON `null`, `false`, `0`, `""`, `[]` or `{}` count
    /// as empty. Errors always carry a message and are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Json(value) => match value {
                Value::Null | Value::Bool(false) => true,
                Value::String(s) => s.is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::Bool(true) => false,
            },
            Self::Error(_) => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Error message, if this payload is an error.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Human-readable body: raw text, pretty JSON, or `Error: <message>`.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(Value::String(s)) => s.clone(),
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Error(message) => format!("Error: {message}"),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Json(value) => value.serialize(serializer),
            Self::Error(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

/// Result of executing one [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub plugin: String,
    pub argument: String,
    pub payload: Payload,
}

impl Outcome {
    pub fn new(descriptor: RequestDescriptor, payload: Payload) -> Self {
        Self {
            plugin: descriptor.plugin,
            argument: descriptor.argument,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn product_is_plugins_outer() {
        let reqs = descriptors(Format::Json, &strings(&["a", "b"]), &strings(&["x", "y"]));
        let pairs: Vec<_> = reqs
            .iter()
            .map(|r| (r.plugin.as_str(), r.argument.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "x"), ("a", "y"), ("b", "x"), ("b", "y")]);
        assert!(reqs.iter().all(|r| r.format == Format::Json));
    }

    #[test]
    fn product_with_empty_side_is_empty() {
        assert!(descriptors(Format::Text, &[], &strings(&["x"])).is_empty());
        assert!(descriptors(Format::Text, &strings(&["a"]), &[]).is_empty());
    }

    #[test]
    fn emptiness_follows_truthiness() {
        assert!(Payload::Text(String::new()).is_empty());
        assert!(Payload::Json(json!(null)).is_empty());
        assert!(Payload::Json(json!({})).is_empty());
        assert!(Payload::Json(json!([])).is_empty());
        assert!(Payload::Json(json!(0)).is_empty());
        assert!(Payload::Json(json!(0.0)).is_empty());
        assert!(!Payload::Json(json!(7)).is_empty());
        assert!(!Payload::Json(json!(-0.5)).is_empty());
        assert!(!Payload::Json(json!({"a": 1})).is_empty());
        assert!(!Payload::Error(String::new()).is_empty());
    }

    #[test]
    fn serializes_errors_as_objects() {
        let value = serde_json::to_value([
            Payload::Text("hi".into()),
            Payload::Json(json!({"ok": true})),
            Payload::Error("boom".into()),
        ])
        .unwrap();
        assert_eq!(value, json!(["hi", {"ok": true}, {"error": "boom"}]));
    }

    #[test]
    fn renders_error_line() {
        assert_eq!(Payload::Error("timeout".into()).render(), "Error: timeout");
        assert_eq!(Payload::Json(json!("plain")).render(), "plain");
    }
}
