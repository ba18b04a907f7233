#![allow(missing_docs, dead_code)]

use jsontok::{Map, Value};

pub const DOCUMENT: &str = r#"
{
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "options": {
            "opt_level": 2,
            "ratio": 0.75,
            "features": ["serde", "tokio"]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")\n"
    ],
    "entities": [
        { "type": "function", "name": "main", "exported": true },
        { "type": "macro", "name": "println", "exported": false }
    ],
    "matrix": [[1, 2], [3, 4], []],
    "reason": null,
    "unicode": "café 😀"
}"#;

/// The same data as [`DOCUMENT`], written the lenient way.
pub const LENIENT: &str = r#"
{
    request: {
        filename: 'example.rs';
        language: rust,
        options: {
            opt_level: 2,
            ratio: 0.75,
            features: [serde, tokio,],
        },
    },
    snippets: [
        'fn main() {}',
        'println!("hi")
',
    ],
    entities: [
        { type: function, name: main, exported: TRUE },
        { type: macro, name: println, exported: False },
    ],
    matrix: [[1, 2], [3, 4], []],
    reason: null,
    unicode: "café 😀",
}"#;

/// Converts a `serde_json` value into the crate's own model so fixtures can
/// be checked against a strict parser.
pub fn from_serde(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Decimal(n.as_f64().expect("finite number")),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(members) => Value::Object(
            members
                .into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect::<Map>(),
        ),
    }
}

pub fn expected_document() -> Value {
    from_serde(serde_json::from_str(DOCUMENT).expect("fixture is strict JSON"))
}

#[test]
fn fixture_is_strict_json() {
    let value = expected_document();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        ["request", "snippets", "entities", "matrix", "reason", "unicode"]
    );
}
