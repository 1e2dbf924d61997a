// Record codec: request collections to and from their durable JSON form.
//
// Decoding is best-effort. A corrupt store must never stop the user from
// saving new requests, so every failure degrades to "fewer records" instead
// of an error. Any JSON object is a record: fields the core cannot read are
// kept raw and written back unchanged.

use serde_json::Value;
use tracing::warn;

use crate::types::RequestRecord;

/// Ordered request records of one scope.
pub type Collection = Vec<RequestRecord>;

/// Encode a collection as pretty-printed JSON with a trailing newline.
pub fn encode(collection: &[RequestRecord]) -> Vec<u8> {
    let value = encode_value(collection);
    // Serializing a `Value` cannot fail: map keys are always strings.
    let mut bytes = serde_json::to_vec_pretty(&value).unwrap_or_else(|_| b"[]".to_vec());
    bytes.push(b'\n');
    bytes
}

/// Encode a collection as a JSON array, dropping the transient `scope` tag.
pub fn encode_value(collection: &[RequestRecord]) -> Value {
    let records = collection
        .iter()
        .map(|record| {
            let mut stored = record.clone();
            stored.scope = None;
            serde_json::to_value(stored).unwrap_or(Value::Null)
        })
        .filter(|value| !value.is_null())
        .collect();
    Value::Array(records)
}

/// Decode durable bytes. Malformed JSON or a non-array top level yields `[]`.
pub fn decode(bytes: &[u8]) -> Collection {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => decode_value(value),
        Err(error) => {
            warn!(%error, "request store is not valid JSON; treating it as empty");
            Vec::new()
        }
    }
}

/// Decode an already-parsed JSON value with the same recovery rules as [`decode`].
pub fn decode_value(value: Value) -> Collection {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => {
            warn!(kind = json_kind(&other), "request store is not a JSON array; treating it as empty");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, kind = json_kind(&item), "skipping non-object entry in request store");
            continue;
        }
        match serde_json::from_value::<RequestRecord>(item) {
            Ok(record) => records.push(record),
            Err(error) => warn!(index, %error, "skipping unreadable entry in request store"),
        }
    }
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scope;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn encode_is_pretty_with_trailing_newline() {
        let bytes = encode(&[RequestRecord::new("GET", "https://example.com").with_id("a")]);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n"));
        assert!(text.ends_with("]\n"));
        assert!(text.contains("  {"));
    }

    #[test]
    fn encode_strips_scope_tag() {
        let record = RequestRecord::new("GET", "/a").with_id("a").with_scope(Scope::Project);
        let value = encode_value(&[record]);
        assert_eq!(value, json!([{ "id": "a", "method": "GET", "url": "/a" }]));
    }

    #[test]
    fn empty_input_decodes_to_empty() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"  \n").is_empty());
    }

    #[test]
    fn non_array_top_level_decodes_to_empty() {
        assert!(decode(br#"{"id":"a"}"#).is_empty());
        assert!(decode(b"42").is_empty());
        assert!(decode(b"null").is_empty());
    }

    #[test]
    fn truncated_json_decodes_to_empty() {
        assert!(decode(br#"[{"id":"a","method":"GET""#).is_empty());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let records = decode(br#"[1, "two", {"id":"a","url":"/a"}, null]"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some("a"));
    }

    #[test]
    fn entries_with_odd_field_shapes_survive_reencoding() {
        let stored = json!([
            { "id": "keep1", "name": { "en": "Users" }, "method": "GET", "url": "/users" },
            { "id": "keep2", "scope": "Workspace", "method": "GET", "url": "/w" },
            { "id": { "nested": true }, "url": 42 },
            { "id": "keep3", "method": "GET", "url": "/ok" }
        ]);
        let records = decode_value(stored.clone());
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].label(), "GET /users");
        assert_eq!(records[1].scope, None);
        assert_eq!(records[2].id, None);
        assert_eq!(encode_value(&records), stored);
    }

    #[test]
    fn legacy_entry_with_scope_field_loads() {
        let records = decode(br#"[{"id":"a","scope":"project","method":"GET","url":"/"}]"#);
        assert_eq!(records[0].scope, Some(Scope::Project));
    }

    fn opaque_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            ".{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 8, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    fn record() -> impl Strategy<Value = RequestRecord> {
        (
            "[a-f0-9]{1,12}",
            proptest::option::of(".{0,16}"),
            proptest::option::of("[A-Z]{1,7}"),
            proptest::option::of(".{0,32}"),
            prop::collection::btree_map("x_[a-z]{1,8}", opaque_value(), 0..4),
        )
            .prop_map(|(id, name, method, url, extra)| RequestRecord {
                id: Some(id),
                name,
                method,
                url,
                scope: None,
                extra: extra.into_iter().collect(),
            })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(collection in prop::collection::vec(record(), 0..6)) {
            prop_assert_eq!(decode(&encode(&collection)), collection);
        }

        #[test]
        fn decode_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode(&bytes);
        }

        #[test]
        fn decode_of_non_json_text_is_empty(text in "[a-zA-Z !?]{1,64}") {
            prop_assert!(decode(text.as_bytes()).is_empty());
        }
    }
}
