use serde_json::Value;
use crate::types::Metadata;

/// Marks the boundary between a page body and its metadata record
pub const SENTINEL: &str = "#####-----|+|-|-|+|-----#####";

const BOM: char = '\u{feff}';

/// A stored record split back into its parts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedPage {
    pub content: String,
    pub metadata: Metadata,
}

fn delimiter() -> String {
    format!("\n{}\n", SENTINEL)
}

/// Join a body and its metadata into the on-disk record
pub fn encode(content: &str, metadata: &Metadata) -> Vec<u8> {
    // A map of strings always serializes
    let json = serde_json::to_string(metadata).unwrap_or_else(|_| "{}".to_string());
    let mut out = Vec::with_capacity(content.len() + SENTINEL.len() + json.len() + 2);
    out.extend_from_slice(content.as_bytes());
    out.extend_from_slice(delimiter().as_bytes());
    out.extend_from_slice(json.as_bytes());
    out
}

/// Split a stored record into body and metadata. Never fails.
///
/// The split happens at the last delimiter: compact JSON cannot contain a raw
/// newline, so the last one is always the one `encode` wrote and bodies that
/// quote the sentinel survive intact.
pub fn decode(raw: &[u8]) -> DecodedPage {
    let text = String::from_utf8_lossy(raw);
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    match text.rfind(&delimiter()) {
        Some(pos) => {
            let tail = &text[pos + delimiter().len()..];
            DecodedPage {
                content: text[..pos].to_string(),
                metadata: parse_metadata_json(tail),
            }
        }
        None => DecodedPage { content: text.to_string(), metadata: Metadata::new() },
    }
}

/// Lenient metadata parsing shared by the decoder and the edit form.
///
/// Blank input is an empty map. Non-string scalar values keep their JSON
/// text, `null` and nested values are dropped, and anything that is not a
/// JSON object degrades to an empty map with a warning.
pub fn parse_metadata_json(text: &str) -> Metadata {
    let text = text.trim();
    if text.is_empty() {
        return Metadata::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Bool(_) | Value::Number(_) => Some((key, value.to_string())),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    log::warn!("Dropping non-scalar metadata value for key '{}'", key);
                    None
                }
            })
            .collect(),
        Ok(other) => {
            log::warn!("Metadata is not a JSON object (found {}), ignoring it", kind_of(&other));
            Metadata::new()
        }
        Err(e) => {
            log::warn!("Malformed page metadata, falling back to empty: {}", e);
            Metadata::new()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode("# Hello\n**World**", &meta(&[("tags", "intro")]));
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "# Hello\n**World**\n#####-----|+|-|-|+|-----#####\n{\"tags\":\"intro\"}"
        );
    }

    #[test]
    fn test_encode_empty_metadata() {
        let bytes = encode("", &Metadata::new());
        assert_eq!(String::from_utf8(bytes).unwrap(), "\n#####-----|+|-|-|+|-----#####\n{}");
    }

    #[test]
    fn test_round_trip() {
        let metadata = meta(&[("tags", "intro, rust"), ("quote", "\"hi\"\nthere"), ("lang", "ar")]);
        let content = "line one\r\nline two\n\n[[Link]] **bold**";
        let decoded = decode(&encode(content, &metadata));
        assert_eq!(decoded.content, content);
        assert_eq!(decoded.metadata, metadata);
    }

    #[test]
    fn test_body_quoting_the_sentinel_survives() {
        let content = format!("before\n{}\n{{\"fake\":\"x\"}}\nafter", SENTINEL);
        let metadata = meta(&[("real", "yes")]);
        let decoded = decode(&encode(&content, &metadata));
        assert_eq!(decoded.content, content);
        assert_eq!(decoded.metadata, metadata);
    }

    #[test]
    fn test_missing_delimiter_is_all_content() {
        let decoded = decode(b"just some text\nwith lines");
        assert_eq!(decoded.content, "just some text\nwith lines");
        assert!(decoded.metadata.is_empty());
    }

    #[test]
    fn test_malformed_json_keeps_content() {
        let raw = format!("body\n{}\n{{not json", SENTINEL);
        let decoded = decode(raw.as_bytes());
        assert_eq!(decoded.content, "body");
        assert!(decoded.metadata.is_empty());
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let raw = format!("\u{feff}body\n{}\n{{\"a\":\"b\"}}", SENTINEL);
        let decoded = decode(raw.as_bytes());
        assert_eq!(decoded.content, "body");
        assert_eq!(decoded.metadata, meta(&[("a", "b")]));
    }

    #[test]
    fn test_non_string_values_degrade_per_key() {
        let parsed = parse_metadata_json(r#"{"n": 3, "ok": true, "s": "x", "gone": null, "list": [1]}"#);
        assert_eq!(parsed, meta(&[("n", "3"), ("ok", "true"), ("s", "x")]));
    }

    #[test]
    fn test_blank_and_non_object_metadata() {
        assert!(parse_metadata_json("   ").is_empty());
        assert!(parse_metadata_json("[1, 2]").is_empty());
        assert!(parse_metadata_json("\"text\"").is_empty());
    }
}
