use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound appended to a prefix to build an `_all_docs` key range.
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<CouchEntry>,
}

/// Document wrapping one key-value entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_entries_omit_revision() {
        let entry = CouchEntry {
            id: "kv_item:abc".into(),
            rev: None,
            value: json!({ "name": "foo" }),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "_id": "kv_item:abc", "value": { "name": "foo" } })
        );
    }

    #[test]
    fn all_docs_rows_parse_included_documents() {
        let payload = json!({
            "total_rows": 1,
            "rows": [{
                "id": "kv_item:abc",
                "key": "kv_item:abc",
                "doc": { "_id": "kv_item:abc", "_rev": "1-x", "value": { "name": "foo" } }
            }]
        });
        let parsed: AllDocsResponse = serde_json::from_value(payload).unwrap();
        let doc = parsed.rows[0].doc.as_ref().unwrap();
        assert_eq!(doc.rev.as_deref(), Some("1-x"));
        assert_eq!(doc.value["name"], "foo");
    }
}
