use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::storage::FilterValue;

/// Stored document: schema fields plus the `_id` the driver indexes on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDocument<F> {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub fields: F,
}

pub fn doc_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn filter_value(value: FilterValue) -> Bson {
    match value {
        FilterValue::Int(value) => Bson::Int64(value),
        FilterValue::Text(value) => Bson::String(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GameFields;
    use mongodb::bson;
    use serde_json::json;

    #[test]
    fn documents_keep_fields_at_top_level() {
        let id = ObjectId::new();
        let document = MongoDocument {
            id,
            fields: GameFields {
                date: "2024-03-01".into(),
                games: json!({ "round": 1, "players": ["ana", "bo"] }),
            },
        };

        let encoded = bson::serialize_to_document(&document).unwrap();
        assert_eq!(encoded.get_object_id("_id").unwrap(), id);
        assert_eq!(encoded.get_str("date").unwrap(), "2024-03-01");
        assert!(encoded.get_document("games").is_ok());

        let decoded: MongoDocument<GameFields> = bson::deserialize_from_document(encoded).unwrap();
        assert_eq!(decoded.fields, document.fields);
    }
}
