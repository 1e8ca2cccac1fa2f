use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{GameFields, GameRecord},
    dto::validation::validate_not_blank,
};

/// New games document.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GameCreate {
    /// Calendar date, e.g. `11-22-2022`.
    #[validate(custom(function = "validate_not_blank"))]
    pub date: String,
    /// Arbitrary JSON payload.
    #[schema(value_type = Object)]
    pub games: Value,
}

impl From<GameCreate> for GameFields {
    fn from(value: GameCreate) -> Self {
        Self {
            date: value.date,
            games: value.games,
        }
    }
}

/// Partial games update.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct GameUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub date: Option<String>,
    /// Absent keeps the payload, `null` stores `null`.
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub games: Option<Option<Value>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    /// 24 character hexadecimal document id.
    pub id: String,
    pub date: String,
    #[schema(value_type = Object)]
    pub games: Value,
}

impl From<GameRecord> for GameResponse {
    fn from(value: GameRecord) -> Self {
        Self {
            id: value.id.to_string(),
            date: value.fields.date,
            games: value.fields.games,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::patch::{self, Patch};
    use serde_json::json;

    fn stored() -> GameFields {
        GameFields {
            date: "11-22-2022".into(),
            games: json!({ "rounds": [1, 2] }),
        }
    }

    #[test]
    fn test_update_merges_date_and_keeps_absent_payload() {
        let update: GameUpdate = serde_json::from_value(json!({ "date": "11-23-2022" })).unwrap();
        assert_eq!(update.games, None);
        let patch = Patch::<GameFields>::from_update(&update).unwrap();
        assert!(!patch.contains("games"));

        let merged = patch::merge(&stored(), &patch).unwrap();
        assert_eq!(merged.date, "11-23-2022");
        assert_eq!(merged.games, json!({ "rounds": [1, 2] }));
    }

    #[test]
    fn test_update_with_null_games_stores_null() {
        let update: GameUpdate = serde_json::from_value(json!({ "games": null })).unwrap();
        assert_eq!(update.games, Some(None));
        let patch = Patch::<GameFields>::from_update(&update).unwrap();
        assert_eq!(patch.get("games"), Some(&Value::Null));

        let merged = patch::merge(&stored(), &patch).unwrap();
        assert_eq!(merged.date, "11-22-2022");
        assert_eq!(merged.games, Value::Null);
    }

    #[test]
    fn test_update_replaces_games_payload() {
        let update = GameUpdate {
            date: None,
            games: Some(Some(json!([{ "winner": "ana" }]))),
        };
        let patch = Patch::<GameFields>::from_update(&update).unwrap();
        let merged = patch::merge(&stored(), &patch).unwrap();
        assert_eq!(merged.games, json!([{ "winner": "ana" }]));
    }
}
