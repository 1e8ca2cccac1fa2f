//! Sparse partial updates.
//!
//! A [`Patch`] holds only the fields the caller explicitly provided. Merging it
//! into an existing record replaces exactly those fields; an explicit `null`
//! clears an optional field while an absent key leaves it untouched.

use std::{fmt, marker::PhantomData};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

/// Schema fields of a record family that can be patched.
pub trait Patchable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fields that are fixed once the record exists.
    const IMMUTABLE_FIELDS: &'static [&'static str] = &[];
}

/// Reasons a patch cannot be applied.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("update payload must be a JSON object")]
    NotAnObject,
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{0}` cannot be changed after creation")]
    ImmutableField(String),
    #[error("patched record does not match the schema")]
    InvalidValue {
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode record")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// Explicitly provided field updates for records of type `F`.
pub struct Patch<F> {
    fields: Map<String, Value>,
    schema: PhantomData<fn() -> F>,
}

impl<F> Patch<F> {
    /// An empty patch; merging it is the identity.
    pub fn new() -> Self {
        Self::from_map(Map::new())
    }

    /// Wrap an already sparse JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            schema: PhantomData,
        }
    }

    /// Build a patch from an update payload.
    ///
    /// Only the keys the payload serializes are kept, so update DTOs skip
    /// fields the client did not send.
    pub fn from_update<U: Serialize>(update: &U) -> Result<Self, PatchError> {
        match serde_json::to_value(update).map_err(|source| PatchError::Encode { source })? {
            Value::Object(fields) => Ok(Self::from_map(fields)),
            _ => Err(PatchError::NotAnObject),
        }
    }

    /// Add or replace a field update.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Insert a field update in place.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a field update and return its value.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Whether the patch touches `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Value provided for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the provided fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<F> Default for Patch<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for Patch<F> {
    fn clone(&self) -> Self {
        Self::from_map(self.fields.clone())
    }
}

impl<F> fmt::Debug for Patch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Patch").field(&self.fields).finish()
    }
}

/// Apply `patch` on top of `existing`, returning the merged fields.
///
/// Fields not named by the patch keep their current value. The merged value is
/// decoded back into `F`, so type mismatches surface as
/// [`PatchError::InvalidValue`].
pub fn merge<F: Patchable>(existing: &F, patch: &Patch<F>) -> Result<F, PatchError> {
    let encoded = serde_json::to_value(existing).map_err(|source| PatchError::Encode { source })?;
    let Value::Object(mut current) = encoded else {
        return Err(PatchError::NotAnObject);
    };

    for (field, value) in &patch.fields {
        if F::IMMUTABLE_FIELDS.contains(&field.as_str()) {
            return Err(PatchError::ImmutableField(field.clone()));
        }
        match current.get_mut(field) {
            Some(slot) => *slot = value.clone(),
            None => return Err(PatchError::UnknownField(field.clone())),
        }
    }

    serde_json::from_value(Value::Object(current)).map_err(|source| PatchError::InvalidValue { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        body: Option<String>,
        author: i32,
    }

    impl Patchable for Note {
        const IMMUTABLE_FIELDS: &'static [&'static str] = &["author"];
    }

    fn note() -> Note {
        Note {
            title: "Foo".into(),
            body: Some("Fighters".into()),
            author: 1,
        }
    }

    #[test]
    fn untouched_fields_keep_their_value() {
        let patch = Patch::<Note>::new().set("body", "Bar");
        let merged = merge(&note(), &patch).unwrap();
        assert_eq!(merged.title, "Foo");
        assert_eq!(merged.body.as_deref(), Some("Bar"));
        assert_eq!(merged.author, 1);
    }

    #[test]
    fn empty_patch_is_identity() {
        assert_eq!(merge(&note(), &Patch::new()).unwrap(), note());
    }

    #[test]
    fn explicit_null_clears_optional_field() {
        let patch = Patch::<Note>::new().set("body", Value::Null);
        assert_eq!(merge(&note(), &patch).unwrap().body, None);
    }

    #[test]
    fn unknown_and_immutable_fields_are_rejected() {
        let unknown = Patch::<Note>::new().set("id", 3);
        assert!(matches!(merge(&note(), &unknown), Err(PatchError::UnknownField(f)) if f == "id"));

        let immutable = Patch::<Note>::new().set("author", 2);
        assert!(matches!(
            merge(&note(), &immutable),
            Err(PatchError::ImmutableField(f)) if f == "author"
        ));
    }

    #[test]
    fn mistyped_values_are_rejected() {
        let patch = Patch::<Note>::new().set("title", json!(12));
        assert!(matches!(merge(&note(), &patch), Err(PatchError::InvalidValue { .. })));
    }

    #[test]
    fn from_update_keeps_only_serialized_keys() {
        #[derive(Serialize)]
        struct NoteUpdate {
            #[serde(skip_serializing_if = "Option::is_none")]
            title: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            body: Option<Option<String>>,
        }

        let patch = Patch::<Note>::from_update(&NoteUpdate {
            title: None,
            body: Some(None),
        })
        .unwrap();
        assert!(!patch.contains("title"));
        assert_eq!(patch.get("body"), Some(&Value::Null));
    }
}
