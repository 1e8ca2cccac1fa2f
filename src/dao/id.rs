//! Record identifiers shared by every storage family.
//!
//! Each backend addresses records differently: relational tables use an
//! auto-incremented integer, MongoDB documents use a 12-byte `ObjectId`
//! rendered as 24 hexadecimal characters, and the key-value store uses an
//! opaque key generated per record. [`RecordId`] lets the CRUD engine treat all
//! of them uniformly while the boundary parses the external string form.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length accepted for a key-value record key.
const MAX_HASH_KEY_LEN: usize = 64;

/// Family an identifier belongs to, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Integer assigned by the relational database on insert.
    Sequence,
    /// 24 hexadecimal character document identifier.
    Document,
    /// Opaque key addressing a key-value record.
    HashKey,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IdKind::Sequence => "sequence",
            IdKind::Document => "document",
            IdKind::HashKey => "key",
        };
        f.write_str(label)
    }
}

/// Raised when an external identifier cannot be converted to its internal form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} identifier `{raw}`: {reason}")]
pub struct InvalidId {
    /// Identifier family that rejected the value.
    pub kind: IdKind,
    /// Raw value as received.
    pub raw: String,
    /// Human readable rejection reason.
    pub reason: &'static str,
}

impl InvalidId {
    fn new(kind: IdKind, raw: &str, reason: &'static str) -> Self {
        Self {
            kind,
            raw: raw.to_owned(),
            reason,
        }
    }
}

/// Identifier usable as the primary key of a stored record.
pub trait RecordId: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {
    /// Family of this identifier.
    const KIND: IdKind;

    /// Parse the external (path / payload) representation.
    fn parse(raw: &str) -> Result<Self, InvalidId>;
}

impl RecordId for i32 {
    const KIND: IdKind = IdKind::Sequence;

    fn parse(raw: &str) -> Result<Self, InvalidId> {
        let value = raw
            .parse::<i32>()
            .map_err(|_| InvalidId::new(Self::KIND, raw, "expected a decimal integer"))?;
        if value <= 0 {
            return Err(InvalidId::new(
                Self::KIND,
                raw,
                "expected a strictly positive integer",
            ));
        }
        Ok(value)
    }
}

/// MongoDB document identifier exposed as a 24 character hexadecimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Underlying BSON object id.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for DocumentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0.to_hex()
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl RecordId for DocumentId {
    const KIND: IdKind = IdKind::Document;

    fn parse(raw: &str) -> Result<Self, InvalidId> {
        if raw.len() != 24 {
            return Err(InvalidId::new(
                Self::KIND,
                raw,
                "expected exactly 24 hexadecimal characters",
            ));
        }
        if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidId::new(
                Self::KIND,
                raw,
                "expected only hexadecimal characters",
            ));
        }
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidId::new(Self::KIND, raw, "not a valid object id"))
    }
}

/// Opaque key of a key-value record.
///
/// The key is the only way to address such a record; the storage key is the
/// model name and this key joined by `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashKey(String);

impl HashKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Key as stored by the backend for the given model namespace.
    pub fn storage_key(&self, model: &str) -> String {
        format!("{model}:{}", self.0)
    }

    /// Recover a key from a namespaced storage key.
    pub fn from_storage_key(model: &str, storage_key: &str) -> Result<Self, InvalidId> {
        let key = storage_key
            .strip_prefix(model)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| InvalidId::new(Self::KIND, storage_key, "missing model prefix"))?;
        Self::parse(key)
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<HashKey> for String {
    fn from(value: HashKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for HashKey {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl RecordId for HashKey {
    const KIND: IdKind = IdKind::HashKey;

    fn parse(raw: &str) -> Result<Self, InvalidId> {
        if raw.is_empty() {
            return Err(InvalidId::new(Self::KIND, raw, "key must not be empty"));
        }
        if raw.len() > MAX_HASH_KEY_LEN {
            return Err(InvalidId::new(Self::KIND, raw, "key is too long"));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidId::new(
                Self::KIND,
                raw,
                "key must be ASCII alphanumeric",
            ));
        }
        Ok(Self(raw.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_must_be_positive_integers() {
        assert_eq!(<i32 as RecordId>::parse("42"), Ok(42));
        assert!(<i32 as RecordId>::parse("0").is_err());
        assert!(<i32 as RecordId>::parse("-3").is_err());
        assert!(<i32 as RecordId>::parse("abc").is_err());
        assert!(<i32 as RecordId>::parse("").is_err());
    }

    #[test]
    fn document_ids_round_trip_through_hex() {
        let id = DocumentId::generate();
        let parsed = DocumentId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_document_ids_are_rejected() {
        let too_short = DocumentId::parse("507f1f77bcf86cd79943901").unwrap_err();
        assert_eq!(too_short.kind, IdKind::Document);
        assert!(DocumentId::parse("507f1f77bcf86cd79943901z").is_err());
        assert!(DocumentId::parse("507f1f77bcf86cd7994390111").is_err());
        assert!(DocumentId::parse("507f1f77bcf86cd799439011").is_ok());
    }

    #[test]
    fn document_ids_deserialize_with_validation() {
        let ok: DocumentId = serde_json::from_str("\"507f1f77bcf86cd799439011\"").unwrap();
        assert_eq!(ok.to_string(), "507f1f77bcf86cd799439011");
        assert!(serde_json::from_str::<DocumentId>("\"nope\"").is_err());
    }

    #[test]
    fn hash_keys_are_namespaced_by_model() {
        let key = HashKey::generate();
        let storage = key.storage_key("kv_item");
        assert!(storage.starts_with("kv_item:"));
        assert_eq!(HashKey::from_storage_key("kv_item", &storage).unwrap(), key);
        assert!(HashKey::from_storage_key("other", &storage).is_err());
    }

    #[test]
    fn hash_keys_reject_separators_and_empty_values() {
        assert!(HashKey::parse("").is_err());
        assert!(HashKey::parse("a:b").is_err());
        assert!(HashKey::parse(&"a".repeat(65)).is_err());
        assert!(HashKey::parse("01HF3ZK9Q2").is_ok());
    }

    #[test]
    fn rejections_report_the_identifier_family() {
        fn rejected_kind<T: RecordId>(raw: &str) -> IdKind {
            T::parse(raw).unwrap_err().kind
        }
        assert_eq!(rejected_kind::<i32>("abc"), <i32 as RecordId>::KIND);
        assert_eq!(rejected_kind::<DocumentId>("nope"), DocumentId::KIND);
        assert_eq!(rejected_kind::<HashKey>("a:b"), HashKey::KIND);
        assert_eq!(
            HashKey::from_storage_key("kv_item", "other:abc").unwrap_err().kind,
            IdKind::HashKey
        );
    }
}
