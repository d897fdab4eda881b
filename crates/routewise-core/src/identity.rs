//! # Identifier Shapes
//!
//! The audit log refers to other entities by opaque identifiers. Two shapes
//! matter when deciding whether a string is an identifier rather than free
//! text: 24-character hexadecimal object ids, and UUIDs used for embedded
//! collection items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a hexadecimal object identifier.
pub const OBJECT_ID_LEN: usize = 24;

/// A 24-character hexadecimal object identifier.
///
/// Case is preserved so the identifier can be used verbatim as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse an object id, returning `None` for anything that is not exactly
    /// 24 ASCII hex digits.
    pub fn parse(s: &str) -> Option<Self> {
        Self::is_valid(s).then(|| Self(s.to_string()))
    }

    /// Whether `s` has the object-id shape.
    pub fn is_valid(s: &str) -> bool {
        s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(format!("not a 24-character hex object id: {value:?}"))
        }
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a path segment names an embedded collection item rather than a
/// sub-field: an object id, a UUID, or a numeric array index.
pub fn is_embedded_identifier(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    ObjectId::is_valid(segment)
        || Uuid::parse_str(segment).is_ok()
        || segment.bytes().all(|b| b.is_ascii_digit())
}
