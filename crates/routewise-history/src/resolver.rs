//! # Reference Resolver — Identifiers → Names
//!
//! Turns whatever the audit log stored for a related entity (an embedded
//! object, an object id, a bare key) into a display name. Resolution never
//! fails; unresolved input degrades to the most informative fallback:
//!
//! 1. Embedded object with `name`, or `firstName`/`lastName` → full name.
//! 2. Embedded object with only `_id`/`id` → resolved as an identifier.
//! 3. Identifier present in the lookup map → mapped name.
//! 4. Unmapped object id → raw id, or "Unknown" when configured.
//! 5. Any other unmapped string → the string itself.
//! 6. Nothing at all → "Not provided".

use routewise_core::ChangeValue;

use crate::config::UnresolvedReference;
use crate::context::{HistoryContext, NameMap};

/// Fallback for a missing value.
pub const NOT_PROVIDED: &str = "Not provided";

/// Fallback for an unmapped identifier under [`UnresolvedReference::Unknown`].
pub const UNKNOWN: &str = "Unknown";

const ID_KEYS: &[&str] = &["_id", "id"];

/// Full name of an embedded person/organisation object.
///
/// Returns `None` when the object carries no naming keys at all, and
/// `Some("Not provided")` when it has them but they are blank.
pub fn full_name(value: &ChangeValue) -> Option<String> {
    let ChangeValue::Composite(map) = value else {
        return None;
    };
    if !["name", "firstName", "lastName"].iter().any(|k| map.contains_key(*k)) {
        return None;
    }
    if let Some(name) = value.text_of("name") {
        return Some(name);
    }
    let first = value.text_of("firstName").unwrap_or_default();
    let last = value.text_of("lastName").unwrap_or_default();
    let joined = format!("{first} {last}").trim().to_string();
    Some(if joined.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        joined
    })
}

/// Resolves references against a caller-supplied name map.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    names: &'a NameMap,
    unresolved: UnresolvedReference,
}

impl<'a> ReferenceResolver<'a> {
    /// Resolver over `names` with the given fallback policy.
    pub fn new(names: &'a NameMap, unresolved: UnresolvedReference) -> Self {
        Self { names, unresolved }
    }

    /// Resolver over the context's id → name map.
    pub fn from_context(ctx: &HistoryContext<'a>) -> Self {
        Self::new(ctx.id_to_name, ctx.config.unresolved_reference)
    }

    /// Resolver over an arbitrary map, e.g. the training-name map.
    pub fn with_names(&self, names: &'a NameMap) -> Self {
        Self::new(names, self.unresolved)
    }

    /// Look up a bare identifier.
    pub fn resolve_id(&self, id: &str) -> String {
        let id = id.trim();
        if id.is_empty() {
            return NOT_PROVIDED.to_string();
        }
        if let Some(name) = self.names.get(id) {
            return name.clone();
        }
        self.unmapped(id)
    }

    /// Lookup only, without any fallback.
    pub fn lookup(&self, id: &str) -> Option<&'a str> {
        self.names.get(id.trim()).map(String::as_str)
    }

    fn unmapped(&self, id: &str) -> String {
        let looks_internal = routewise_core::ObjectId::is_valid(id);
        match (looks_internal, self.unresolved) {
            (true, UnresolvedReference::Unknown) => UNKNOWN.to_string(),
            _ => id.to_string(),
        }
    }

    /// Resolve any value shape to a display name.
    pub fn resolve(&self, value: &ChangeValue) -> String {
        match value {
            ChangeValue::Absent => NOT_PROVIDED.to_string(),
            ChangeValue::Reference(id) => self.resolve_id(id.as_str()),
            ChangeValue::Text(s) => self.resolve_id(s),
            ChangeValue::Number(n) => self.resolve_id(&n.to_string()),
            ChangeValue::Composite(_) => {
                if let Some(name) = full_name(value) {
                    return name;
                }
                value
                    .get_any(ID_KEYS)
                    .and_then(ChangeValue::as_text)
                    .map(|id| self.resolve_id(&id))
                    .unwrap_or_else(|| NOT_PROVIDED.to_string())
            }
            ChangeValue::Collection(items) => {
                let names: Vec<String> = items
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(|v| self.resolve(v))
                    .collect();
                if names.is_empty() {
                    NOT_PROVIDED.to_string()
                } else {
                    names.join(", ")
                }
            }
            other => other.as_text().unwrap_or_else(|| NOT_PROVIDED.to_string()),
        }
    }
}
