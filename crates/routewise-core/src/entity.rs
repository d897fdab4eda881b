//! # Entity Type — Which Domain Class Owns a History
//!
//! The closed set of entity types whose edit history can be rendered. The
//! entity type selects the field dictionary and the special-case grouping
//! and filtering rules. Every `match` on [`EntityType`] is exhaustive, so a
//! new entity type forces each rule table to decide how to treat it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RoutewiseError;

/// Domain class whose change history is being summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    /// A contracted driver.
    Driver,
    /// A school served by one or more routes.
    School,
    /// A passenger assistant travelling with students.
    PersonalAssistant,
    /// A student transported on a route.
    Student,
    /// A transport route with its driver, PA, stops and pricing.
    Route,
}

impl EntityType {
    /// Returns all entity types in declaration order.
    pub fn all() -> &'static [EntityType] {
        &[
            Self::Driver,
            Self::School,
            Self::PersonalAssistant,
            Self::Student,
            Self::Route,
        ]
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::School => "school",
            Self::PersonalAssistant => "personalAssistant",
            Self::Student => "student",
            Self::Route => "route",
        }
    }

    /// Whether correlated edits and structural records are grouped rather
    /// than strictly re-sorted by time.
    pub fn preserves_grouping(&self) -> bool {
        matches!(self, Self::Route)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = RoutewiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "school" => Ok(Self::School),
            "personalAssistant" => Ok(Self::PersonalAssistant),
            "student" => Ok(Self::Student),
            "route" => Ok(Self::Route),
            other => Err(RoutewiseError::UnknownEntityType(other.to_string())),
        }
    }
}
