//! # Lookup Context
//!
//! The read-only inputs a pipeline run needs besides the records: the
//! id → display-name map, the training id → course-name map and the
//! configuration. Borrowed for the duration of a call; nothing is cached.

use std::collections::HashMap;

use crate::config::HistoryConfig;

/// Identifier → display name.
pub type NameMap = HashMap<String, String>;

/// Owned lookup maps, for callers that build them once per render.
#[derive(Debug, Clone, Default)]
pub struct LookupMaps {
    /// Entity id → display name (drivers, PAs, vendors, students, schools).
    pub id_to_name: NameMap,
    /// Training id → course name.
    pub training_names: NameMap,
}

impl LookupMaps {
    /// Empty maps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id → name mapping.
    pub fn with_name(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.id_to_name.insert(id.into(), name.into());
        self
    }

    /// Add a training id → course name mapping.
    pub fn with_training(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.training_names.insert(id.into(), name.into());
        self
    }

    /// Borrow as a context together with `config`.
    pub fn context<'a>(&'a self, config: &'a HistoryConfig) -> HistoryContext<'a> {
        HistoryContext {
            id_to_name: &self.id_to_name,
            training_names: &self.training_names,
            config,
        }
    }
}

/// Everything a formatter may consult.
#[derive(Debug, Clone, Copy)]
pub struct HistoryContext<'a> {
    /// Entity id → display name.
    pub id_to_name: &'a NameMap,
    /// Training id → course name.
    pub training_names: &'a NameMap,
    /// Run configuration.
    pub config: &'a HistoryConfig,
}

impl<'a> HistoryContext<'a> {
    /// Assemble a context from borrowed parts.
    pub fn new(
        id_to_name: &'a NameMap,
        training_names: &'a NameMap,
        config: &'a HistoryConfig,
    ) -> Self {
        Self {
            id_to_name,
            training_names,
            config,
        }
    }
}
