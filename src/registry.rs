//! Static registry of selectable cost models

use crate::error::{CostError, Result};
use serde::Serialize;
use std::fmt;

/// Numeric serial identifying one model's artifact triad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ModelId(pub u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable model: the label shown to the user and its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub label: &'static str,
    pub id: ModelId,
}

/// Cylinder families with trained cost models, in selector order
pub const MODEL_ENTRIES: &[ModelEntry] = &[
    ModelEntry {
        label: "340-A",
        id: ModelId(340),
    },
    ModelEntry {
        label: "641-B",
        id: ModelId(641),
    },
    ModelEntry {
        label: "1017-C",
        id: ModelId(1017),
    },
];

/// Resolves human-readable model labels to identifiers
#[derive(Debug, Clone, Copy)]
pub struct ModelRegistry {
    entries: &'static [ModelEntry],
}

impl ModelRegistry {
    pub fn new(entries: &'static [ModelEntry]) -> Self {
        Self { entries }
    }

    /// Look up the entry for a label
    pub fn resolve(&self, label: &str) -> Result<ModelEntry> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .copied()
            .ok_or_else(|| CostError::InvalidSelection {
                label: label.to_string(),
            })
    }

    /// All entries in declared order
    pub fn entries(&self) -> &'static [ModelEntry] {
        self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|entry| entry.label)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(MODEL_ENTRIES)
    }
}
