//! Raw form values and the vectors built from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value collected from a form widget, before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Category(String),
}

impl RawValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Category(_) => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Category(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Category(value.to_string())
    }
}

/// Raw values in feature order, one per expected feature
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputSnapshot(pub Vec<RawValue>);

impl InputSnapshot {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawValue> {
        self.0.iter()
    }
}

impl FromIterator<RawValue> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = RawValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Encoded numeric values ready for the predictor, same order as the features
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
