//! Field specifications for the input form
//!
//! Categorical fields list the values a user may pick; numeric fields carry
//! slider bounds. Features with neither get a free numeric entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Bounds and default for a slider-style numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Finite bounds with `min <= default <= max` and a positive step
    pub fn is_valid(&self) -> bool {
        [self.min, self.max, self.step, self.default]
            .iter()
            .all(|v| v.is_finite())
            && self.min <= self.max
            && self.step > 0.0
            && (self.min..=self.max).contains(&self.default)
    }

    /// Clamp a value into `[min, max]`
    ///
    /// An inverted range yields `max`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Specification attached to a feature name
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec<'a> {
    Categorical(&'a [String]),
    NumericRange(&'a NumericRange),
}

const CATEGORICAL_OPTIONS: &[(&str, &[&str])] = &[
    ("Cushioning", &["CC", "CH", "NC"]),
    ("Mounting", &["TM+RE", "SPL", "CM+RM", "CM+RE", "CC+RE"]),
    ("BearingY-N", &["Y", "N"]),
    ("ValveY-N", &["Y", "N"]),
    (
        "Cyl Type",
        &[
            "Arm",
            "Boom",
            "Bucket",
            "Dipper",
            "Lift",
            "Stabilizer",
            "Steering",
            "Swing",
            "Tilt",
            "Other",
        ],
    ),
];

const NUMERIC_RANGES: &[(&str, NumericRange)] = &[
    ("Pressure", NumericRange::new(150.0, 500.0, 10.0, 250.0)),
    ("Bore", NumericRange::new(50.0, 500.0, 1.0, 100.0)),
    ("Rod diameter", NumericRange::new(50.0, 500.0, 1.0, 75.0)),
    ("Stroke", NumericRange::new(100.0, 5000.0, 1.0, 750.0)),
    ("Tube_ID", NumericRange::new(50.0, 500.0, 1.0, 100.0)),
    ("Tube_OD", NumericRange::new(50.0, 500.0, 1.0, 120.0)),
    ("Rod_Length", NumericRange::new(100.0, 5000.0, 10.0, 900.0)),
    ("CEC_Thickness", NumericRange::new(50.0, 500.0, 5.0, 100.0)),
    ("Piston_Thickness", NumericRange::new(50.0, 500.0, 5.0, 100.0)),
];

/// Immutable lookup tables keyed by feature name
#[derive(Debug, Clone, Default)]
pub struct FieldSpecStore {
    categorical: HashMap<String, Vec<String>>,
    numeric: HashMap<String, NumericRange>,
}

impl FieldSpecStore {
    /// Tables for the hydraulic cylinder models
    pub fn standard() -> Self {
        let categorical = CATEGORICAL_OPTIONS
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect();
        let numeric = NUMERIC_RANGES
            .iter()
            .map(|(name, range)| (name.to_string(), *range))
            .collect();

        Self {
            categorical,
            numeric,
        }
    }

    pub fn with_categorical(mut self, feature: &str, values: &[&str]) -> Self {
        self.categorical.insert(
            feature.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Add a slider range. Invalid ranges are skipped and the feature falls back to free entry.
    pub fn with_numeric(mut self, feature: &str, range: NumericRange) -> Self {
        if !range.is_valid() {
            warn!(feature = feature, range = ?range, "Ignoring invalid numeric range");
            return self;
        }
        self.numeric.insert(feature.to_string(), range);
        self
    }

    /// Spec for a feature; categorical tables take precedence over numeric ones
    pub fn lookup(&self, feature: &str) -> Option<FieldSpec<'_>> {
        if let Some(values) = self.categorical.get(feature) {
            return Some(FieldSpec::Categorical(values));
        }
        self.numeric.get(feature).map(FieldSpec::NumericRange)
    }

    pub fn categorical_count(&self) -> usize {
        self.categorical.len()
    }

    pub fn numeric_count(&self) -> usize {
        self.numeric.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables() {
        let store = FieldSpecStore::standard();
        assert_eq!(store.categorical_count(), 5);
        assert_eq!(store.numeric_count(), 9);

        match store.lookup("Cushioning") {
            Some(FieldSpec::Categorical(values)) => assert_eq!(values[0], "CC"),
            other => panic!("unexpected spec: {:?}", other),
        }
        match store.lookup("Pressure") {
            Some(FieldSpec::NumericRange(range)) => {
                assert_eq!(*range, NumericRange::new(150.0, 500.0, 10.0, 250.0))
            }
            other => panic!("unexpected spec: {:?}", other),
        }
        assert!(store.lookup("Weight").is_none());
    }

    #[test]
    fn test_categorical_takes_precedence() {
        let store = FieldSpecStore::default()
            .with_numeric("Grade", NumericRange::new(0.0, 10.0, 1.0, 5.0))
            .with_categorical("Grade", &["A", "B"]);
        assert!(matches!(store.lookup("Grade"), Some(FieldSpec::Categorical(_))));
    }

    #[test]
    fn test_clamp() {
        let range = NumericRange::new(150.0, 500.0, 10.0, 250.0);
        assert_eq!(range.clamp(90.0), 150.0);
        assert_eq!(range.clamp(900.0), 500.0);
        assert_eq!(range.clamp(320.0), 320.0);

        let inverted = NumericRange::new(500.0, 150.0, 10.0, 250.0);
        assert!(!inverted.is_valid());
        assert_eq!(inverted.clamp(320.0), 150.0);
    }

    #[test]
    fn test_invalid_ranges_are_not_stored() {
        let store = FieldSpecStore::default()
            .with_numeric("Bore", NumericRange::new(500.0, 50.0, 1.0, 100.0))
            .with_numeric("Stroke", NumericRange::new(100.0, 5000.0, 0.0, 750.0))
            .with_numeric("Tube_ID", NumericRange::new(50.0, f64::NAN, 1.0, 100.0))
            .with_numeric("Tube_OD", NumericRange::new(50.0, 500.0, 1.0, 900.0))
            .with_numeric("Pressure", NumericRange::new(150.0, 500.0, 10.0, 250.0));

        assert_eq!(store.numeric_count(), 1);
        assert!(store.lookup("Bore").is_none());
        assert!(matches!(store.lookup("Pressure"), Some(FieldSpec::NumericRange(_))));
    }

    #[test]
    fn test_standard_ranges_are_valid() {
        assert!(NUMERIC_RANGES.iter().all(|(_, range)| range.is_valid()));
    }
}
