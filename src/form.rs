//! Input collector: one widget per expected feature, in feature order

use crate::error::{CostError, Result};
use crate::fields::{FieldSpec, FieldSpecStore, NumericRange};
use crate::types::{InputSnapshot, RawValue};
use serde::Serialize;

/// Widget chosen for a feature, holding its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Single-choice selector over the allowed values
    Choice { options: Vec<String>, selected: String },
    /// Bounded numeric input
    Slider { range: NumericRange, value: f64 },
    /// Free numeric entry
    Number { value: f64 },
}

impl Widget {
    /// Pick the widget for a feature and set it to its default
    pub fn for_feature(feature: &str, store: &FieldSpecStore) -> Self {
        match store.lookup(feature) {
            Some(FieldSpec::Categorical(values)) => Widget::Choice {
                options: values.to_vec(),
                selected: values.first().cloned().unwrap_or_default(),
            },
            Some(FieldSpec::NumericRange(range)) => Widget::Slider {
                range: *range,
                value: range.default,
            },
            None => Widget::Number { value: 0.0 },
        }
    }

    pub fn value(&self) -> RawValue {
        match self {
            Widget::Choice { selected, .. } => RawValue::Category(selected.clone()),
            Widget::Slider { value, .. } | Widget::Number { value } => RawValue::Number(*value),
        }
    }
}

/// A labelled form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub feature: String,
    pub widget: Widget,
}

/// The generated form for the selected model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputForm {
    fields: Vec<FormField>,
}

impl InputForm {
    /// Build the form with default values, preserving feature order
    pub fn build(features: &[String], store: &FieldSpecStore) -> Self {
        let fields = features
            .iter()
            .map(|feature| FormField {
                feature: feature.clone(),
                widget: Widget::for_feature(feature, store),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Current raw values, one per field
    pub fn snapshot(&self) -> InputSnapshot {
        self.fields.iter().map(|field| field.widget.value()).collect()
    }

    /// Apply submitted text to one field
    ///
    /// Choice values are stored verbatim; unknown categories surface at encoding.
    /// Slider values are clamped into range.
    pub fn set(&mut self, feature: &str, text: &str) -> Result<()> {
        let invalid = || CostError::InvalidInput {
            feature: feature.to_string(),
            value: text.to_string(),
        };

        let field = self
            .fields
            .iter_mut()
            .find(|field| field.feature == feature)
            .ok_or_else(invalid)?;

        match &mut field.widget {
            Widget::Choice { selected, .. } => {
                *selected = text.to_string();
            }
            Widget::Slider { range, value } => {
                let parsed = parse_number(text).ok_or_else(invalid)?;
                *value = range.clamp(parsed);
            }
            Widget::Number { value } => {
                *value = parse_number(text).ok_or_else(invalid)?;
            }
        }
        Ok(())
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_widget_selection() {
        let store = FieldSpecStore::standard();
        assert!(matches!(
            Widget::for_feature("Mounting", &store),
            Widget::Choice { ref selected, .. } if selected == "TM+RE"
        ));
        assert!(matches!(
            Widget::for_feature("Stroke", &store),
            Widget::Slider { value, .. } if value == 750.0
        ));
        assert_eq!(
            Widget::for_feature("Weight", &store),
            Widget::Number { value: 0.0 }
        );
    }

    #[test]
    fn test_snapshot_matches_feature_order() {
        let store = FieldSpecStore::standard();
        let order = features(&["Cushioning", "Weight", "Pressure", "Cyl Type", "Bore"]);
        let form = InputForm::build(&order, &store);

        let snapshot = form.snapshot();
        assert_eq!(snapshot.len(), order.len());
        assert_eq!(
            snapshot.0,
            vec![
                RawValue::from("CC"),
                RawValue::Number(0.0),
                RawValue::Number(250.0),
                RawValue::from("Arm"),
                RawValue::Number(100.0),
            ]
        );
        let labels: Vec<_> = form.fields().iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(labels, vec!["Cushioning", "Weight", "Pressure", "Cyl Type", "Bore"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = FieldSpecStore::standard();
        let order = features(&["Pressure", "Cushioning", "ValveY-N"]);
        assert_eq!(InputForm::build(&order, &store), InputForm::build(&order, &store));
    }

    #[test]
    fn test_empty_feature_order() {
        let form = InputForm::build(&[], &FieldSpecStore::standard());
        assert!(form.is_empty());
        assert!(form.snapshot().is_empty());
    }

    #[test]
    fn test_set_values() {
        let store = FieldSpecStore::standard();
        let mut form = InputForm::build(&features(&["Pressure", "Cushioning", "Weight"]), &store);

        form.set("Pressure", "320").unwrap();
        form.set("Cushioning", "NC").unwrap();
        form.set("Weight", " 12.5 ").unwrap();
        assert_eq!(
            form.snapshot().0,
            vec![
                RawValue::Number(320.0),
                RawValue::from("NC"),
                RawValue::Number(12.5)
            ]
        );
    }

    #[test]
    fn test_slider_is_clamped() {
        let store = FieldSpecStore::standard();
        let mut form = InputForm::build(&features(&["Pressure"]), &store);
        form.set("Pressure", "9000").unwrap();
        assert_eq!(form.snapshot().0, vec![RawValue::Number(500.0)]);
        form.set("Pressure", "1").unwrap();
        assert_eq!(form.snapshot().0, vec![RawValue::Number(150.0)]);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let store = FieldSpecStore::standard();
        let mut form = InputForm::build(&features(&["Pressure", "Weight"]), &store);

        assert!(matches!(
            form.set("Pressure", "high"),
            Err(CostError::InvalidInput { .. })
        ));
        assert!(matches!(
            form.set("Weight", "NaN"),
            Err(CostError::InvalidInput { .. })
        ));
        assert!(matches!(
            form.set("Colour", "red"),
            Err(CostError::InvalidInput { feature, .. }) if feature == "Colour"
        ));
        // Rejected values leave the defaults in place
        assert_eq!(
            form.snapshot().0,
            vec![RawValue::Number(250.0), RawValue::Number(0.0)]
        );
    }
}
