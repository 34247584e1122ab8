//! Categorical encoders applied before inference

use crate::types::RawValue;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Maps one raw categorical value to the number the predictor was trained on.
pub trait Encoder: Send + Sync + fmt::Debug {
    /// Returns `None` when the value is not a known category.
    fn transform(&self, value: &RawValue) -> Option<f64>;
}

/// Encoders keyed by feature name
pub type EncoderMap = HashMap<String, Box<dyn Encoder>>;

/// Label encoder: a value encodes to its index in the known class list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Encoder for LabelEncoder {
    fn transform(&self, value: &RawValue) -> Option<f64> {
        // Numeric widgets feeding an encoder match on their textual form
        let key = value.to_string();
        self.classes
            .iter()
            .position(|class| *class == key)
            .map(|index| index as f64)
    }
}

/// Parse the encoder artifact: a JSON object of feature name to class list
pub fn parse_label_encoders(json: &str) -> Result<EncoderMap, serde_json::Error> {
    let raw: HashMap<String, LabelEncoder> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|(feature, encoder)| (feature, Box::new(encoder) as Box<dyn Encoder>))
        .collect())
}
