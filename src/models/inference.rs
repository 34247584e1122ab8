//! Prediction invoker and result formatting

use crate::error::{CostError, Result};
use crate::models::predictor::Predictor;
use crate::registry::ModelId;
use crate::types::FeatureVector;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

/// Result of one cost prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub model: ModelId,
    /// Point estimate returned by the predictor
    pub cost: f64,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionResult {
    /// Cost as a currency string, e.g. `₹1,234.50`
    pub fn formatted(&self, currency_symbol: &str) -> String {
        format_currency(self.cost, currency_symbol)
    }
}

/// Runs the predictor over one feature vector
pub fn invoke(
    model: ModelId,
    predictor: &dyn Predictor,
    features: &FeatureVector,
) -> Result<PredictionResult> {
    let cost = predictor.predict(features.as_slice()).map_err(|e| {
        error!(model = %model, error = %e, "Inference failed");
        match e {
            CostError::Prediction(_) => e,
            other => CostError::Prediction(other.to_string()),
        }
    })?;

    if !cost.is_finite() {
        error!(model = %model, cost = cost, "Predictor returned a non-finite estimate");
        return Err(CostError::Prediction(format!(
            "model returned a non-finite estimate ({})",
            cost
        )));
    }

    info!(model = %model, cost = cost, "Prediction complete");

    Ok(PredictionResult {
        model,
        cost,
        predicted_at: Utc::now(),
    })
}

/// Two decimals with comma thousands separators, prefixed by the currency symbol
pub fn format_currency(amount: f64, currency_symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Rounding can turn a tiny negative into "-0.00"
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, currency_symbol, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(f64);

    impl Predictor for Fixed {
        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Predictor for Failing {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            Err(CostError::ShapeMismatch {
                expected: 3,
                actual: features.len(),
            })
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "₹"), "₹0.00");
        assert_eq!(format_currency(999.5, "₹"), "₹999.50");
        assert_eq!(format_currency(1000.0, "₹"), "₹1,000.00");
        assert_eq!(format_currency(1234567.891, "₹"), "₹1,234,567.89");
        assert_eq!(format_currency(-45210.0, "$"), "-$45,210.00");
        assert_eq!(format_currency(-0.001, "₹"), "₹0.00");
    }

    #[test]
    fn test_invoke_success() {
        let vector = FeatureVector(vec![250.0, 0.0]);
        let result = invoke(ModelId(340), &Fixed(48250.0), &vector).unwrap();
        assert_eq!(result.model, ModelId(340));
        assert_eq!(result.cost, 48250.0);
        assert_eq!(result.formatted("₹"), "₹48,250.00");
    }

    #[test]
    fn test_invoke_wraps_runtime_faults() {
        let vector = FeatureVector(vec![1.0]);
        let err = invoke(ModelId(340), &Failing, &vector).unwrap_err();
        assert!(matches!(err, CostError::Prediction(msg) if msg.contains("expected 3")));
    }

    #[test]
    fn test_invoke_rejects_non_finite() {
        let vector = FeatureVector(vec![1.0]);
        let err = invoke(ModelId(340), &Fixed(f64::NAN), &vector).unwrap_err();
        assert!(matches!(err, CostError::Prediction(_)));
    }
}
