//! Single-user session: model selection, form state and the last prediction

use crate::error::{CostError, Result};
use crate::feature_assembler::FeatureAssembler;
use crate::fields::FieldSpecStore;
use crate::form::InputForm;
use crate::models::inference::{self, PredictionResult};
use crate::models::loader::{ArtifactLoader, ArtifactTriad};
use crate::registry::{ModelEntry, ModelRegistry};
use crate::types::InputSnapshot;
use serde::Serialize;
use tracing::{info, warn};

/// Where the session is in the select → fill → predict cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    ModelSelected,
    InputsReady,
    Predicted,
}

/// State owned by the current model selection
#[derive(Debug)]
struct ActiveModel {
    entry: ModelEntry,
    triad: ArtifactTriad,
    form: InputForm,
    snapshot: Option<InputSnapshot>,
    result: Option<PredictionResult>,
}

impl ActiveModel {
    fn refresh_snapshot(&mut self) -> &InputSnapshot {
        self.snapshot.insert(self.form.snapshot())
    }
}

pub struct Session {
    registry: ModelRegistry,
    fields: FieldSpecStore,
    loader: ArtifactLoader,
    assembler: FeatureAssembler,
    active: Option<ActiveModel>,
}

impl Session {
    pub fn new(registry: ModelRegistry, fields: FieldSpecStore, loader: ArtifactLoader) -> Self {
        Self {
            registry,
            fields,
            loader,
            assembler: FeatureAssembler::new(),
            active: None,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.active {
            None => SessionPhase::Idle,
            Some(active) if active.result.is_some() => SessionPhase::Predicted,
            Some(active) if active.snapshot.is_some() => SessionPhase::InputsReady,
            Some(_) => SessionPhase::ModelSelected,
        }
    }

    pub fn selected(&self) -> Option<&ModelEntry> {
        self.active.as_ref().map(|active| &active.entry)
    }

    pub fn form(&self) -> Option<&InputForm> {
        self.active.as_ref().map(|active| &active.form)
    }

    pub fn features(&self) -> Option<&[String]> {
        self.active
            .as_ref()
            .map(|active| active.triad.features.as_slice())
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.active.as_ref().and_then(|active| active.result.as_ref())
    }

    /// Load a fresh artifact triad and reset the form to its defaults.
    ///
    /// Any previous selection, inputs and result are discarded, also when loading fails.
    pub fn select_model(&mut self, label: &str) -> Result<()> {
        self.active = None;

        let entry = self.registry.resolve(label)?;
        let triad = self.loader.load(entry.id)?;
        let form = InputForm::build(&triad.features, &self.fields);

        info!(
            model = %entry.id,
            label = entry.label,
            fields = form.len(),
            "Model selected"
        );

        self.active = Some(ActiveModel {
            entry,
            triad,
            form,
            snapshot: None,
            result: None,
        });
        Ok(())
    }

    /// Change one input. Any displayed result is invalidated.
    ///
    /// Fails with `InvalidInput` when no model is selected.
    pub fn set_input(&mut self, feature: &str, text: &str) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            warn!(feature = feature, "Input rejected, no model selected");
            return Err(CostError::InvalidInput {
                feature: feature.to_string(),
                value: text.to_string(),
            });
        };

        active.result = None;
        let outcome = active.form.set(feature, text);
        active.refresh_snapshot();
        outcome
    }

    /// Take the snapshot of the current widget values
    pub fn collect_inputs(&mut self) -> Option<&InputSnapshot> {
        let active = self.active.as_mut()?;
        Some(active.refresh_snapshot())
    }

    /// Assemble the feature vector and run the predictor.
    ///
    /// Returns `Ok(None)` when no model is selected.
    pub fn predict(&mut self) -> Result<Option<&PredictionResult>> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };

        active.result = None;
        let snapshot = active.snapshot.insert(active.form.snapshot());
        let vector = self
            .assembler
            .assemble(&active.triad.features, snapshot, &active.triad.encoders)?;
        let result = inference::invoke(active.entry.id, active.triad.predictor.as_ref(), &vector)?;

        Ok(Some(active.result.insert(result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loader::tests::{write_model, StubPredictorLoader};
    use crate::models::predictor::{Predictor, PredictorLoader};
    use crate::registry::ModelId;
    use crate::types::RawValue;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Sums its inputs and counts how often it was invoked
    #[derive(Debug)]
    struct CountingPredictor {
        calls: Arc<AtomicUsize>,
    }

    impl Predictor for CountingPredictor {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(features.iter().sum())
        }
    }

    struct CountingLoader {
        calls: Arc<AtomicUsize>,
    }

    impl PredictorLoader for CountingLoader {
        fn load_predictor(&self, _path: &Path, _model: ModelId) -> Result<Box<dyn Predictor>> {
            Ok(Box::new(CountingPredictor {
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    fn session(dir: &Path) -> Session {
        Session::new(
            ModelRegistry::default(),
            FieldSpecStore::standard(),
            ArtifactLoader::new(dir, Box::new(StubPredictorLoader)),
        )
    }

    fn seed_models(dir: &Path) {
        write_model(
            dir,
            340,
            r#"["Pressure", "Cushioning"]"#,
            Some(r#"{"Cushioning": ["CC", "CH", "NC"]}"#),
        );
        write_model(dir, 641, r#"["Bore", "Stroke", "Weight"]"#, None);
    }

    #[test]
    fn test_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.predict().unwrap().is_none());
        assert!(session.collect_inputs().is_none());

        let err = session.set_input("Pressure", "300").unwrap_err();
        assert!(matches!(
            err,
            CostError::InvalidInput { feature, value } if feature == "Pressure" && value == "300"
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_select_collect_predict() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("340-A").unwrap();
        assert_eq!(session.phase(), SessionPhase::ModelSelected);
        assert_eq!(session.selected().unwrap().id, ModelId(340));

        let snapshot = session.collect_inputs().unwrap().clone();
        assert_eq!(
            snapshot,
            InputSnapshot(vec![RawValue::Number(250.0), RawValue::from("CC")])
        );
        assert_eq!(session.phase(), SessionPhase::InputsReady);

        // Stub predictor sums the vector [250, 0]
        let result = session.predict().unwrap().unwrap();
        assert_eq!(result.cost, 250.0);
        assert_eq!(session.phase(), SessionPhase::Predicted);
    }

    #[test]
    fn test_input_change_invalidates_result() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("340-A").unwrap();
        session.predict().unwrap();
        assert!(session.result().is_some());

        session.set_input("Cushioning", "NC").unwrap();
        assert_eq!(session.phase(), SessionPhase::InputsReady);
        assert!(session.result().is_none());

        let result = session.predict().unwrap().unwrap();
        assert_eq!(result.cost, 252.0);
    }

    #[test]
    fn test_unknown_category_blocks_prediction() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = Session::new(
            ModelRegistry::default(),
            FieldSpecStore::standard(),
            ArtifactLoader::new(
                dir.path(),
                Box::new(CountingLoader {
                    calls: Arc::clone(&calls),
                }),
            ),
        );

        session.select_model("340-A").unwrap();
        session.set_input("Cushioning", "XX").unwrap();

        let err = session.predict().unwrap_err();
        assert!(matches!(err, CostError::Encoding { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.result().is_none());
        assert_eq!(session.phase(), SessionPhase::InputsReady);

        // Session stays usable
        session.set_input("Cushioning", "CH").unwrap();
        assert_eq!(session.predict().unwrap().unwrap().cost, 251.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_encoders_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("641-B").unwrap();
        session.set_input("Weight", "42").unwrap();
        let result = session.predict().unwrap().unwrap();
        assert_eq!(result.cost, 100.0 + 750.0 + 42.0);
    }

    #[test]
    fn test_reselect_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("340-A").unwrap();
        let features = session.features().unwrap().to_vec();
        let defaults = session.form().unwrap().snapshot();

        session.set_input("Pressure", "400").unwrap();
        session.predict().unwrap();

        session.select_model("641-B").unwrap();
        assert_eq!(session.phase(), SessionPhase::ModelSelected);
        assert!(session.result().is_none());

        session.select_model("340-A").unwrap();
        assert_eq!(session.features().unwrap(), features.as_slice());
        assert_eq!(session.form().unwrap().snapshot(), defaults);
        assert_eq!(session.phase(), SessionPhase::ModelSelected);
    }

    #[test]
    fn test_failed_selection_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("340-A").unwrap();
        let err = session.select_model("1017-C").unwrap_err();
        assert!(matches!(err, CostError::ArtifactMissing { .. }));
        assert_eq!(session.phase(), SessionPhase::Idle);

        let err = session.select_model("nope").unwrap_err();
        assert!(matches!(err, CostError::InvalidSelection { .. }));

        session.select_model("340-A").unwrap();
        assert_eq!(session.phase(), SessionPhase::ModelSelected);
    }

    #[test]
    fn test_invalid_input_keeps_session_usable() {
        let dir = tempfile::tempdir().unwrap();
        seed_models(dir.path());
        let mut session = session(dir.path());

        session.select_model("340-A").unwrap();
        let err = session.set_input("Pressure", "lots").unwrap_err();
        assert!(matches!(err, CostError::InvalidInput { .. }));
        assert_eq!(session.predict().unwrap().unwrap().cost, 250.0);
    }
}
