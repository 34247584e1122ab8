//! HTML page rendering via askama.
//!
//! The page is built from a flat view of the session so the template only
//! needs loops and simple conditionals.

use crate::config::DisplayConfig;
use crate::form::{FormField, Widget};
use crate::session::Session;
use askama::Template;

/// Entry in the model selector
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOption {
    pub label: String,
    pub selected: bool,
}

/// Entry in a categorical dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub value: String,
    pub selected: bool,
}

/// One rendered form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub feature: String,
    /// `choice`, `slider` or `number`
    pub kind: &'static str,
    pub options: Vec<ChoiceOption>,
    pub value: String,
    pub min: String,
    pub max: String,
    pub step: String,
}

impl FieldView {
    fn from_field(field: &FormField) -> Self {
        let feature = field.feature.clone();
        match &field.widget {
            Widget::Choice { options, selected } => Self {
                feature,
                kind: "choice",
                options: options
                    .iter()
                    .map(|value| ChoiceOption {
                        value: value.clone(),
                        selected: value == selected,
                    })
                    .collect(),
                value: selected.clone(),
                min: String::new(),
                max: String::new(),
                step: String::new(),
            },
            Widget::Slider { range, value } => Self {
                feature,
                kind: "slider",
                options: Vec::new(),
                value: value.to_string(),
                min: range.min.to_string(),
                max: range.max.to_string(),
                step: range.step.to_string(),
            },
            Widget::Number { value } => Self {
                feature,
                kind: "number",
                options: Vec::new(),
                value: value.to_string(),
                min: String::new(),
                max: String::new(),
                step: "any".to_string(),
            },
        }
    }
}

#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: String,
    pub models: Vec<ModelOption>,
    pub heading: Option<String>,
    pub fields: Vec<FieldView>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl IndexPage {
    /// Snapshot the session into a renderable page
    pub fn from_session(session: &Session, display: &DisplayConfig, error: Option<String>) -> Self {
        let selected = session.selected().map(|entry| entry.label);

        let models = session
            .registry()
            .labels()
            .map(|label| ModelOption {
                label: label.to_string(),
                selected: Some(label) == selected,
            })
            .collect();

        let fields = session
            .form()
            .map(|form| form.fields().iter().map(FieldView::from_field).collect())
            .unwrap_or_default();

        let result = session.result().map(|result| {
            format!(
                "Predicted Overall Cost: {}",
                result.formatted(&display.currency_symbol)
            )
        });

        Self {
            title: display.title.clone(),
            models,
            heading: selected.map(|label| format!("Enter inputs for Model {}", label)),
            fields,
            result,
            error,
        }
    }
}
