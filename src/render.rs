//! Field Rendering - Spec to Live Instance
//!
//! Rendering never validates and never fails; malformed specs are excluded
//! upstream by `FormSpec::check`.

use serde::{Deserialize, Serialize};

use crate::specs::{FieldKind, FieldSpec};
use crate::validation::ErrorState;

/// The headless label/input pair produced for one field.
///
/// A visual shell paints this; the engine only cares that the label is
/// associated with the input through the field id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub label_text: String,
    pub label_for: String,
    pub input_kind: FieldKind,
    pub input_name: String,
    pub input_id: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub autofill_hint: Option<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
}

/// Live runtime counterpart of a `FieldSpec`.
///
/// Owned exclusively by the controller; maskers and the validation engine
/// borrow it. Exactly one error indicator exists while `error_state` is
/// `Errored`, none while `Clean`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInstance {
    pub spec: FieldSpec,
    pub rendered: RenderedField,
    pub live_value: String,
    pub error_state: ErrorState,
    #[serde(skip)]
    pub(crate) indicator_spawns: u32,
    #[serde(skip)]
    pub(crate) indicator_removals: u32,
}

impl FieldInstance {
    pub fn value(&self) -> &str {
        &self.live_value
    }

    pub fn error_state(&self) -> &ErrorState {
        &self.error_state
    }

    /// Indicator churn since render: (created, removed). At most one
    /// indicator is ever live, so created - removed is always 0 or 1.
    pub fn indicator_churn(&self) -> (u32, u32) {
        (self.indicator_spawns, self.indicator_removals)
    }
}

/// Render a spec into a live instance: label wired to the input by id,
/// presentation hints carried over, error state starting `Clean`.
pub fn render(spec: &FieldSpec) -> FieldInstance {
    let rendered = RenderedField {
        label_text: spec.label.clone(),
        label_for: spec.id.clone(),
        input_kind: spec.kind,
        input_name: spec.name.clone(),
        input_id: spec.id.clone(),
        placeholder: spec.placeholder.clone(),
        max_length: spec.max_length,
        autofill_hint: spec.autofill_hint.clone(),
        style_tags: spec.style_tags.clone(),
    };

    FieldInstance {
        spec: spec.clone(),
        rendered,
        live_value: String::new(),
        error_state: ErrorState::Clean,
        indicator_spawns: 0,
        indicator_removals: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::MaskPolicy;

    #[test]
    fn render_wires_label_to_input() {
        let spec = FieldSpec {
            kind: FieldKind::ShortText,
            name: "firstName".to_string(),
            id: "first-name".to_string(),
            label: "First Name".to_string(),
            placeholder: Some("Enter your first name".to_string()),
            pattern: None,
            error_message: None,
            max_length: Some(10),
            style_tags: vec!["input-uppercase".to_string()],
            autofill_hint: Some("given-name".to_string()),
            mask_policy: Some(MaskPolicy::DigitsOnly),
        };

        let instance = render(&spec);
        assert_eq!(instance.rendered.label_for, instance.rendered.input_id);
        assert_eq!(instance.rendered.label_text, "First Name");
        assert_eq!(instance.rendered.max_length, Some(10));
        assert_eq!(instance.rendered.autofill_hint.as_deref(), Some("given-name"));
        assert_eq!(instance.live_value, "");
        assert_eq!(instance.error_state, ErrorState::Clean);
    }
}
