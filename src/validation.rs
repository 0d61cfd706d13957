//! Validation System - Outcome/Presentation Separation
//!
//! The engine computes per-field outcomes.
//! The presenter maps outcomes onto error indicators, idempotently.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::render::FieldInstance;
use crate::specs::{FieldKind, FormSpec, SpecError};

/// Message shown when a field is empty at validation time.
pub const REQUIRED_MESSAGE: &str = "Required field";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    RequiredFieldMissing,
    PatternMismatch,
}

/// Per-field verdict. Field-local and user-recoverable, never a system fault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum FieldOutcome {
    Pass,
    Fail { reason: FailReason, message: String },
}

impl FieldOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, FieldOutcome::Pass)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub field_id: String,
    pub outcome: FieldOutcome,
}

/// Outcomes for every field, in form order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub form_id: String,
    pub spec_version: String,
    pub outcomes: Vec<FieldReport>,
}

impl ValidationReport {
    /// Derived convenience for the submit collaborator. Nothing inside the
    /// engine gates on this; gating policy belongs to the caller.
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|r| r.outcome.passed())
    }

    pub fn outcome(&self, field_id: &str) -> Option<&FieldOutcome> {
        self.outcomes
            .iter()
            .find(|r| r.field_id == field_id)
            .map(|r| &r.outcome)
    }

    pub fn failures(&self) -> Vec<&FieldReport> {
        self.outcomes.iter().filter(|r| !r.outcome.passed()).collect()
    }
}

/// Indicator state per instance. Initial state at render time is `Clean`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum ErrorState {
    Clean,
    Errored(String),
}

/// Idempotent indicator mutation.
///
/// At most one indicator exists per instance; showing a different message
/// updates the existing indicator in place instead of recreating it.
#[derive(Debug)]
pub struct ErrorPresenter;

impl ErrorPresenter {
    pub fn show_error(&self, instance: &mut FieldInstance, message: &str) {
        match &instance.error_state {
            ErrorState::Errored(current) if current == message => {}
            ErrorState::Errored(_) => {
                instance.error_state = ErrorState::Errored(message.to_string());
            }
            ErrorState::Clean => {
                instance.error_state = ErrorState::Errored(message.to_string());
                instance.indicator_spawns += 1;
            }
        }
    }

    pub fn clear_error(&self, instance: &mut FieldInstance) {
        if let ErrorState::Errored(_) = instance.error_state {
            instance.error_state = ErrorState::Clean;
            instance.indicator_removals += 1;
        }
    }
}

/// Validation engine - patterns compiled once, applied on every submit
#[derive(Debug)]
pub struct ValidationEngine {
    form_id: String,
    spec_version: String,
    patterns: HashMap<String, Regex>,
    presenter: ErrorPresenter,
}

impl ValidationEngine {
    /// Compile every field pattern up front. The engine reads patterns from
    /// the spec it was built from, never back off rendered state.
    pub fn compile(form: &FormSpec) -> Result<Self, SpecError> {
        let mut patterns = HashMap::new();
        for field in &form.fields {
            if let Some(pattern) = &field.pattern {
                let regex = Regex::new(pattern).map_err(|source| SpecError::InvalidPattern {
                    field: field.id.clone(),
                    source,
                })?;
                patterns.insert(field.id.clone(), regex);
            }
        }
        Ok(Self {
            form_id: form.id.clone(),
            spec_version: form.spec_version.clone(),
            patterns,
            presenter: ErrorPresenter,
        })
    }

    /// Scan every instance in form order, apply the indicator transition for
    /// each, and report the outcomes.
    pub fn validate_all(&self, instances: &mut [FieldInstance]) -> ValidationReport {
        let mut outcomes = Vec::with_capacity(instances.len());
        for instance in instances.iter_mut() {
            let outcome = self.outcome_for(instance);
            match &outcome {
                FieldOutcome::Pass => self.presenter.clear_error(instance),
                FieldOutcome::Fail { message, .. } => {
                    self.presenter.show_error(instance, message)
                }
            }
            outcomes.push(FieldReport {
                field_id: instance.spec.id.clone(),
                outcome,
            });
        }
        ValidationReport {
            form_id: self.form_id.clone(),
            spec_version: self.spec_version.clone(),
            outcomes,
        }
    }

    fn outcome_for(&self, instance: &FieldInstance) -> FieldOutcome {
        let value = instance.live_value.as_str();

        if value.is_empty() {
            return FieldOutcome::Fail {
                reason: FailReason::RequiredFieldMissing,
                message: REQUIRED_MESSAGE.to_string(),
            };
        }

        if let Some(regex) = self.patterns.get(&instance.spec.id) {
            // Unanchored search; anchors come from the pattern itself.
            if !regex.is_match(value) {
                return FieldOutcome::Fail {
                    reason: FailReason::PatternMismatch,
                    message: instance.spec.error_message.clone().unwrap_or_default(),
                };
            }
        }

        if instance.spec.kind == FieldKind::Date {
            if let Some(message) = &instance.spec.error_message {
                let today = Local::now().date_naive();
                let in_past = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map(|date| date <= today)
                    .unwrap_or(false);
                if !in_past {
                    return FieldOutcome::Fail {
                        reason: FailReason::PatternMismatch,
                        message: message.clone(),
                    };
                }
            }
        }

        FieldOutcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::specs::{FieldSpec, FormSpec};

    fn email_form() -> FormSpec {
        FormSpec {
            id: "test".to_string(),
            name: "Test".to_string(),
            spec_version: "1.0.0".to_string(),
            engine_min_version: "1.0.0".to_string(),
            fields: vec![FieldSpec {
                kind: FieldKind::Email,
                name: "email".to_string(),
                id: "email".to_string(),
                label: "Email".to_string(),
                placeholder: None,
                pattern: Some("^[a-z0-9._%+-]+@[a-z0-9.-]+.[a-z]{2,}$".to_string()),
                error_message: Some("Email must be format abc@xyz.com".to_string()),
                max_length: None,
                style_tags: vec![],
                autofill_hint: None,
                mask_policy: None,
            }],
        }
    }

    fn instance_with_value(form: &FormSpec, value: &str) -> FieldInstance {
        let mut instance = render(&form.fields[0]);
        instance.live_value = value.to_string();
        instance
    }

    #[test]
    fn empty_value_is_required_field_missing() {
        let form = email_form();
        let engine = ValidationEngine::compile(&form).unwrap();
        let mut instances = vec![instance_with_value(&form, "")];

        let report = engine.validate_all(&mut instances);
        assert!(!report.is_valid());
        assert_eq!(
            report.outcome("email"),
            Some(&FieldOutcome::Fail {
                reason: FailReason::RequiredFieldMissing,
                message: REQUIRED_MESSAGE.to_string(),
            })
        );
        assert_eq!(
            instances[0].error_state,
            ErrorState::Errored(REQUIRED_MESSAGE.to_string())
        );
    }

    #[test]
    fn mismatch_shows_configured_message() {
        let form = email_form();
        let engine = ValidationEngine::compile(&form).unwrap();
        let mut instances = vec![instance_with_value(&form, "not-an-email")];

        let report = engine.validate_all(&mut instances);
        match report.outcome("email") {
            Some(FieldOutcome::Fail { reason, message }) => {
                assert_eq!(*reason, FailReason::PatternMismatch);
                assert_eq!(message, "Email must be format abc@xyz.com");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn matching_value_passes_and_clears() {
        let form = email_form();
        let engine = ValidationEngine::compile(&form).unwrap();
        let mut instances = vec![instance_with_value(&form, "abc@xyz.com")];
        engine.presenter.show_error(&mut instances[0], "stale");

        let report = engine.validate_all(&mut instances);
        assert!(report.is_valid());
        assert_eq!(instances[0].error_state, ErrorState::Clean);
    }

    #[test]
    fn show_error_is_idempotent() {
        let form = email_form();
        let presenter = ErrorPresenter;
        let mut instance = instance_with_value(&form, "x");

        presenter.show_error(&mut instance, "msg");
        presenter.show_error(&mut instance, "msg");
        assert_eq!(instance.error_state, ErrorState::Errored("msg".to_string()));
        assert_eq!(instance.indicator_churn(), (1, 0));
    }

    #[test]
    fn show_error_updates_message_in_place() {
        let form = email_form();
        let presenter = ErrorPresenter;
        let mut instance = instance_with_value(&form, "x");

        presenter.show_error(&mut instance, "first");
        presenter.show_error(&mut instance, "second");
        assert_eq!(instance.error_state, ErrorState::Errored("second".to_string()));
        // Indicator was reused, not torn down and recreated.
        assert_eq!(instance.indicator_churn(), (1, 0));
    }

    #[test]
    fn clear_error_on_clean_is_noop() {
        let form = email_form();
        let presenter = ErrorPresenter;
        let mut instance = instance_with_value(&form, "x");

        presenter.clear_error(&mut instance);
        assert_eq!(instance.error_state, ErrorState::Clean);
        assert_eq!(instance.indicator_churn(), (0, 0));
    }
}
