//! Form Controller - Single Entry Point
//!
//! CRITICAL: submit MUST run the full validation scan. No bypass.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::masking::{masker_for, KeyDecision, Keystroke};
use crate::render::{render, FieldInstance};
use crate::specs::{FormSpec, SpecError};
use crate::validation::{ValidationEngine, ValidationReport};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A discrete user event dispatched to the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InputEvent {
    Key { field_id: String, key: Keystroke },
    Submit,
}

/// What an event produced.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    Key(KeyDecision),
    Submit(ValidationReport),
}

/// Deferred post-edit reflow, drained before `handle` returns so it always
/// observes the fully-applied edit and always runs before the next keystroke.
#[derive(Debug)]
struct DeferredReflow {
    field_index: usize,
    key: Keystroke,
}

/// The form controller - owns every live instance for the form's lifetime
#[derive(Debug)]
pub struct FormController {
    instance_id: String,
    spec: FormSpec,
    instances: Vec<FieldInstance>,
    index: HashMap<String, usize>,
    engine: ValidationEngine,
    deferred: VecDeque<DeferredReflow>,
}

impl FormController {
    /// Check the spec, gate on engine version, compile patterns, and render
    /// every field in form order.
    pub fn build(spec: FormSpec) -> Result<Self, FormError> {
        spec.check()?;
        check_engine_version(&spec)?;

        let engine = ValidationEngine::compile(&spec)?;
        let mut instances = Vec::with_capacity(spec.fields.len());
        let mut index = HashMap::new();
        for (i, field) in spec.fields.iter().enumerate() {
            instances.push(render(field));
            index.insert(field.id.clone(), i);
        }

        Ok(Self {
            instance_id: Uuid::new_v4().to_string(),
            spec,
            instances,
            index,
            engine,
            deferred: VecDeque::new(),
        })
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Live instances in form order.
    pub fn instances(&self) -> &[FieldInstance] {
        &self.instances
    }

    pub fn instance(&self, field_id: &str) -> Option<&FieldInstance> {
        self.index.get(field_id).map(|&i| &self.instances[i])
    }

    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.instance(field_id).map(|i| i.value())
    }

    /// Dispatch one event and run it to completion, deferred work included.
    pub fn handle(&mut self, event: InputEvent) -> Result<EventOutcome, FormError> {
        match event {
            InputEvent::Key { field_id, key } => {
                Ok(EventOutcome::Key(self.keystroke(&field_id, key)?))
            }
            InputEvent::Submit => Ok(EventOutcome::Submit(self.submit())),
        }
    }

    /// Feed one keystroke to a field. Masked fields may suppress it; the
    /// grouped reflow runs deferred, after the edit has been applied.
    pub fn keystroke(&mut self, field_id: &str, key: Keystroke) -> Result<KeyDecision, FormError> {
        let field_index = *self
            .index
            .get(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        let instance = &mut self.instances[field_index];

        let decision = match instance.spec.mask_policy {
            Some(policy) => {
                let masker = masker_for(policy);
                let decision = masker.filter(&instance.live_value, key);
                if decision == KeyDecision::Suppress {
                    log::debug!("field {}: {} suppressed {:?}", field_id, masker.name(), key);
                }
                decision
            }
            None => KeyDecision::Accept,
        };

        if decision == KeyDecision::Accept {
            apply_edit(instance, key);
            if instance.spec.mask_policy.is_some() {
                self.deferred.push_back(DeferredReflow { field_index, key });
            }
        }

        self.drain_deferred();
        Ok(decision)
    }

    /// Commit a value directly, bypassing the keystroke path. This is the
    /// programmatic-set route (payloads, tests); maskers do not run.
    pub fn set_value(&mut self, field_id: &str, value: &str) -> Result<(), FormError> {
        let field_index = *self
            .index
            .get(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        self.instances[field_index].live_value = value.to_string();
        Ok(())
    }

    /// Run the full validation scan and apply every indicator transition.
    ///
    /// The report carries per-field outcomes; whether anything downstream is
    /// gated on them is the caller's decision, not ours.
    pub fn submit(&mut self) -> ValidationReport {
        let report = self.engine.validate_all(&mut self.instances);
        log::debug!(
            "form {} ({}): {} field(s), {} failure(s)",
            self.spec.id,
            self.instance_id,
            report.outcomes.len(),
            report.failures().len()
        );
        report
    }

    fn drain_deferred(&mut self) {
        while let Some(reflow) = self.deferred.pop_front() {
            let instance = &mut self.instances[reflow.field_index];
            if let Some(policy) = instance.spec.mask_policy {
                if let Some(updated) =
                    masker_for(policy).reflow(&instance.live_value, reflow.key)
                {
                    instance.live_value = updated;
                }
            }
        }
    }
}

/// Apply an accepted keystroke the way the underlying field would:
/// appends are capped by `maxLength`, backspace removes the last char.
fn apply_edit(instance: &mut FieldInstance, key: Keystroke) {
    match key {
        Keystroke::Char(c) => {
            let at_cap = instance
                .spec
                .max_length
                .map_or(false, |max| instance.live_value.chars().count() >= max);
            if !at_cap {
                instance.live_value.push(c);
            }
        }
        Keystroke::Backspace => {
            instance.live_value.pop();
        }
    }
}

fn check_engine_version(spec: &FormSpec) -> Result<(), SpecError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| SpecError::InvalidVersion(ENGINE_VERSION.to_string()))?;
    let min_ver = semver::Version::parse(&spec.engine_min_version)
        .map_err(|_| SpecError::InvalidVersion(spec.engine_min_version.clone()))?;

    if engine_ver < min_ver {
        return Err(SpecError::EngineVersionMismatch(
            spec.spec_version.clone(),
            spec.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }

    Ok(())
}
