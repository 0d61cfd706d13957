//! Field Specification System - Enforceable Contracts

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub type FormId = String;

/// Rendering/input hint for a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    ShortText,
    Email,
    Date,
    GroupedText,
}

/// Keystroke-shaping behavior attached to a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MaskPolicy {
    DigitsOnly,
    GroupedDigits,
}

/// Immutable description of one form field. Authored once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub name: String,
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub autofill_hint: Option<String>,
    #[serde(default)]
    pub mask_policy: Option<MaskPolicy>,
}

/// A complete form document: an ordered list of field specs plus versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    pub id: FormId,
    pub name: String,
    pub spec_version: String,
    pub engine_min_version: String,
    pub fields: Vec<FieldSpec>,
}

/// Configuration-time contract violation in a spec document.
///
/// These are caught at construction, never surfaced as validation outcomes.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Duplicate field id: {0}")]
    DuplicateFieldId(String),

    #[error("Field {field}: invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Field {0}: pattern requires an errorMessage")]
    MissingErrorMessage(String),

    #[error("Invalid version in spec document: {0}")]
    InvalidVersion(String),

    #[error("Spec version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormSpec {
    /// Construction-time contract check.
    ///
    /// Field ids must be unique, every pattern must compile and carry an
    /// error message, and both version strings must parse as semver.
    pub fn check(&self) -> Result<(), SpecError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(SpecError::DuplicateFieldId(field.id.clone()));
            }
            if let Some(pattern) = &field.pattern {
                regex::Regex::new(pattern).map_err(|source| SpecError::InvalidPattern {
                    field: field.id.clone(),
                    source,
                })?;
                if field.error_message.is_none() {
                    return Err(SpecError::MissingErrorMessage(field.id.clone()));
                }
            }
        }
        for version in [&self.spec_version, &self.engine_min_version] {
            semver::Version::parse(version)
                .map_err(|_| SpecError::InvalidVersion(version.clone()))?;
        }
        Ok(())
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// Form registry - loads and caches spec documents
pub struct FormRegistry {
    forms: HashMap<FormId, FormSpec>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self { forms: HashMap::new() }
    }

    /// Load every `*.json` spec document under `dir`.
    ///
    /// Documents that fail to parse or fail [`FormSpec::check`] are skipped
    /// with a warning rather than aborting the whole load.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::new();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "json") {
                    let content = match fs::read_to_string(&path) {
                        Ok(c) => c,
                        Err(e) => {
                            log::warn!("skipping {}: {}", path.display(), e);
                            continue;
                        }
                    };
                    match serde_json::from_str::<FormSpec>(&content) {
                        Ok(form) => match form.check() {
                            Ok(()) => {
                                registry.forms.insert(form.id.clone(), form);
                            }
                            Err(e) => log::warn!("skipping {}: {}", path.display(), e),
                        },
                        Err(e) => log::warn!("skipping {}: {}", path.display(), e),
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&FormSpec> {
        self.forms.get(id)
    }

    pub fn list(&self) -> Vec<&FormSpec> {
        self.forms.values().collect()
    }

    pub fn register(&mut self, form: FormSpec) {
        self.forms.insert(form.id.clone(), form);
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str) -> FieldSpec {
        FieldSpec {
            kind: FieldKind::ShortText,
            name: id.to_string(),
            id: id.to_string(),
            label: id.to_string(),
            placeholder: None,
            pattern: None,
            error_message: None,
            max_length: None,
            style_tags: vec![],
            autofill_hint: None,
            mask_policy: None,
        }
    }

    fn form(fields: Vec<FieldSpec>) -> FormSpec {
        FormSpec {
            id: "test".to_string(),
            name: "Test".to_string(),
            spec_version: "1.0.0".to_string(),
            engine_min_version: "1.0.0".to_string(),
            fields,
        }
    }

    #[test]
    fn check_rejects_duplicate_ids() {
        let spec = form(vec![field("a"), field("b"), field("a")]);
        let err = spec.check().unwrap_err();
        assert!(err.to_string().contains("Duplicate field id: a"));
    }

    #[test]
    fn check_rejects_bad_pattern() {
        let mut bad = field("a");
        bad.pattern = Some("[unclosed".to_string());
        bad.error_message = Some("msg".to_string());
        let err = form(vec![bad]).check().unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn check_rejects_pattern_without_message() {
        let mut bad = field("a");
        bad.pattern = Some("^x$".to_string());
        let err = form(vec![bad]).check().unwrap_err();
        assert!(err.to_string().contains("requires an errorMessage"));
    }

    #[test]
    fn check_rejects_bad_version() {
        let mut spec = form(vec![field("a")]);
        spec.engine_min_version = "not-a-version".to_string();
        let err = spec.check().unwrap_err();
        assert!(err.to_string().contains("Invalid version"));
    }

    #[test]
    fn spec_document_round_trips() {
        let json = r#"{
            "id": "login",
            "name": "Login",
            "specVersion": "1.0.0",
            "engineMinVersion": "1.0.0",
            "fields": [{
                "kind": "email",
                "name": "email",
                "id": "email",
                "label": "Email",
                "pattern": "@",
                "errorMessage": "Email must contain @",
                "maskPolicy": "digitsOnly"
            }]
        }"#;
        let spec: FormSpec = serde_json::from_str(json).unwrap();
        spec.check().unwrap();
        assert_eq!(spec.fields[0].kind, FieldKind::Email);
        assert_eq!(spec.fields[0].mask_policy, Some(MaskPolicy::DigitsOnly));
        assert!(spec.fields[0].placeholder.is_none());
    }
}
