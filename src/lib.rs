//! FormForge Core - Declarative Form Engine
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Specs Are Contracts
//! 2. Masking Never Errors
//! 3. Validation Is Protective
//! 4. One Indicator Per Field
//! 5. Callers Decide Gating

pub mod specs;
pub mod masking;
pub mod render;
pub mod validation;
pub mod form;
pub mod fingerprint;
pub mod catalog;

pub use specs::{FieldKind, FieldSpec, FormId, FormRegistry, FormSpec, MaskPolicy, SpecError};
pub use masking::{KeyDecision, Keystroke, Masker};
pub use render::{FieldInstance, RenderedField};
pub use validation::{ErrorState, FailReason, FieldOutcome, ValidationEngine, ValidationReport};
pub use form::{EventOutcome, FormController, FormError, InputEvent};
pub use fingerprint::{canonical_json, spec_fingerprint};
pub use catalog::{registration_form, CardNumberVariant};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_SPEC_VERSION: &str = "1.0.0";
