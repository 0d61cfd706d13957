//! FormForge CLI - Bridge interface for form shells
//!
//! Commands: forms, inspect, validate, mask
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use formforge_core::{
    catalog::{registration_form, CardNumberVariant},
    fingerprint::spec_fingerprint,
    form::FormController,
    masking::{KeyDecision, Keystroke},
    specs::{FieldKind, FieldSpec, FormRegistry, FormSpec, MaskPolicy},
};

#[derive(Parser)]
#[command(name = "formforge-cli")]
#[command(about = "FormForge CLI - Declarative Form Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to spec documents directory
    #[arg(short, long, default_value = "forms")]
    forms_dir: PathBuf,

    /// Card-number configuration for the built-in registration form
    #[arg(long, value_enum, default_value = "masked")]
    card_variant: CardVariantArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum CardVariantArg {
    Masked,
    Pattern,
}

impl From<CardVariantArg> for CardNumberVariant {
    fn from(arg: CardVariantArg) -> Self {
        match arg {
            CardVariantArg::Masked => CardNumberVariant::Masked,
            CardVariantArg::Pattern => CardNumberVariant::Pattern,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    DigitsOnly,
    GroupedDigits,
}

impl From<PolicyArg> for MaskPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::DigitsOnly => MaskPolicy::DigitsOnly,
            PolicyArg::GroupedDigits => MaskPolicy::GroupedDigits,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List registered forms
    Forms,

    /// Show a form's spec and fingerprint
    Inspect {
        /// Form ID
        #[arg(short, long)]
        form: String,
    },

    /// Validate a payload of field values
    Validate {
        /// Form ID
        #[arg(short, long)]
        form: String,

        /// JSON payload ({"field-id": "value", ...})
        #[arg(short, long)]
        payload: String,
    },

    /// Simulate a masked keystroke sequence ('<' is backspace)
    Mask {
        /// Mask policy
        #[arg(short = 'm', long, value_enum)]
        policy: PolicyArg,

        /// Keystrokes, one char each
        #[arg(short, long)]
        keys: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    // Spec documents from disk, plus the built-in registration form
    let mut registry = match FormRegistry::load_from_dir(&cli.forms_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load forms: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };
    registry.register(registration_form(cli.card_variant.into()));

    match cli.command {
        Commands::Forms => {
            let forms: Vec<_> = registry
                .list()
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "id": f.id,
                        "name": f.name,
                        "version": f.spec_version,
                        "fields": f.fields.len(),
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&forms).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Inspect { form } => {
            let spec = match registry.get(&form) {
                Some(s) => s,
                None => {
                    println!(r#"{{"error": "Form not found: {}"}}"#, form);
                    return ExitCode::FAILURE;
                }
            };

            let fingerprint = match spec_fingerprint(spec) {
                Ok(f) => f,
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let output = serde_json::json!({
                "fingerprint": fingerprint,
                "spec": spec,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Validate { form, payload } => {
            let spec = match registry.get(&form) {
                Some(s) => s.clone(),
                None => {
                    println!(r#"{{"error": "Form not found: {}"}}"#, form);
                    return ExitCode::FAILURE;
                }
            };

            let values: BTreeMap<String, String> = match serde_json::from_str(&payload) {
                Ok(v) => v,
                Err(e) => {
                    println!(r#"{{"error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let mut controller = match FormController::build(spec) {
                Ok(c) => c,
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            for (field_id, value) in &values {
                if let Err(e) = controller.set_value(field_id, value) {
                    println!(r#"{{"error": "{}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            }

            let report = controller.submit();
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
            if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)  // Validation failure
            }
        }

        Commands::Mask { policy, keys } => {
            let mut controller = match FormController::build(mask_sandbox(policy.into())) {
                Ok(c) => c,
                Err(e) => {
                    println!(r#"{{"error": "{}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let mut suppressed = 0u32;
            for c in keys.chars() {
                let key = if c == '<' { Keystroke::Backspace } else { Keystroke::Char(c) };
                match controller.keystroke("sandbox", key) {
                    Ok(decision) => {
                        if decision == KeyDecision::Suppress {
                            suppressed += 1;
                        }
                    }
                    Err(e) => {
                        println!(r#"{{"error": "{}"}}"#, e);
                        return ExitCode::FAILURE;
                    }
                }
            }

            let output = serde_json::json!({
                "value": controller.value("sandbox"),
                "suppressed": suppressed,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
            ExitCode::SUCCESS
        }
    }
}

/// One-field throwaway form for keystroke simulation.
fn mask_sandbox(policy: MaskPolicy) -> FormSpec {
    FormSpec {
        id: "mask-sandbox".to_string(),
        name: "Mask Sandbox".to_string(),
        spec_version: "1.0.0".to_string(),
        engine_min_version: "1.0.0".to_string(),
        fields: vec![FieldSpec {
            kind: FieldKind::GroupedText,
            name: "sandbox".to_string(),
            id: "sandbox".to_string(),
            label: "Sandbox".to_string(),
            placeholder: None,
            pattern: None,
            error_message: None,
            max_length: None,
            style_tags: vec![],
            autofill_hint: None,
            mask_policy: Some(policy),
        }],
    }
}
