//! Built-in Form Catalog
//!
//! The stock registration form, field for field. Card number ships in two
//! alternative configurations; both are first-class.

use serde::{Deserialize, Serialize};

use crate::specs::{FieldKind, FieldSpec, FormSpec, MaskPolicy};

/// Which card-number configuration the registration form carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardNumberVariant {
    /// Grouped live masking, no pattern: "1234 5678 1234 5678".
    Masked,
    /// Raw 16-character value gated by pattern, no masking.
    Pattern,
}

impl Default for CardNumberVariant {
    fn default() -> Self {
        Self::Masked
    }
}

fn field(kind: FieldKind, name: &str, id: &str, label: &str) -> FieldSpec {
    FieldSpec {
        kind,
        name: name.to_string(),
        id: id.to_string(),
        label: label.to_string(),
        placeholder: None,
        pattern: None,
        error_message: None,
        max_length: None,
        style_tags: vec![],
        autofill_hint: None,
        mask_policy: None,
    }
}

fn card_number(variant: CardNumberVariant) -> FieldSpec {
    let mut card = field(FieldKind::GroupedText, "cardNumber", "card-number", "Card Details");
    card.placeholder = Some("Enter your card number".to_string());
    card.error_message = Some("Credit card number must be of 16 numbers".to_string());
    card.style_tags = vec!["input-uppercase".to_string()];
    card.autofill_hint = Some("cc-number".to_string());
    match variant {
        CardNumberVariant::Masked => {
            // 16 digits plus 3 group separators.
            card.max_length = Some(19);
            card.mask_policy = Some(MaskPolicy::GroupedDigits);
        }
        CardNumberVariant::Pattern => {
            card.max_length = Some(16);
            card.pattern = Some("^[a-zA-Z0-9]{16}$".to_string());
        }
    }
    card
}

/// The stock six-field registration form.
pub fn registration_form(variant: CardNumberVariant) -> FormSpec {
    let mut first_name = field(FieldKind::ShortText, "firstName", "first-name", "First Name");
    first_name.placeholder = Some("Enter your first name".to_string());
    first_name.pattern = Some("^[a-zA-Z]{3,}".to_string());
    first_name.error_message =
        Some("First name must have 3 letters and should not contain numbers".to_string());

    let mut last_name = field(FieldKind::ShortText, "lastName", "last-name", "Last Name");
    last_name.placeholder = Some("Enter your last name".to_string());
    last_name.pattern = Some("^[a-zA-Z]{3,}".to_string());
    last_name.error_message =
        Some("Last name must have 3 letters and should not contain numbers".to_string());

    let mut email = field(FieldKind::Email, "email", "email", "Email");
    email.placeholder = Some("abc@xyz.com".to_string());
    email.pattern = Some("^[a-z0-9._%+-]+@[a-z0-9.-]+.[a-z]{2,}$".to_string());
    email.error_message = Some("Email must be format abc@xyz.com".to_string());

    let mut pan = field(FieldKind::ShortText, "pan", "pan", "Pan");
    pan.placeholder = Some("Enter your Pan Number".to_string());
    pan.pattern = Some("^[a-zA-Z]{5}[0-9]{4}[a-zA-Z]{1}$".to_string());
    pan.error_message = Some("Pan number must be of format XXXXXX-0000-X".to_string());
    pan.max_length = Some(10);
    pan.style_tags = vec!["input-uppercase".to_string()];

    let mut phone = field(FieldKind::ShortText, "phone", "phone-number", "Phone Number");
    phone.placeholder = Some("Enter your phone number".to_string());
    phone.pattern = Some("^[0-9]{10}$".to_string());
    phone.error_message = Some("Phone number must be of 10 numbers".to_string());
    phone.max_length = Some(10);
    phone.mask_policy = Some(MaskPolicy::DigitsOnly);

    let mut dob = field(FieldKind::Date, "dob", "date-of-birth", "Date of Birth");
    dob.error_message = Some("Date of birth should be smaller than current date".to_string());

    FormSpec {
        id: "registration".to_string(),
        name: "Registration".to_string(),
        spec_version: "1.0.0".to_string(),
        engine_min_version: "1.0.0".to_string(),
        fields: vec![
            first_name,
            last_name,
            email,
            pan,
            phone,
            dob,
            card_number(variant),
        ],
    }
}
