//! Registration form validation.
//!
//! # Responsibility
//! - Decide whether a draft may be admitted to the registrant store.
//! - Report problems per form field as data, never as `Err`.
//!
//! # Invariants
//! - `validate` is pure; the same draft always yields the same errors.
//! - An empty last name also marks `email` as missing, even when the e-mail
//!   itself is well-formed. Existing clients rely on that error layout.
//! - Only fields with a violation carry a message.

use crate::model::registrant::RegistrantDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub const FIRST_NAME_REQUIRED: &str = "first name required";
pub const LAST_NAME_REQUIRED: &str = "last name required";
pub const EMAIL_REQUIRED: &str = "email required";
pub const EMAIL_INVALID: &str = "invalid email";
pub const PHONE_INVALID: &str = "invalid phone";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));
// ASCII classes on purpose: `\d` would also accept non-Latin digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid phone regex"));

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Phone,
    ];

    /// Wire name of the field, matching the registrant JSON keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }
}

/// Fixed-shape validation result: one optional message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ValidationErrors {
    /// `true` iff the validated draft is admissible.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: FormField, message: impl Into<String>) {
        *self.slot_mut(field) = Some(message.into());
    }

    /// Drops one field's message and leaves the others alone.
    pub fn clear(&mut self, field: FormField) {
        *self.slot_mut(field) = None;
    }

    /// Iterates `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        FormField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|message| (field, message)))
    }

    fn slot(&self, field: FormField) -> &Option<String> {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Validates a draft submission.
///
/// Rules:
/// - `firstName` / `lastName`: non-blank after trimming.
/// - `email`: required when `lastName` is blank; otherwise must match
///   `local@domain.tld` (an empty e-mail fails that shape check).
/// - `phone`: ten ASCII digits starting with 6-9, no surrounding spaces.
pub fn validate(draft: &RegistrantDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.first_name.trim().is_empty() {
        errors.set(FormField::FirstName, FIRST_NAME_REQUIRED);
    }

    let last_name_missing = draft.last_name.trim().is_empty();
    if last_name_missing {
        errors.set(FormField::LastName, LAST_NAME_REQUIRED);
    }

    if last_name_missing {
        errors.set(FormField::Email, EMAIL_REQUIRED);
    } else if !EMAIL_RE.is_match(&draft.email) {
        errors.set(FormField::Email, EMAIL_INVALID);
    }

    if !PHONE_RE.is_match(&draft.phone) {
        errors.set(FormField::Phone, PHONE_INVALID);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::{FormField, ValidationErrors, EMAIL_RE, PHONE_RE};

    #[test]
    fn email_shape_needs_at_sign_and_dot() {
        assert!(EMAIL_RE.is_match("a@b.co"));
        assert!(!EMAIL_RE.is_match("a@b"));
        assert!(!EMAIL_RE.is_match("a b@c.d"));
        assert!(!EMAIL_RE.is_match(""));
    }

    #[test]
    fn phone_rejects_non_ascii_digits() {
        assert!(PHONE_RE.is_match("6000000000"));
        assert!(!PHONE_RE.is_match("9८७६५४३२१०"));
        assert!(!PHONE_RE.is_match("98765432101"));
    }

    #[test]
    fn clear_only_touches_one_field() {
        let mut errors = ValidationErrors::default();
        errors.set(FormField::Email, "x");
        errors.set(FormField::Phone, "y");

        errors.clear(FormField::Email);
        assert_eq!(errors.get(FormField::Email), None);
        assert_eq!(errors.get(FormField::Phone), Some("y"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn display_lists_fields_in_form_order() {
        let mut errors = ValidationErrors::default();
        errors.set(FormField::Phone, "invalid phone");
        errors.set(FormField::FirstName, "first name required");
        assert_eq!(
            errors.to_string(),
            "firstName: first name required; phone: invalid phone"
        );
    }
}
