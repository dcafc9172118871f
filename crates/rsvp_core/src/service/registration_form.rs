//! Registration form session.
//!
//! # Responsibility
//! - Hold the draft being edited and the errors currently shown.
//! - Run the submit flow: validate, admit, reset.
//!
//! # Invariants
//! - Errors are recomputed wholesale on each submit; `blur` only hides one.
//! - A successful submit resets every field, image included.
//! - A failed submit keeps the draft as typed.

use crate::model::registrant::{Attending, DraftShapeError, Registrant, RegistrantDraft};
use crate::storage::LocalStorage;
use crate::store::registrant_store::{RegistrantStore, StoreError};
use crate::validation::{validate, FormField, ValidationErrors};
use log::debug;

/// Outcome of `RegistrationForm::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was admitted; the form is back to defaults.
    Registered(Registrant),
    /// Validation failed; the same errors are now visible on the form.
    Invalid(ValidationErrors),
}

/// Editable registration form backed by a draft.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    draft: RegistrantDraft,
    errors: ValidationErrors,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &RegistrantDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.draft.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.draft.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.draft.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.draft.phone = value.into();
    }

    pub fn set_attending(&mut self, value: Attending) {
        self.draft.attending = value;
    }

    pub fn set_adults(&mut self, value: u8) -> Result<(), DraftShapeError> {
        self.draft.set_adults(value)
    }

    /// Changes the kid count; every kid age goes back to zero.
    pub fn set_kids(&mut self, value: u8) -> Result<(), DraftShapeError> {
        self.draft.set_kids(value)
    }

    pub fn set_kid_age(&mut self, index: usize, age: u8) -> Result<(), DraftShapeError> {
        self.draft.set_kid_age(index, age)
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.draft.set_message(value);
    }

    /// Attaches (or removes) the encoded profile image.
    pub fn set_image(&mut self, value: Option<String>) {
        self.draft.image = value;
    }

    /// Hides the error of a field the user just left.
    pub fn blur(&mut self, field: FormField) {
        self.errors.clear(field);
    }

    /// Validates the draft and, when clean, adds it to `store`.
    ///
    /// # Errors
    /// - `StoreError::MalformedDraft` if the draft's counts are out of shape.
    ///   Unreachable through the setters above.
    /// - `StoreError::Encode` / `StoreError::Persist` if storage refused the
    ///   write. Nothing was added and the draft is kept for a retry.
    pub fn submit<S: LocalStorage>(
        &mut self,
        store: &mut RegistrantStore<S>,
    ) -> Result<SubmitOutcome, StoreError> {
        let errors = validate(&self.draft);
        if !errors.is_empty() {
            debug!(
                "event=form_submit module=service status=invalid fields={}",
                errors.len()
            );
            self.errors = errors.clone();
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let registrant = store.add(&self.draft)?;
        self.reset();
        Ok(SubmitOutcome::Registered(registrant))
    }

    /// Returns the form to its initial state.
    pub fn reset(&mut self) {
        self.draft = RegistrantDraft::default();
        self.errors = ValidationErrors::default();
    }
}
