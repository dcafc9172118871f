//! Registrant record and draft.
//!
//! # Responsibility
//! - Define the stored registrant shape and its JSON wire naming.
//! - Keep the kid-age list in lockstep with the kid count while a draft is
//!   being edited.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once, at admission.
//! - `adults <= MAX_ADULTS`, `kids <= MAX_KIDS`, every age `<= MAX_KID_AGE`.
//! - Changing the kid count resets every kid age to zero.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable primary key of a registrant.
pub type RegistrantId = Uuid;

/// Largest accepted adult count.
pub const MAX_ADULTS: u8 = 5;
/// Largest accepted kid count.
pub const MAX_KIDS: u8 = 5;
/// Oldest age still counted as a kid.
pub const MAX_KID_AGE: u8 = 17;

/// Attendance answer given on the form.
///
/// Serialized with its display spelling (`Yes|Maybe|No`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attending {
    #[default]
    Yes,
    Maybe,
    No,
}

impl Attending {
    pub const ALL: [Attending; 3] = [Attending::Yes, Attending::Maybe, Attending::No];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::Maybe => "Maybe",
            Self::No => "No",
        }
    }

    /// Parses the display spelling; surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for Attending {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape violation of the numeric registrant fields.
///
/// These are caller bugs, not user input mistakes: the form only offers
/// in-range choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftShapeError {
    AdultsOutOfRange(u8),
    KidsOutOfRange(u8),
    KidAgesLength { kids: u8, ages: usize },
    KidAgeOutOfRange { index: usize, age: u8 },
    KidIndexOutOfRange { index: usize, kids: u8 },
}

impl Display for DraftShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdultsOutOfRange(value) => {
                write!(f, "adults ({value}) must be <= {MAX_ADULTS}")
            }
            Self::KidsOutOfRange(value) => write!(f, "kids ({value}) must be <= {MAX_KIDS}"),
            Self::KidAgesLength { kids, ages } => {
                write!(f, "kid_ages has {ages} entries but kids is {kids}")
            }
            Self::KidAgeOutOfRange { index, age } => {
                write!(f, "kid_ages[{index}] ({age}) must be <= {MAX_KID_AGE}")
            }
            Self::KidIndexOutOfRange { index, kids } => {
                write!(f, "kid index {index} is out of range for {kids} kid(s)")
            }
        }
    }
}

impl Error for DraftShapeError {}

/// Admitted registration record.
///
/// Field names on the wire mirror the browser app's persisted state
/// (`firstName`, `kidAges`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: RegistrantId,
    /// Encoded image reference, usually a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub attending: Attending,
    pub adults: u8,
    pub kids: u8,
    pub kid_ages: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Registrant {
    /// Builds a record from an already admitted draft.
    ///
    /// `created_at` is truncated to millisecond precision so the stored value
    /// survives a JSON round trip unchanged.
    pub fn from_draft(
        draft: &RegistrantDraft,
        id: RegistrantId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            image: draft.image.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            attending: draft.attending,
            adults: draft.adults,
            kids: draft.kids,
            kid_ages: draft.kid_ages.clone(),
            message: draft.message.clone(),
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// Checks the numeric invariants of a persisted record.
    pub fn check_shape(&self) -> Result<(), DraftShapeError> {
        check_counts(self.adults, self.kids, &self.kid_ages)
    }

    /// Display name used by list views.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `createdAt` as rendered on the wire.
    pub fn created_at_iso(&self) -> String {
        iso_millis::format(&self.created_at)
    }
}

/// In-progress, not yet validated submission.
///
/// Text fields are public; the counts go through setters so the kid-age list
/// never drifts from the kid count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrantDraft {
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub attending: Attending,
    adults: u8,
    kids: u8,
    kid_ages: Vec<u8>,
    pub message: Option<String>,
}

impl RegistrantDraft {
    /// Creates an empty draft (`attending = Yes`, no adults, no kids).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adults(&self) -> u8 {
        self.adults
    }

    pub fn kids(&self) -> u8 {
        self.kids
    }

    pub fn kid_ages(&self) -> &[u8] {
        &self.kid_ages
    }

    pub fn set_adults(&mut self, adults: u8) -> Result<(), DraftShapeError> {
        if adults > MAX_ADULTS {
            return Err(DraftShapeError::AdultsOutOfRange(adults));
        }
        self.adults = adults;
        Ok(())
    }

    /// Sets the kid count and rebuilds `kid_ages` as `kids` zeros.
    ///
    /// Previously entered ages are discarded, even when the list only grows.
    pub fn set_kids(&mut self, kids: u8) -> Result<(), DraftShapeError> {
        if kids > MAX_KIDS {
            return Err(DraftShapeError::KidsOutOfRange(kids));
        }
        self.kids = kids;
        self.kid_ages = vec![0; usize::from(kids)];
        Ok(())
    }

    /// Sets the age of one kid; the kid count is left untouched.
    pub fn set_kid_age(&mut self, index: usize, age: u8) -> Result<(), DraftShapeError> {
        if index >= self.kid_ages.len() {
            return Err(DraftShapeError::KidIndexOutOfRange {
                index,
                kids: self.kids,
            });
        }
        if age > MAX_KID_AGE {
            return Err(DraftShapeError::KidAgeOutOfRange { index, age });
        }
        self.kid_ages[index] = age;
        Ok(())
    }

    /// Stores free text; blank text is kept as "no message".
    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.message = if message.trim().is_empty() {
            None
        } else {
            Some(message)
        };
    }

    /// Checks the numeric invariants before admission.
    pub fn check_shape(&self) -> Result<(), DraftShapeError> {
        check_counts(self.adults, self.kids, &self.kid_ages)
    }
}

fn check_counts(adults: u8, kids: u8, kid_ages: &[u8]) -> Result<(), DraftShapeError> {
    if adults > MAX_ADULTS {
        return Err(DraftShapeError::AdultsOutOfRange(adults));
    }
    if kids > MAX_KIDS {
        return Err(DraftShapeError::KidsOutOfRange(kids));
    }
    if kid_ages.len() != usize::from(kids) {
        return Err(DraftShapeError::KidAgesLength {
            kids,
            ages: kid_ages.len(),
        });
    }
    if let Some((index, age)) = kid_ages
        .iter()
        .copied()
        .enumerate()
        .find(|(_, age)| *age > MAX_KID_AGE)
    {
        return Err(DraftShapeError::KidAgeOutOfRange { index, age });
    }
    Ok(())
}

/// RFC 3339 UTC timestamps with exactly three fractional digits
/// (`2025-12-31T14:30:00.000Z`).
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|err| de::Error::custom(format!("invalid createdAt `{raw}`: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{check_counts, Attending, DraftShapeError, RegistrantDraft};

    #[test]
    fn attending_parse_accepts_display_spelling() {
        assert_eq!(Attending::parse(" maybe "), Some(Attending::Maybe));
        assert_eq!(Attending::parse("No"), Some(Attending::No));
        assert_eq!(Attending::parse("perhaps"), None);
    }

    #[test]
    fn check_counts_reports_first_bad_age() {
        let err = check_counts(1, 2, &[4, 18]).unwrap_err();
        assert_eq!(err, DraftShapeError::KidAgeOutOfRange { index: 1, age: 18 });
    }

    #[test]
    fn rejected_kid_count_leaves_draft_unchanged() {
        let mut draft = RegistrantDraft::new();
        draft.set_kids(2).unwrap();
        draft.set_kid_age(1, 9).unwrap();

        let err = draft.set_kids(6).unwrap_err();
        assert_eq!(err, DraftShapeError::KidsOutOfRange(6));
        assert_eq!(draft.kids(), 2);
        assert_eq!(draft.kid_ages(), &[0, 9]);
    }
}
