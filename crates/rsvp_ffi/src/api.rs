//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose registration use-cases to Dart via FRB.
//! - Translate core types into flat, string-friendly envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store access is serialized process-wide; each call sees a fully
//!   applied collection.
//! - A success envelope is only returned once storage accepted the change.
//! - The active `CoreConfig` is fixed by `init_core` or, failing that, by the
//!   first store access.

use chrono::Utc;
use log::warn;
use rsvp_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, Attending, CoreConfig, FormField, Registrant,
    RegistrantDraft, RegistrantStore, SqliteStorage, StoreError,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

const DATA_DIR_ENV: &str = "RSVP_DATA_DIR";
const DEFAULT_DATA_DIR_NAME: &str = "rsvp";

static ACTIVE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Fixes the data directory and log level for this process.
///
/// Input semantics:
/// - `data_dir`: absolute directory for the storage file and `logs/`.
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
///
/// # FFI contract
/// - Call before any registrant API; afterwards the directory is fixed.
/// - Repeating the call with the same directory is accepted.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_core(data_dir: String, level: String) -> String {
    let config = CoreConfig {
        log_level: level.trim().to_string(),
        ..CoreConfig::default()
    }
    .with_data_dir(data_dir.trim());

    if let Err(err) = config.validate() {
        return format!("init_core failed: {err}");
    }
    if let Err(err) = init_logging_from_config(&config) {
        return format!("init_core failed: {err}");
    }

    let _guard = lock_store();
    let active = ACTIVE_CONFIG.get_or_init(|| config.clone());
    if active.data_dir != config.data_dir {
        return format!(
            "init_core failed: core already uses data dir `{}`",
            active
                .data_dir
                .as_deref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default()
        );
    }
    String::new()
}

/// Registration form payload sent by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrantInput {
    /// Encoded image (`data:` URL) or `None`.
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// `Yes|Maybe|No`.
    pub attending: String,
    pub adults: u8,
    pub kids: u8,
    /// One age per kid, in form order.
    pub kid_ages: Vec<u8>,
    pub message: Option<String>,
}

/// Read-only registrant projection for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrantView {
    pub id: String,
    pub image: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub attending: String,
    pub adults: u8,
    pub kids: u8,
    pub kid_ages: Vec<u8>,
    pub message: Option<String>,
    /// `first_name last_name`, as shown on list cards.
    pub display_name: String,
    /// RFC 3339 UTC with millisecond precision.
    pub created_at: String,
}

/// One visible form error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorView {
    /// Wire field name (`firstName|lastName|email|phone`).
    pub field: String,
    pub message: String,
}

/// Response envelope for `registrant_submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub ok: bool,
    pub registrant_id: Option<String>,
    /// Per-field validation errors; empty unless validation failed.
    pub errors: Vec<FieldErrorView>,
    pub message: String,
}

impl SubmitResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            registrant_id: None,
            errors: Vec::new(),
            message: message.into(),
        }
    }
}

/// Response envelope for `registrant_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrantListResponse {
    pub items: Vec<RegistrantView>,
    pub message: String,
}

/// Response envelope for `registrant_delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
    /// `false` when no registrant had that id.
    pub removed: bool,
    pub message: String,
}

/// Countdown shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub title: String,
    pub venue: String,
    pub days: i64,
    pub hours: i64,
    pub started: bool,
}

/// Validates and stores one registration.
///
/// # FFI contract
/// - Validation problems come back in `errors` with `ok = false`.
/// - Out-of-range counts or a kid-age list that does not match `kids` are
///   rejected with a message; nothing is stored.
/// - A storage write failure returns `ok = false`; nothing is stored.
#[flutter_rust_bridge::frb(sync)]
pub fn registrant_submit(input: RegistrantInput) -> SubmitResponse {
    match to_draft(&input) {
        Ok(draft) => submit_response(with_store(|store| store.add(&draft))),
        Err(message) => SubmitResponse::failure(format!("registrant_submit failed: {message}")),
    }
}

fn submit_response(result: Result<Result<Registrant, StoreError>, String>) -> SubmitResponse {
    match result {
        Ok(Ok(registrant)) => SubmitResponse {
            ok: true,
            registrant_id: Some(registrant.id.to_string()),
            errors: Vec::new(),
            message: "Registration successful!".to_string(),
        },
        Ok(Err(StoreError::Rejected(errors))) => SubmitResponse {
            ok: false,
            registrant_id: None,
            errors: errors
                .iter()
                .map(|(field, message)| FieldErrorView {
                    field: field.as_str().to_string(),
                    message: message.to_string(),
                })
                .collect(),
            message: "Please fix the highlighted fields.".to_string(),
        },
        Ok(Err(err)) => SubmitResponse::failure(format!("registrant_submit failed: {err}")),
        Err(err) => SubmitResponse::failure(format!("registrant_submit failed: {err}")),
    }
}

/// Lists registrants in registration order.
#[flutter_rust_bridge::frb(sync)]
pub fn registrant_list() -> RegistrantListResponse {
    match with_store(|store| store.list().iter().map(to_view).collect::<Vec<_>>()) {
        Ok(items) => {
            let message = format!("{} registrant(s).", items.len());
            RegistrantListResponse { items, message }
        }
        Err(err) => RegistrantListResponse {
            items: Vec::new(),
            message: format!("registrant_list failed: {err}"),
        },
    }
}

/// Deletes a registrant by id.
///
/// Unknown or malformed ids are not an error: nothing matches, nothing changes.
#[flutter_rust_bridge::frb(sync)]
pub fn registrant_delete(id: String) -> DeleteResponse {
    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return DeleteResponse {
            ok: true,
            removed: false,
            message: "No matching registrant.".to_string(),
        };
    };

    match with_store(|store| store.delete(id)) {
        Ok(Ok(removed)) => DeleteResponse {
            ok: true,
            removed,
            message: if removed {
                "Registrant deleted.".to_string()
            } else {
                "No matching registrant.".to_string()
            },
        },
        Ok(Err(err)) => DeleteResponse {
            ok: false,
            removed: false,
            message: format!("registrant_delete failed: {err}"),
        },
        Err(err) => DeleteResponse {
            ok: false,
            removed: false,
            message: format!("registrant_delete failed: {err}"),
        },
    }
}

/// Time left until the configured event starts.
#[flutter_rust_bridge::frb(sync)]
pub fn event_countdown() -> CountdownView {
    let event = active_config().event.clone();
    let now = Utc::now();
    let countdown = event.countdown(now);
    CountdownView {
        started: event.has_started(now),
        title: event.title,
        venue: event.venue,
        days: countdown.days,
        hours: countdown.hours,
    }
}

/// Whether a wire field name can carry a validation error.
#[flutter_rust_bridge::frb(sync)]
pub fn is_validated_field(field: String) -> bool {
    FormField::parse(field.as_str()).is_some()
}

fn to_draft(input: &RegistrantInput) -> Result<RegistrantDraft, String> {
    let attending = Attending::parse(&input.attending)
        .ok_or_else(|| format!("unknown attending value `{}`", input.attending))?;

    let mut draft = RegistrantDraft::new();
    draft.image = input.image.clone().filter(|image| !image.trim().is_empty());
    draft.first_name = input.first_name.clone();
    draft.last_name = input.last_name.clone();
    draft.email = input.email.clone();
    draft.phone = input.phone.clone();
    draft.attending = attending;
    draft.set_adults(input.adults).map_err(|err| err.to_string())?;
    draft.set_kids(input.kids).map_err(|err| err.to_string())?;
    if input.kid_ages.len() != usize::from(input.kids) {
        return Err(format!(
            "kid_ages has {} entries but kids is {}",
            input.kid_ages.len(),
            input.kids
        ));
    }
    for (index, age) in input.kid_ages.iter().copied().enumerate() {
        draft.set_kid_age(index, age).map_err(|err| err.to_string())?;
    }
    if let Some(message) = &input.message {
        draft.set_message(message.clone());
    }
    Ok(draft)
}

fn to_view(registrant: &Registrant) -> RegistrantView {
    RegistrantView {
        id: registrant.id.to_string(),
        image: registrant.image.clone(),
        first_name: registrant.first_name.clone(),
        last_name: registrant.last_name.clone(),
        email: registrant.email.clone(),
        phone: registrant.phone.clone(),
        attending: registrant.attending.as_str().to_string(),
        adults: registrant.adults,
        kids: registrant.kids,
        kid_ages: registrant.kid_ages.clone(),
        message: registrant.message.clone(),
        display_name: registrant.full_name(),
        created_at: registrant.created_at_iso(),
    }
}

fn active_config() -> &'static CoreConfig {
    ACTIVE_CONFIG.get_or_init(|| {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME));
        CoreConfig::default().with_data_dir(data_dir)
    })
}

fn lock_store() -> MutexGuard<'static, ()> {
    // Every call reopens the store from storage, so a panic under the lock
    // leaves nothing half-applied in memory.
    STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_store<T>(f: impl FnOnce(&mut RegistrantStore<SqliteStorage>) -> T) -> Result<T, String> {
    let _guard = lock_store();
    let mut store = RegistrantStore::open_configured(active_config()).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={err}");
        format!("store open failed: {err}")
    })?;
    Ok(f(&mut store))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, event_countdown, init_core, init_logging, is_validated_field, ping,
        registrant_delete, registrant_list, registrant_submit, submit_response, RegistrantInput,
    };
    use rsvp_core::StoreError;

    fn asha() -> RegistrantInput {
        RegistrantInput {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@x.com".to_string(),
            phone: "9123456780".to_string(),
            attending: "Yes".to_string(),
            adults: 2,
            kids: 1,
            kid_ages: vec![5],
            message: Some(String::new()),
            ..RegistrantInput::default()
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn init_core_rejects_relative_data_dir() {
        let message = init_core("relative/data".to_string(), "info".to_string());
        assert!(message.contains("absolute"), "{message}");
    }

    #[test]
    fn init_core_rejects_unsupported_level() {
        let dir = std::env::temp_dir().join("rsvp-init-core-level");
        let message = init_core(dir.display().to_string(), "verbose".to_string());
        assert!(message.starts_with("init_core failed"), "{message}");
    }

    #[test]
    fn store_failure_is_reported_as_not_ok() {
        let encode = serde_json::from_str::<u8>("not json").unwrap_err();
        let response = submit_response(Ok(Err(StoreError::Encode(encode))));
        assert!(!response.ok);
        assert!(response.registrant_id.is_none());
        assert!(response.errors.is_empty());
        assert!(response.message.starts_with("registrant_submit failed"));
    }

    #[test]
    fn submit_list_delete_round_trip() {
        let submitted = registrant_submit(asha());
        assert!(submitted.ok, "{}", submitted.message);
        let id = submitted.registrant_id.expect("submit should return id");

        let listed = registrant_list();
        let view = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("submitted registrant should be listed");
        assert_eq!(view.kid_ages, vec![5]);
        assert_eq!(view.attending, "Yes");
        assert_eq!(view.message, None);
        assert_eq!(view.display_name, "Asha Rao");
        assert!(view.created_at.ends_with('Z'));

        let deleted = registrant_delete(id.clone());
        assert!(deleted.ok && deleted.removed, "{}", deleted.message);
        assert!(registrant_list().items.iter().all(|item| item.id != id));

        let again = registrant_delete(id);
        assert!(again.ok);
        assert!(!again.removed);
    }

    #[test]
    fn submit_returns_field_errors() {
        let mut input = asha();
        input.last_name = String::new();

        let response = registrant_submit(input);
        assert!(!response.ok);
        assert!(response.registrant_id.is_none());
        let fields = response
            .errors
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>();
        assert_eq!(fields, ["lastName", "email"]);
    }

    #[test]
    fn submit_rejects_mismatched_kid_ages() {
        let mut input = asha();
        input.kid_ages = vec![5, 6];

        let response = registrant_submit(input);
        assert!(!response.ok);
        assert!(response.errors.is_empty());
        assert!(response.message.contains("kid_ages"));
    }

    #[test]
    fn submit_rejects_unknown_attending_value() {
        let mut input = asha();
        input.attending = "Sometimes".to_string();
        assert!(!registrant_submit(input).ok);
    }

    #[test]
    fn delete_with_malformed_id_is_a_noop() {
        let response = registrant_delete("not-a-uuid".to_string());
        assert!(response.ok);
        assert!(!response.removed);
    }

    #[test]
    fn countdown_is_never_negative() {
        let view = event_countdown();
        assert!(view.days >= 0 && view.hours >= 0);
        assert!(!view.title.is_empty());
    }

    #[test]
    fn validated_fields_are_known() {
        assert!(is_validated_field("email".to_string()));
        assert!(!is_validated_field("message".to_string()));
    }
}
