use chrono::{DateTime, Utc};
use rsvp_core::{Attending, DraftShapeError, Registrant, RegistrantDraft};
use uuid::Uuid;

fn sample_draft() -> RegistrantDraft {
    let mut draft = RegistrantDraft::new();
    draft.first_name = "Asha".to_string();
    draft.last_name = "Rao".to_string();
    draft.email = "asha@x.com".to_string();
    draft.phone = "9123456780".to_string();
    draft.set_adults(2).unwrap();
    draft.set_kids(1).unwrap();
    draft.set_kid_age(0, 5).unwrap();
    draft
}

#[test]
fn draft_defaults_match_empty_form() {
    let draft = RegistrantDraft::new();

    assert!(draft.first_name.is_empty());
    assert!(draft.email.is_empty());
    assert_eq!(draft.attending, Attending::Yes);
    assert_eq!(draft.adults(), 0);
    assert_eq!(draft.kids(), 0);
    assert!(draft.kid_ages().is_empty());
    assert_eq!(draft.message, None);
    assert_eq!(draft.image, None);
    draft.check_shape().unwrap();
}

#[test]
fn changing_kid_count_resets_all_ages() {
    let mut draft = RegistrantDraft::new();
    for (from, to) in [(0_u8, 3_u8), (3, 5), (5, 2), (2, 2), (2, 0)] {
        draft.set_kids(from).unwrap();
        for index in 0..usize::from(from) {
            draft.set_kid_age(index, 7).unwrap();
        }

        draft.set_kids(to).unwrap();
        assert_eq!(draft.kids(), to);
        assert_eq!(draft.kid_ages().len(), usize::from(to));
        assert!(draft.kid_ages().iter().all(|age| *age == 0));
    }
}

#[test]
fn kid_age_setter_enforces_index_and_range() {
    let mut draft = RegistrantDraft::new();
    draft.set_kids(2).unwrap();

    assert_eq!(
        draft.set_kid_age(2, 4).unwrap_err(),
        DraftShapeError::KidIndexOutOfRange { index: 2, kids: 2 }
    );
    assert_eq!(
        draft.set_kid_age(0, 18).unwrap_err(),
        DraftShapeError::KidAgeOutOfRange { index: 0, age: 18 }
    );
    draft.set_kid_age(1, 17).unwrap();
    assert_eq!(draft.kid_ages(), &[0, 17]);
}

#[test]
fn adult_count_is_capped() {
    let mut draft = RegistrantDraft::new();
    assert_eq!(
        draft.set_adults(6).unwrap_err(),
        DraftShapeError::AdultsOutOfRange(6)
    );
    assert_eq!(draft.adults(), 0);
}

#[test]
fn blank_message_is_stored_as_absent() {
    let mut draft = RegistrantDraft::new();
    draft.set_message("   ");
    assert_eq!(draft.message, None);

    draft.set_message("See you there");
    assert_eq!(draft.message.as_deref(), Some("See you there"));
}

#[test]
fn registrant_copies_every_draft_field() {
    let mut draft = sample_draft();
    draft.image = Some("data:image/png;base64,AAAA".to_string());
    draft.set_message("veg meals please");
    let id = Uuid::new_v4();
    let now = Utc::now();

    let registrant = Registrant::from_draft(&draft, id, now);

    assert_eq!(registrant.id, id);
    assert_eq!(registrant.image, draft.image);
    assert_eq!(registrant.first_name, "Asha");
    assert_eq!(registrant.last_name, "Rao");
    assert_eq!(registrant.email, "asha@x.com");
    assert_eq!(registrant.phone, "9123456780");
    assert_eq!(registrant.attending, Attending::Yes);
    assert_eq!(registrant.adults, 2);
    assert_eq!(registrant.kids, 1);
    assert_eq!(registrant.kid_ages, vec![5]);
    assert_eq!(registrant.message.as_deref(), Some("veg meals please"));
    assert_eq!(registrant.full_name(), "Asha Rao");
    assert!(registrant.created_at <= now);
    assert!((now - registrant.created_at).num_milliseconds() < 1);
}

#[test]
fn registrant_serialization_uses_camel_case_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let created_at = DateTime::parse_from_rfc3339("2025-12-20T08:15:30.250Z")
        .unwrap()
        .with_timezone(&Utc);
    let mut draft = sample_draft();
    draft.attending = Attending::Maybe;
    let registrant = Registrant::from_draft(&draft, id, created_at);

    let json = serde_json::to_value(&registrant).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["firstName"], "Asha");
    assert_eq!(json["lastName"], "Rao");
    assert_eq!(json["attending"], "Maybe");
    assert_eq!(json["kidAges"], serde_json::json!([5]));
    assert_eq!(json["createdAt"], "2025-12-20T08:15:30.250Z");
    assert!(json.get("image").is_none());
    assert!(json.get("message").is_none());

    let decoded: Registrant = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, registrant);
}

#[test]
fn created_at_without_fraction_still_renders_millis() {
    let created_at = DateTime::parse_from_rfc3339("2025-12-20T08:15:30Z")
        .unwrap()
        .with_timezone(&Utc);
    let registrant = Registrant::from_draft(&sample_draft(), Uuid::new_v4(), created_at);
    assert_eq!(registrant.created_at_iso(), "2025-12-20T08:15:30.000Z");
}

#[test]
fn deserialize_rejects_unknown_attending_value() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "firstName": "A",
        "lastName": "B",
        "email": "a@b.co",
        "phone": "9876543210",
        "attending": "Sometimes",
        "adults": 0,
        "kids": 0,
        "kidAges": [],
        "createdAt": "2025-12-20T08:15:30.000Z"
    });

    assert!(serde_json::from_value::<Registrant>(value).is_err());
}
