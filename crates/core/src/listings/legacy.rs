//! Upgrade of listing records written by older versions
//!
//! Older records predate review, publishing, ownership and multi-room
//! pricing. They are upgraded in place as they are loaded; running the
//! upgrade on an already current record changes nothing.

use serde_json::{Map, Value};

use crate::models::ReviewStatus;

/// Upgrade one stored record. Returns `false` if the record is not an object.
pub fn migrate_record(record: &mut Value, now_millis: i64) -> bool {
    match record.as_object_mut() {
        Some(fields) => {
            migrate_fields(fields, now_millis);
            true
        }
        None => false,
    }
}

fn migrate_fields(fields: &mut Map<String, Value>, now_millis: i64) {
    // Records from before the review workflow were already live
    let status = match fields.get("reviewStatus") {
        None => ReviewStatus::Approved,
        Some(Value::String(tag)) => ReviewStatus::parse(tag).unwrap_or(ReviewStatus::Draft),
        Some(_) => ReviewStatus::Draft,
    };
    fields.insert("reviewStatus".into(), status.as_str().into());

    if !matches!(fields.get("published"), Some(Value::Bool(_))) {
        fields.insert("published".into(), Value::Bool(false));
    }

    ensure_string(fields, "rejectReason");
    if status != ReviewStatus::Rejected {
        fields.insert("rejectReason".into(), Value::String(String::new()));
    }

    if !matches!(fields.get("roomTypes"), Some(Value::Array(_))) {
        let room_types = synthesize_room_types(fields, now_millis);
        fields.insert("roomTypes".into(), Value::Array(room_types));
    }

    ensure_string(fields, "createdBy");

    // Explicit nulls fall back to each field's default
    fields.retain(|_, value| !value.is_null());
}

fn ensure_string(fields: &mut Map<String, Value>, key: &str) {
    if !matches!(fields.get(key), Some(Value::String(_))) {
        fields.insert(key.to_string(), Value::String(String::new()));
    }
}

/// Build room types from the legacy `roomType` name list and single `price`
fn synthesize_room_types(fields: &Map<String, Value>, now_millis: i64) -> Vec<Value> {
    let names = match fields.get("roomType") {
        Some(Value::Array(names)) => names.as_slice(),
        _ => &[][..],
    };
    let price = fields.get("price").and_then(legacy_price);
    let listing_id = fields.get("id").map(text_of).unwrap_or_default();

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut room = Map::new();
            room.insert(
                "id".into(),
                format!("rt_{}_{}_{}", listing_id, i, now_millis).into(),
            );
            room.insert("name".into(), text_of(name).into());
            if let Some(price) = price {
                room.insert("price".into(), price.into());
            }
            Value::Object(room)
        })
        .collect()
}

fn legacy_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn migrated(mut record: Value) -> Value {
        assert!(migrate_record(&mut record, 1_000));
        record
    }

    #[test]
    fn test_missing_status_is_approved() {
        let record = migrated(json!({ "id": "h1", "name": "Old Inn" }));
        assert_eq!(record["reviewStatus"], "approved");
        assert_eq!(record["published"], false);
        assert_eq!(record["rejectReason"], "");
        assert_eq!(record["createdBy"], "");
        assert_eq!(record["roomTypes"], json!([]));
    }

    #[test]
    fn test_invalid_status_is_draft() {
        assert_eq!(
            migrated(json!({ "id": "h1", "reviewStatus": "archived" }))["reviewStatus"],
            "draft"
        );
        assert_eq!(
            migrated(json!({ "id": "h1", "reviewStatus": null }))["reviewStatus"],
            "draft"
        );
    }

    #[test]
    fn test_current_fields_are_kept() {
        let record = json!({
            "id": "h1",
            "reviewStatus": "rejected",
            "rejectReason": "photos missing",
            "published": true,
            "createdBy": "alice",
            "roomTypes": [{ "id": "rt1", "name": "Twin" }]
        });
        assert_eq!(migrated(record.clone()), record);
    }

    #[test]
    fn test_reason_cleared_unless_rejected() {
        let record = migrated(json!({
            "id": "h1",
            "reviewStatus": "approved",
            "rejectReason": "stale"
        }));
        assert_eq!(record["rejectReason"], "");
    }

    #[test]
    fn test_room_types_from_legacy_fields() {
        let record = migrated(json!({
            "id": "h7",
            "roomType": ["Twin", "Suite"],
            "price": "288"
        }));
        assert_eq!(
            record["roomTypes"],
            json!([
                { "id": "rt_h7_0_1000", "name": "Twin", "price": 288.0 },
                { "id": "rt_h7_1_1000", "name": "Suite", "price": 288.0 }
            ])
        );
        // legacy fields stay where they were
        assert_eq!(record["roomType"], json!(["Twin", "Suite"]));
    }

    #[test]
    fn test_room_types_without_price() {
        let record = migrated(json!({ "id": "h7", "roomType": ["Twin"], "price": "n/a" }));
        assert_eq!(record["roomTypes"], json!([{ "id": "rt_h7_0_1000", "name": "Twin" }]));

        let record = migrated(json!({ "id": "h7", "roomType": "Twin" }));
        assert_eq!(record["roomTypes"], json!([]));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let once = migrated(json!({
            "id": "h9",
            "reviewStatus": "bogus",
            "roomType": ["Family"],
            "price": 500
        }));

        let mut twice = once.clone();
        assert!(migrate_record(&mut twice, 99_999));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nulls_are_dropped() {
        let record = migrated(json!({
            "id": "h1",
            "reviewStatus": null,
            "nameEn": null,
            "roomTypes": null,
            "createdBy": null
        }));
        assert_eq!(record["reviewStatus"], "draft");
        assert!(record.get("nameEn").is_none());
        assert_eq!(record["roomTypes"], json!([]));
        assert_eq!(record["createdBy"], "");
    }

    #[test]
    fn test_non_object_record() {
        let mut record = json!("h1");
        assert!(!migrate_record(&mut record, 0));
        assert_eq!(record, json!("h1"));
    }
}
