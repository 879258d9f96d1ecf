use labdesk_types::{ItemKey, OptionId, SessionContext};
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── ItemKey ───────────────────────────────────────────────────────

#[test]
fn item_key_is_opaque() {
    let key = ItemKey::new("  Paracetamol 500 ");
    assert_eq!(key.as_str(), "  Paracetamol 500 ");
    assert_ne!(key, ItemKey::from("Paracetamol 500"));
}

#[test]
fn item_key_display() {
    let key = ItemKey::from("CBC");
    assert_eq!(key.to_string(), "CBC");
}

#[test]
fn item_key_serializes_transparently() {
    let key = ItemKey::from("paracetamol-500");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, r#""paracetamol-500""#);
    let back: ItemKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn item_key_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(ItemKey::from("a"));
    set.insert(ItemKey::from(String::from("a")));
    assert_eq!(set.len(), 1);
    assert!(set.contains("a"));
}

// ── OptionId ──────────────────────────────────────────────────────

#[test]
fn option_id_new_is_unique() {
    let a = OptionId::new();
    let b = OptionId::new();
    assert_ne!(a, b);
}

#[test]
fn option_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = OptionId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn option_id_display_and_parse() {
    let id = OptionId::new();
    let parsed = OptionId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
    let from_str = OptionId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, from_str);
}

#[test]
fn option_id_parse_invalid() {
    assert!(OptionId::parse("not-a-uuid").is_err());
}

#[test]
fn option_id_parse_reports_invalid_uuid() {
    let err = OptionId::parse("garbage").unwrap_err();
    assert!(matches!(err, labdesk_types::Error::InvalidUuid(_)));
    assert!(err.to_string().starts_with("invalid UUID"));
    assert!("garbage".parse::<OptionId>().is_err());
}

#[test]
fn option_ids_are_time_ordered() {
    let a = OptionId::new();
    let b = OptionId::new();
    assert!(a.as_uuid() <= b.as_uuid());
}

// ── SessionContext ────────────────────────────────────────────────

#[test]
fn session_context_without_center_omits_field() {
    let ctx = SessionContext::new("org-1", "dr-who");
    let json = serde_json::to_value(&ctx).unwrap();
    assert_eq!(json["organization_id"], "org-1");
    assert_eq!(json["user_id"], "dr-who");
    assert!(json.get("center_id").is_none());
}

#[test]
fn session_context_with_center() {
    let ctx = SessionContext::new("org-1", "dr-who").with_center("center-7");
    assert_eq!(ctx.center_id.as_deref(), Some("center-7"));
}

proptest! {
    #[test]
    fn item_key_preserves_any_string(s in ".*") {
        let key = ItemKey::new(s.clone());
        prop_assert_eq!(key.as_str(), s.as_str());
    }
}
