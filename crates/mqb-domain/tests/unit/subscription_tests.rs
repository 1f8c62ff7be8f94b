//! Subscription Identifier Tests

use mqb_domain::value_objects::SubscriptionId;
use std::collections::HashSet;

#[test]
fn test_ids_are_unique() {
    let ids: HashSet<SubscriptionId> = (0..100).map(|_| SubscriptionId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_id_serializes_as_plain_uuid() {
    let id = SubscriptionId::new();

    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));

    let back: SubscriptionId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_display_is_prefixed() {
    let id = SubscriptionId::new();
    assert_eq!(id.to_string(), format!("sub-{}", id.as_uuid()));
}
