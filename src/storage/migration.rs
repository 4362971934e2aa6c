//! Sequential snapshot migrations.
//!
//! Migrations operate on the raw JSON value, before typed deserialization, so
//! they can repair shapes the typed [`Snapshot`](super::Snapshot) would reject.
//! Each step upgrades the payload to exactly one target version and never
//! fails: malformed fields are coerced to sane defaults.
//!
//! # Versions
//!
//! - **0**: unversioned payloads; decks may miss `cards` or `createdAt`
//! - **1**: normalized deck shape; card ids were positional integers
//! - **2**: collision-free string card ids and integer deck ids (current)

use super::snapshot::CURRENT_VERSION;
use crate::domain::CardId;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

type Step = fn(&mut Map<String, Value>, DateTime<Utc>);

/// Migration table keyed by target version.
const MIGRATIONS: &[(u32, Step)] = &[(1, to_v1), (2, to_v2)];

/// Upgrades `raw` from `from` to [`CURRENT_VERSION`], one step at a time.
///
/// Payloads that are already current (or from a newer build) are returned
/// unchanged apart from the version stamp staying as stored.
#[must_use]
pub fn migrate(mut raw: Value, from: u32, now: DateTime<Utc>) -> Value {
    let Some(object) = raw.as_object_mut() else {
        return raw;
    };

    for (target, step) in MIGRATIONS {
        if *target > from && *target <= CURRENT_VERSION {
            tracing::debug!(from = from, target = target, "applying snapshot migration");
            step(object, now);
            object.insert("version".to_string(), Value::from(*target));
        }
    }

    raw
}

/// Reads the stored version; unversioned payloads count as version 0.
#[must_use]
pub fn stored_version(raw: &Value) -> u32 {
    raw.get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn to_v1(object: &mut Map<String, Value>, now: DateTime<Utc>) {
    let decks = take_array(object, "decks");
    let decks: Vec<Value> = decks
        .into_iter()
        .filter_map(|deck| match deck {
            Value::Object(mut deck) => {
                let name = deck
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or("Untitled deck")
                    .to_string();
                deck.insert("name".to_string(), Value::String(name));

                if !matches!(deck.get("cards"), Some(Value::Array(_))) {
                    deck.insert("cards".to_string(), Value::Array(Vec::new()));
                }
                normalize_timestamp(&mut deck, "createdAt", now);
                Some(Value::Object(deck))
            }
            _ => None,
        })
        .collect();
    object.insert("decks".to_string(), Value::Array(decks));

    if !object.contains_key("selectedDeckId") {
        object.insert("selectedDeckId".to_string(), Value::Null);
    }
    if !matches!(object.get("searchQuery"), Some(Value::String(_))) {
        object.insert("searchQuery".to_string(), Value::String(String::new()));
    }
}

fn to_v2(object: &mut Map<String, Value>, now: DateTime<Utc>) {
    let mut decks = take_array(object, "decks");

    let mut seen_deck_ids = HashSet::new();
    let mut next_id = decks
        .iter()
        .filter_map(|d| d.get("id").and_then(Value::as_u64))
        .max()
        .map_or(1, |max| max.saturating_add(1));

    for deck in &mut decks {
        let Some(deck) = deck.as_object_mut() else {
            continue;
        };

        let id = deck
            .get("id")
            .and_then(Value::as_u64)
            .filter(|id| seen_deck_ids.insert(*id));
        if id.is_none() {
            tracing::debug!(assigned = next_id, "reassigning invalid deck id");
            deck.insert("id".to_string(), Value::from(next_id));
            seen_deck_ids.insert(next_id);
            next_id += 1;
        }

        let cards = take_array(deck, "cards");
        let mut seen_card_ids = HashSet::new();
        let cards: Vec<Value> = cards
            .into_iter()
            .filter_map(|card| match card {
                Value::Object(mut card) => {
                    let keep = card
                        .get("id")
                        .and_then(Value::as_str)
                        .filter(|id| !id.is_empty() && seen_card_ids.insert(id.to_string()))
                        .is_some();
                    if !keep {
                        let mut fresh = CardId::generate(now);
                        while !seen_card_ids.insert(fresh.to_string()) {
                            fresh = CardId::generate(now);
                        }
                        card.insert("id".to_string(), Value::String(fresh.to_string()));
                    }

                    for side in ["front", "back"] {
                        let text = match card.get(side) {
                            Some(Value::String(s)) => s.clone(),
                            Some(Value::Number(n)) => n.to_string(),
                            Some(Value::Bool(b)) => b.to_string(),
                            _ => String::new(),
                        };
                        card.insert(side.to_string(), Value::String(text));
                    }
                    normalize_timestamp(&mut card, "createdAt", now);
                    Some(Value::Object(card))
                }
                _ => None,
            })
            .collect();
        deck.insert("cards".to_string(), Value::Array(cards));
    }

    object.insert("decks".to_string(), Value::Array(decks));

    let saved_at_valid = object
        .get("savedAt")
        .and_then(Value::as_str)
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
    if !saved_at_valid {
        object.insert("savedAt".to_string(), Value::Null);
    }
}

fn take_array(object: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match object.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn normalize_timestamp(object: &mut Map<String, Value>, key: &str, now: DateTime<Utc>) {
    let valid = object
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
    if !valid {
        object.insert(key.to_string(), Value::String(now.to_rfc3339()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Snapshot;
    use serde_json::json;

    #[test]
    fn unversioned_payload_reaches_current_version() {
        let raw = json!({
            "decks": [
                {"id": 3, "name": "Spanish"},
                {"id": "seven", "name": "", "cards": "oops"},
                "not a deck"
            ]
        });

        let migrated = migrate(raw, 0, Utc::now());
        assert_eq!(stored_version(&migrated), CURRENT_VERSION);

        let snapshot: Snapshot = serde_json::from_value(migrated).unwrap();
        assert_eq!(snapshot.decks.len(), 2);
        assert_eq!(snapshot.decks[0].id, 3);
        assert!(snapshot.decks[0].cards.is_empty());
        assert_eq!(snapshot.decks[1].id, 4);
        assert_eq!(snapshot.decks[1].name, "Untitled deck");
        assert_eq!(snapshot.selected_deck_id, None);
    }

    #[test]
    fn positional_card_ids_are_replaced() {
        let raw = json!({
            "version": 1,
            "decks": [{
                "id": 1,
                "name": "Numbers",
                "createdAt": "2025-01-01T00:00:00Z",
                "cards": [
                    {"id": 0, "front": "one", "back": 1},
                    {"id": 1, "front": "two", "back": "2"},
                    {"id": "card-keep", "front": "three", "back": "3"},
                    {"id": "card-keep", "front": "dup", "back": "dup"}
                ]
            }],
            "selectedDeckId": 1,
            "searchQuery": ""
        });

        let migrated = migrate(raw, 1, Utc::now());
        let snapshot: Snapshot = serde_json::from_value(migrated).unwrap();
        let cards = &snapshot.decks[0].cards;

        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].back, "1");
        assert_eq!(cards[2].id.as_str(), "card-keep");
        let unique: HashSet<_> = cards.iter().map(|c| c.id.clone()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn current_payload_is_untouched() {
        let raw = json!({"version": CURRENT_VERSION, "decks": []});
        assert_eq!(migrate(raw.clone(), CURRENT_VERSION, Utc::now()), raw);
    }
}
