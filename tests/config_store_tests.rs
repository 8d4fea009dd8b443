//! Tests for the rule catalog and the masking configuration store.

use roster_mask::error::RosterMaskError;
use roster_mask::masking::{
    allowed_rules, default_rule, is_allowed, ConfigStore, Configuration, FieldConfig, MaskingRule,
    SemanticType,
};
use roster_mask::record::Record;
use serde_json::{json, Value};

const ALL_RULES: [MaskingRule; 5] = [
    MaskingRule::None,
    MaskingRule::Partial,
    MaskingRule::Generalized,
    MaskingRule::Hash,
    MaskingRule::Faker,
];

fn rec(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn roster_store() -> ConfigStore {
    let config: Configuration = [
        FieldConfig::new("Name", SemanticType::String, MaskingRule::Partial),
        FieldConfig::new("GPA", SemanticType::Number, MaskingRule::Generalized),
        FieldConfig::new("Active", SemanticType::Boolean, MaskingRule::Generalized),
    ]
    .into_iter()
    .collect();
    ConfigStore::new(config)
}

// ---------------------------------------------------------------------------
// Catalog table
// ---------------------------------------------------------------------------

#[test]
fn catalog_matches_rule_table() {
    assert_eq!(allowed_rules(SemanticType::String), &ALL_RULES);
    assert_eq!(
        allowed_rules(SemanticType::Number),
        &[
            MaskingRule::None,
            MaskingRule::Generalized,
            MaskingRule::Hash,
            MaskingRule::Faker
        ]
    );
    assert_eq!(
        allowed_rules(SemanticType::Boolean),
        &[MaskingRule::None, MaskingRule::Generalized, MaskingRule::Faker]
    );
}

#[test]
fn catalog_defaults() {
    assert_eq!(default_rule(SemanticType::String), MaskingRule::Partial);
    assert_eq!(default_rule(SemanticType::Number), MaskingRule::Generalized);
    assert_eq!(default_rule(SemanticType::Boolean), MaskingRule::Generalized);
}

// ---------------------------------------------------------------------------
// set_rule
// ---------------------------------------------------------------------------

#[test]
fn partial_on_number_field_is_rejected() {
    let mut store = roster_store();
    let err = store.set_rule("GPA", MaskingRule::Partial).unwrap_err();
    match err {
        RosterMaskError::InvalidRuleForType {
            field,
            rule,
            data_type,
        } => {
            assert_eq!(field, "GPA");
            assert_eq!(rule, MaskingRule::Partial);
            assert_eq!(data_type, SemanticType::Number);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        store.config().get("GPA").unwrap().masking_rule,
        MaskingRule::Generalized,
        "rejected edit must not coerce the stored rule"
    );
}

#[test]
fn accepted_rules_are_always_in_the_allowed_set() {
    for field in ["Name", "GPA", "Active"] {
        for rule in ALL_RULES {
            let mut store = roster_store();
            let data_type = store.config().get(field).unwrap().data_type;
            let accepted = store.set_rule(field, rule).is_ok();
            assert_eq!(
                accepted,
                is_allowed(data_type, rule),
                "{field} ({data_type}) with {rule}"
            );
        }
    }
}

#[test]
fn set_rule_changes_only_the_target_field() {
    let mut store = roster_store();
    let before = store.snapshot();
    store.set_rule("Name", MaskingRule::Hash).unwrap();

    let after = store.snapshot();
    let name = after.get("Name").unwrap();
    assert_eq!(name.masking_rule, MaskingRule::Hash);
    assert_eq!(name.data_type, SemanticType::String);
    assert_eq!(after.get("GPA"), before.get("GPA"));
    assert_eq!(after.get("Active"), before.get("Active"));
}

#[test]
fn unknown_field_is_rejected() {
    let mut store = roster_store();
    let err = store.set_rule("Email", MaskingRule::Hash).unwrap_err();
    assert!(matches!(err, RosterMaskError::UnknownField { field } if field == "Email"));
}

#[test]
fn invalid_rule_is_not_a_recoverable_service_failure() {
    let mut store = roster_store();
    let err = store.set_rule("Active", MaskingRule::Hash).unwrap_err();
    assert!(!err.is_recoverable());
}

// ---------------------------------------------------------------------------
// snapshot / reset
// ---------------------------------------------------------------------------

#[test]
fn snapshot_is_detached_from_later_edits() {
    let mut store = roster_store();
    let snapshot = store.snapshot();
    store.set_rule("Name", MaskingRule::Faker).unwrap();
    assert_eq!(
        snapshot.get("Name").unwrap().masking_rule,
        MaskingRule::Partial
    );
}

#[test]
fn reset_reinfers_from_new_dataset() {
    let mut store = roster_store();
    store.set_rule("Name", MaskingRule::None).unwrap();

    let fields = vec!["Name".to_string(), "Year".to_string()];
    let dataset = vec![rec(json!({"Name": "Ada", "Year": "2"}))];
    store.reset(&fields, &dataset);

    let config = store.snapshot();
    assert_eq!(config.len(), 2);
    assert_eq!(config.get("Name").unwrap().masking_rule, MaskingRule::Partial);
    assert_eq!(config.get("Year").unwrap().data_type, SemanticType::Number);
    assert!(config.get("Active").is_none());
}

// ---------------------------------------------------------------------------
// Configuration helpers
// ---------------------------------------------------------------------------

#[test]
fn validate_flags_disallowed_entries() {
    let mut config = roster_store().snapshot();
    assert!(config.validate().is_ok());
    config.insert(FieldConfig::new(
        "Active",
        SemanticType::Boolean,
        MaskingRule::Hash,
    ));
    assert!(matches!(
        config.validate(),
        Err(RosterMaskError::InvalidRuleForType { .. })
    ));
}

#[test]
fn insert_replaces_in_place() {
    let mut config = roster_store().snapshot();
    config.insert(FieldConfig::new("GPA", SemanticType::Number, MaskingRule::Hash));
    assert_eq!(config.len(), 3);
    assert_eq!(config.fields().collect::<Vec<_>>(), vec!["Name", "GPA", "Active"]);
}

#[test]
fn rule_map_lists_rule_names() {
    let config = roster_store().snapshot();
    let map = config.rule_map();
    assert_eq!(map["Name"], json!("partial"));
    assert_eq!(map["GPA"], json!("generalized"));
}

#[test]
fn fingerprint_tracks_content() {
    let mut store = roster_store();
    let a = store.snapshot().fingerprint();
    assert_eq!(a.len(), 64);
    assert_eq!(a, roster_store().snapshot().fingerprint());
    store.set_rule("GPA", MaskingRule::None).unwrap();
    assert_ne!(a, store.snapshot().fingerprint());
}

#[test]
fn rules_parse_from_names() {
    assert_eq!("Hash".parse::<MaskingRule>().unwrap(), MaskingRule::Hash);
    assert_eq!("generalized".parse::<MaskingRule>().unwrap(), MaskingRule::Generalized);
    assert!("scramble".parse::<MaskingRule>().is_err());
    assert!(!MaskingRule::Faker.is_deterministic());
    assert!(MaskingRule::Hash.is_deterministic());
}
