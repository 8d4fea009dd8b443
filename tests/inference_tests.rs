//! Tests for field type inference and default rule selection.

use roster_mask::masking::infer::SAMPLE_WINDOW;
use roster_mask::masking::{infer, MaskingRule, SemanticType};
use roster_mask::record::{Dataset, Record};
use serde_json::{json, Value};

fn rec(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn type_of(config: &roster_mask::masking::Configuration, field: &str) -> SemanticType {
    config.get(field).unwrap().data_type
}

// ---------------------------------------------------------------------------
// Empty dataset
// ---------------------------------------------------------------------------

#[test]
fn empty_dataset_gives_string_none_for_every_field() {
    let config = infer(&fields(&["Name", "Year", "GPA"]), &Dataset::new());
    assert_eq!(config.len(), 3);
    for entry in config.iter() {
        assert_eq!(entry.data_type, SemanticType::String);
        assert_eq!(entry.masking_rule, MaskingRule::None);
    }
}

#[test]
fn every_requested_field_is_present_even_if_absent_from_records() {
    let dataset = vec![rec(json!({"Name": "Ada"}))];
    let config = infer(&fields(&["Name", "Nickname"]), &dataset);
    assert_eq!(config.fields().collect::<Vec<_>>(), vec!["Name", "Nickname"]);
    assert_eq!(type_of(&config, "Nickname"), SemanticType::String);
    assert_eq!(
        config.get("Nickname").unwrap().masking_rule,
        MaskingRule::Partial
    );
}

// ---------------------------------------------------------------------------
// Concrete roster scenario
// ---------------------------------------------------------------------------

#[test]
fn roster_scenario_infers_numbers_and_strings() {
    let years = ["1", "2", "3", "4", "2"];
    let gpas = ["3.5", "3.9", "2.8", "3.1", "3.0"];
    let names = ["Ada", "Grace", "Linus", "Barbara", "Ken"];
    let dataset: Dataset = (0..5)
        .map(|i| rec(json!({"Name": names[i], "Year": years[i], "GPA": gpas[i]})))
        .collect();

    let config = infer(&fields(&["Name", "Year", "GPA"]), &dataset);

    let name = config.get("Name").unwrap();
    assert_eq!(
        (name.data_type, name.masking_rule),
        (SemanticType::String, MaskingRule::Partial)
    );
    let year = config.get("Year").unwrap();
    assert_eq!(
        (year.data_type, year.masking_rule),
        (SemanticType::Number, MaskingRule::Generalized)
    );
    let gpa = config.get("GPA").unwrap();
    assert_eq!(
        (gpa.data_type, gpa.masking_rule),
        (SemanticType::Number, MaskingRule::Generalized)
    );
}

#[test]
fn json_numbers_count_as_numeric_evidence() {
    let dataset = vec![rec(json!({"StudentID": 17, "GPA": 3.25}))];
    let config = infer(&fields(&["StudentID", "GPA"]), &dataset);
    assert_eq!(type_of(&config, "StudentID"), SemanticType::Number);
    assert_eq!(type_of(&config, "GPA"), SemanticType::Number);
}

// ---------------------------------------------------------------------------
// First evidence wins
// ---------------------------------------------------------------------------

#[test]
fn numeric_first_sample_beats_later_boolean() {
    let dataset = vec![
        rec(json!({"Flag": "42"})),
        rec(json!({"Flag": "true"})),
    ];
    let config = infer(&fields(&["Flag"]), &dataset);
    assert_eq!(type_of(&config, "Flag"), SemanticType::Number);
}

#[test]
fn boolean_first_sample_beats_later_number() {
    let dataset = vec![rec(json!({"Flag": "FALSE"})), rec(json!({"Flag": 1}))];
    let config = infer(&fields(&["Flag"]), &dataset);
    assert_eq!(type_of(&config, "Flag"), SemanticType::Boolean);
    assert_eq!(
        config.get("Flag").unwrap().masking_rule,
        MaskingRule::Generalized
    );
}

#[test]
fn nulls_and_missing_values_are_skipped() {
    let dataset = vec![
        rec(json!({"Active": null})),
        rec(json!({})),
        rec(json!({"Active": true})),
    ];
    let config = infer(&fields(&["Active"]), &dataset);
    assert_eq!(type_of(&config, "Active"), SemanticType::Boolean);
}

#[test]
fn text_before_number_does_not_stop_the_scan() {
    let dataset = vec![rec(json!({"Code": "abc"})), rec(json!({"Code": "12"}))];
    let config = infer(&fields(&["Code"]), &dataset);
    assert_eq!(type_of(&config, "Code"), SemanticType::Number);
}

// ---------------------------------------------------------------------------
// Sample window
// ---------------------------------------------------------------------------

#[test]
fn only_the_first_five_records_are_sampled() {
    assert_eq!(SAMPLE_WINDOW, 5);
    let mut dataset: Dataset = (0..SAMPLE_WINDOW)
        .map(|_| rec(json!({"Score": "n/a"})))
        .collect();
    dataset.push(rec(json!({"Score": "99"})));

    let config = infer(&fields(&["Score"]), &dataset);
    assert_eq!(type_of(&config, "Score"), SemanticType::String);
}

#[test]
fn short_dataset_samples_what_exists() {
    let dataset = vec![rec(json!({"Score": "n/a"})), rec(json!({"Score": "7"}))];
    let config = infer(&fields(&["Score"]), &dataset);
    assert_eq!(type_of(&config, "Score"), SemanticType::Number);
}

#[test]
fn phone_numbers_stay_strings() {
    let dataset = vec![
        rec(json!({"PhoneNumber": "555-0100"})),
        rec(json!({"PhoneNumber": "(555) 010-0199"})),
    ];
    let config = infer(&fields(&["PhoneNumber"]), &dataset);
    assert_eq!(type_of(&config, "PhoneNumber"), SemanticType::String);
}

#[test]
fn output_follows_requested_field_order() {
    let dataset = vec![rec(json!({"c": 1, "a": "x", "b": true}))];
    let config = infer(&fields(&["a", "b", "c"]), &dataset);
    assert_eq!(config.fields().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}
