//! End-to-end validation tests against schemas built from JSON documents.

use jsonschema_engine::{
    ErrorChildren, ErrorKind, JsonSchema, SchemaValidator, ValidationError,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn schema(document: Value) -> JsonSchema {
    serde_json::from_value(document).expect("schema document should deserialize")
}

fn validate(schema_document: Value, value: Value) -> Vec<ValidationError> {
    SchemaValidator::new().validate(&value, &schema(schema_document))
}

#[test]
fn valid_document_produces_no_errors() {
    let person = json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "age": {"type": "integer", "minimum": 0, "maximum": 130},
            "email": {"type": "string", "format": "email"},
            "tags": {
                "type": "array",
                "uniqueItems": true,
                "items": {"type": "string"}
            }
        },
        "additionalProperties": false
    });

    let errors = validate(
        person,
        json!({
            "name": "Ada",
            "age": 36,
            "email": "ada@example.com",
            "tags": ["math", "engines"]
        }),
    );
    assert_eq!(errors.len(), 0);
}

#[test]
fn missing_required_property_is_reported_at_its_path() {
    let errors = validate(
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}}
        }),
        json!({}),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::PropertyRequired);
    assert_eq!(errors[0].path, "#/name");
    assert_eq!(errors[0].property.as_deref(), Some("name"));
}

#[test]
fn any_of_matching_one_branch_is_valid() {
    let schema_document = json!({
        "anyOf": [
            {"type": "string"},
            {"type": "integer"}
        ]
    });
    assert_eq!(validate(schema_document, json!(7)).len(), 0);
}

#[test]
fn any_of_matching_no_branch_wraps_every_failure() {
    let errors = validate(
        json!({
            "anyOf": [
                {"type": "string"},
                {"type": "integer"}
            ]
        }),
        json!(true),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NotAnyOf);
    let ErrorChildren::PerSchema(groups) = &errors[0].children else {
        panic!("expected per-schema groups");
    };
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|(_, nested)| !nested.is_empty()));
}

#[test]
fn all_of_reports_only_failing_branches() {
    let errors = validate(
        json!({
            "allOf": [
                {"type": "string"},
                {"minLength": 10}
            ]
        }),
        json!("short"),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NotAllOf);
    let ErrorChildren::PerSchema(groups) = &errors[0].children else {
        panic!("expected per-schema groups");
    };
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1[0].kind, ErrorKind::StringTooShort);
}

#[test]
fn one_of_ambiguous_match_is_a_failure() {
    let errors = validate(
        json!({
            "oneOf": [
                {"type": "integer"},
                {"minimum": 0}
            ]
        }),
        json!(5),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NotOneOf);
}

#[test]
fn one_of_single_match_is_valid() {
    let schema_document = json!({
        "oneOf": [
            {"type": "integer"},
            {"type": "string"}
        ]
    });
    assert_eq!(validate(schema_document, json!("text")).len(), 0);
}

#[test]
fn pattern_property_takes_priority_over_closed_schema() {
    let schema_document = json!({
        "type": "object",
        "properties": {"known": {"type": "string"}},
        "patternProperties": {"^x": {"type": "integer"}},
        "additionalProperties": false
    });

    // matches the pattern and its schema: fine, not "no additional allowed"
    let errors = validate(schema_document.clone(), json!({"xyz": 3}));
    assert_eq!(errors.len(), 0);

    // matches the pattern but fails its schema
    let errors = validate(schema_document.clone(), json!({"xyz": "not an integer"}));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::AdditionalPropertiesNotValid);
    assert_eq!(errors[0].path, "#/xyz");

    // matches no pattern: rejected by the closed schema
    let errors = validate(schema_document, json!({"other": 1}));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NoAdditionalPropertiesAllowed);
    assert_eq!(errors[0].path, "#/other");
}

#[test]
fn additional_properties_schema_wraps_nested_failures() {
    let errors = validate(
        json!({
            "type": "object",
            "additionalProperties": {"type": "string"}
        }),
        json!({"free": 12}),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::AdditionalPropertiesNotValid);
    let ErrorChildren::PerSchema(groups) = &errors[0].children else {
        panic!("expected per-schema groups");
    };
    assert_eq!(groups[0].1[0].kind, ErrorKind::StringExpected);
}

#[test]
fn tuple_with_closed_additional_items_rejects_extra_elements() {
    let errors = validate(
        json!({
            "type": "array",
            "items": [{"type": "integer"}, {"type": "string"}],
            "additionalItems": false
        }),
        json!([1, "two", true]),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::TooManyItemsInTuple);
    assert_eq!(errors[0].path, "#[2]");
    assert_eq!(errors[0].property.as_deref(), Some("[2]"));
}

#[test]
fn tuple_additional_items_schema_applies_beyond_the_tuple() {
    let schema_document = json!({
        "type": "array",
        "items": [{"type": "integer"}],
        "additionalItems": {"type": "string"}
    });

    assert_eq!(validate(schema_document.clone(), json!([1, "a", "b"])).len(), 0);

    let errors = validate(schema_document, json!([1, "a", 3]));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::AdditionalItemNotValid);
    assert_eq!(errors[0].path, "#[2]");
}

#[test]
fn multi_type_union_wraps_both_type_buckets() {
    let errors = validate(json!({"type": ["string", "integer"]}), json!(true));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NoTypeValidates);
    let ErrorChildren::PerType(buckets) = &errors[0].children else {
        panic!("expected per-type buckets");
    };
    assert_eq!(buckets.len(), 2);
    let kinds: Vec<ErrorKind> = buckets
        .iter()
        .flat_map(|(_, bucket)| bucket.iter().map(|error| error.kind))
        .collect();
    assert!(kinds.contains(&ErrorKind::StringExpected));
    assert!(kinds.contains(&ErrorKind::IntegerExpected));
}

#[test]
fn numeric_exclusivity_boolean_form() {
    let schema_document = json!({"type": "number", "minimum": 5, "exclusiveMinimum": true});

    let errors = validate(schema_document.clone(), json!(5));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NumberTooSmall);

    assert_eq!(validate(schema_document, json!(5.0001)).len(), 0);
}

#[test]
fn paired_and_independent_bounds_apply_cumulatively() {
    // inclusive minimum 0 plus independent strict minimum 5
    let schema_document = json!({
        "type": "number",
        "minimum": 0,
        "exclusiveMinimum": 5
    });

    // passes the paired bound, fails the strict one
    let errors = validate(schema_document.clone(), json!(3));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NumberTooSmall);

    assert_eq!(validate(schema_document, json!(6)).len(), 0);
}

#[test]
fn object_property_count_bounds() {
    let schema_document = json!({
        "type": "object",
        "minProperties": 1,
        "maxProperties": 2
    });

    let too_few = validate(schema_document.clone(), json!({}));
    assert_eq!(too_few.len(), 1);
    assert_eq!(too_few[0].kind, ErrorKind::TooFewProperties);

    let too_many = validate(schema_document.clone(), json!({"a": 1, "b": 2, "c": 3}));
    assert_eq!(too_many.len(), 1);
    assert_eq!(too_many[0].kind, ErrorKind::TooManyProperties);

    assert_eq!(validate(schema_document, json!({"a": 1})).len(), 0);
}

#[test]
fn nested_property_paths_accumulate() {
    let errors = validate(
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {
                        "lines": {
                            "type": "array",
                            "items": {"type": "string"}
                        }
                    }
                }
            }
        }),
        json!({"address": {"lines": ["ok", 42]}}),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::ArrayItemNotValid);
    assert_eq!(errors[0].path, "#/address/lines[1]");
}

#[test]
fn validation_is_idempotent_and_order_stable() {
    let schema_document = json!({
        "type": "object",
        "required": ["id", "name"],
        "properties": {
            "id": {"type": "integer", "minimum": 1},
            "name": {"type": "string", "minLength": 2}
        },
        "additionalProperties": false
    });
    let value = json!({"id": 0, "name": "x", "extra": true});

    let first = validate(schema_document.clone(), value.clone());
    let second = validate(schema_document, value);

    let render = |errors: &[ValidationError]| -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    };
    assert_eq!(render(&first), render(&second));
    assert_eq!(first.len(), 3);
}

#[test]
fn integer_minimum_scenario_reports_one_error() {
    let errors = validate(
        json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "integer", "minimum": 1}
            }
        }),
        json!({"id": 0}),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::NumberTooSmall);
    assert_eq!(errors[0].path, "#/id");
}

#[test]
fn validate_text_entry_point_parses_then_validates() {
    let validator = SchemaValidator::new();
    let string_schema = schema(json!({"type": "string"}));

    let errors = validator
        .validate_text(r#""hello""#, &string_schema)
        .expect("valid JSON text");
    assert_eq!(errors.len(), 0);

    let errors = validator
        .validate_text("123", &string_schema)
        .expect("valid JSON text");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::StringExpected);

    assert!(validator.validate_text("{broken", &string_schema).is_err());
}

#[test]
fn composite_errors_render_nested_blocks() {
    let errors = validate(
        json!({
            "anyOf": [
                {"type": "string"},
                {"type": "integer"}
            ]
        }),
        json!([]),
    );

    let rendered = errors[0].to_string();
    assert!(rendered.starts_with("NotAnyOf: #"));
    assert!(rendered.contains("StringExpected: #"));
    assert!(rendered.contains("IntegerExpected: #"));
    assert!(rendered.contains('{'));
    assert!(rendered.contains('}'));
}
