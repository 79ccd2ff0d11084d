//! End-to-end behaviour of the inference, normalization, validation, merge
//! and aggregation engine

use schemaweave_core::aggregation::{ContextAggregator, DocumentExtraction};
use schemaweave_core::inference::{FieldDefinition, FieldInferrer, FieldType, InferenceConfig};
use schemaweave_core::schema::{Schema, SchemaError, build_schema, merge, merge_all, normalize, normalize_value};
use schemaweave_core::validation::{SchemaValidator, ValidationBackend, ValidationConfig, ValidationResult};
use serde_json::{Value, json};

fn schema(value: Value) -> Schema {
    Schema::from_value(value).unwrap()
}

fn validators() -> Vec<SchemaValidator> {
    let mut validators = vec![SchemaValidator::with_config(
        ValidationConfig::builder()
            .backend(ValidationBackend::Fallback)
            .build(),
    )];
    #[cfg(feature = "schema-validation")]
    validators.push(SchemaValidator::with_config(
        ValidationConfig::builder()
            .backend(ValidationBackend::Library)
            .build(),
    ));
    validators
}

mod inference_tests {
    use super::*;

    #[test]
    fn test_example_to_schema() {
        let parsed = FieldInferrer::new()
            .parse_json(
                r#"{
                    "name": "Alice",
                    "email": "alice@example.com",
                    "age": 30,
                    "score": 9.5,
                    "active": true,
                    "birthday": "1994-05-01",
                    "address": {"city": "Berlin", "zip": "10115"},
                    "orders": [{"id": 1, "total": 12.5}],
                    "tags": ["a", "b"]
                }"#,
            )
            .unwrap();

        let value = parsed.schema.into_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"], json!([]));
        let props = &value["properties"];
        assert_eq!(props["name"]["type"], "string");
        assert!(props["email"]["pattern"].is_string());
        assert_eq!(props["age"]["minimum"], json!(15));
        assert_eq!(props["score"]["type"], "number");
        assert_eq!(props["active"]["type"], "boolean");
        assert_eq!(props["birthday"]["type"], "date");
        assert_eq!(props["address"]["properties"]["city"]["type"], "string");
        assert_eq!(props["orders"]["items"]["properties"]["total"]["type"], "number");
        assert_eq!(props["tags"]["items"]["type"], "string");
        assert_eq!(props["tags"]["maxItems"], json!(4));

        let orders = parsed
            .field_definitions
            .iter()
            .find(|f| f.name == "orders")
            .unwrap();
        let item_fields = orders.items.as_ref().unwrap().properties.as_ref().unwrap();
        assert_eq!(item_fields[0].path, "orders[].id");
        assert!(!parsed.truncated);
    }

    #[test]
    fn test_truncation_is_reported() {
        let inferrer = FieldInferrer::with_config(InferenceConfig::builder().max_depth(2).build());
        let parsed = inferrer
            .parse_json(r#"{"a": {"b": {"c": {"d": 1}}}}"#)
            .unwrap();
        assert!(parsed.truncated);
        assert_eq!(parsed.truncated_paths, vec!["a.b.c".to_string()]);
        assert_eq!(
            parsed.schema.to_value()["properties"]["a"]["properties"]["b"]["properties"]["c"]["type"],
            "object"
        );
    }

    #[test]
    fn test_oversized_input_rejected() {
        let big = format!(r#"{{"blob": "{}"}}"#, "x".repeat(1024 * 1024));
        assert!(FieldInferrer::new().parse_json(&big).is_err());
    }
}

mod normalization_tests {
    use super::*;

    #[test]
    fn test_required_promotion() {
        let out = normalize_value(&json!({"properties": {"a": {"type": "string", "required": true}}})).unwrap();
        assert_eq!(out.required(), vec!["a".to_string()]);
        assert!(out.property("a").unwrap().get("required").is_none());
    }

    #[test]
    fn test_envelope_unwrap() {
        let out = normalize_value(&json!({
            "properties": {"response": {"type": "object", "properties": {"id": {"type": "integer"}}}}
        }))
        .unwrap();
        assert_eq!(out.to_value()["properties"], json!({"id": {"type": "integer"}}));
    }

    #[test]
    fn test_normalize_is_idempotent_on_generated_shapes() {
        let generated = json!({
            "type": "object",
            "required": true,
            "properties": {
                "order": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": {"type": "integer", "constraints": {"minimum": 1}},
                        "lines": {
                            "type": "array",
                            "items": {"type": "object", "properties": {"sku": {"type": "string", "required": true}}}
                        }
                    }
                },
                "note": {"type": "string", "required": false}
            },
            "allOf": [{"properties": {"x": {"required": true}}}]
        });
        let once = normalize_value(&generated).unwrap();
        assert_eq!(normalize(&once), once);
        assert_eq!(once.required(), vec!["order", "note", "order.id"]);
        assert_eq!(
            once.to_value()["properties"]["order"]["properties"]["id"]["minimum"],
            json!(1)
        );
    }

    #[test]
    fn test_builder_output_is_stable_under_normalization() {
        let parsed = FieldInferrer::new()
            .parse_json(r#"{"user": {"name": "x"}, "rows": [{"id": 1}]}"#)
            .unwrap();
        let normalized = normalize(&parsed.schema);
        assert_eq!(normalize(&normalized), normalized);
        assert_eq!(normalized.required(), Vec::<String>::new());
    }
}

mod validation_tests {
    use super::*;

    fn round_trip_schema() -> Schema {
        schema(json!({
            "type": "object",
            "properties": {"n": {"type": "string", "minLength": 2, "maxLength": 4}},
            "required": ["n"]
        }))
    }

    fn only_error(result: &ValidationResult) -> &str {
        assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
        &result.errors[0]
    }

    #[test]
    fn test_round_trip_on_both_engines() {
        let s = round_trip_schema();
        for validator in validators() {
            let engine = validator.engine_name();

            let ok = validator.validate(&json!({"n": "ab"}), &s).unwrap();
            assert!(ok.valid, "{}: {:?}", engine, ok.errors);

            let short = validator.validate(&json!({"n": "a"}), &s).unwrap();
            assert!(!short.valid);
            assert!(only_error(&short).starts_with("n: "), "{}", engine);
            assert_eq!(short.details[0].validator_kind, "minLength");
            assert_eq!(short.details[0].path, "n");
            assert_eq!(short.errors[0], format!("n: {}", short.details[0].message));

            let missing = validator.validate(&json!({}), &s).unwrap();
            assert!(only_error(&missing).starts_with("n: "), "{}", engine);
            assert_eq!(missing.details[0].validator_kind, "required");
            assert_eq!(missing.details[0].path, "n");
        }
    }

    #[test]
    fn test_both_engines_cover_the_same_failures() {
        let s = schema(json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "minimum": 0, "maximum": 150},
                "email": {"type": "string", "pattern": "^[^@]+@[^@]+$"},
                "tags": {"type": "array", "maxItems": 2, "items": {"type": "string"}},
                "kind": {"type": "string", "enum": ["a", "b"]},
                "count": {"type": "integer", "minimum": 10},
                "level": {"type": "number", "enum": [1, 2]},
                "user": {
                    "type": "object",
                    "properties": {"name": {"type": "string", "required": true}}
                }
            },
            "required": ["age"]
        }));
        let data = json!({
            "age": 200,
            "email": "nope",
            "tags": ["x", "y", 3],
            "kind": "c",
            "count": 3.0,
            "level": 1.0,
            "user": {}
        });

        for validator in validators() {
            let result = validator.validate(&data, &s).unwrap();
            let mut found: Vec<(String, String)> = result
                .details
                .iter()
                .map(|d| (d.path.clone(), d.validator_kind.clone()))
                .collect();
            found.sort();
            let expected: Vec<(String, String)> = vec![
                ("age", "maximum"),
                ("count", "type"),
                ("email", "pattern"),
                ("kind", "enum"),
                ("tags", "maxItems"),
                ("tags[2]", "type"),
                ("user.name", "required"),
            ]
            .into_iter()
            .map(|(p, k)| (p.to_string(), k.to_string()))
            .collect();
            assert_eq!(found, expected, "engine {}", validator.engine_name());
            assert_eq!(result.valid, result.errors.is_empty());
        }
    }

    #[test]
    fn test_integral_float_against_integer_on_both_engines() {
        let s = schema(json!({"type": "object", "properties": {"k": {"type": "integer"}}}));
        for validator in validators() {
            let engine = validator.engine_name();
            let result = validator.validate(&json!({"k": 3.0}), &s).unwrap();
            assert!(!result.valid, "{}", engine);
            assert_eq!(result.details.len(), 1, "{}", engine);
            assert_eq!(result.details[0].path, "k");
            assert_eq!(result.details[0].validator_kind, "type");

            assert!(validator.validate(&json!({"k": 3}), &s).unwrap().valid, "{}", engine);
        }
    }

    #[test]
    fn test_numeric_enum_and_float_bounds_on_both_engines() {
        let s = schema(json!({
            "type": "object",
            "properties": {
                "level": {"type": "number", "enum": [1, 2]},
                "code": {"type": "string", "minLength": 2.0}
            }
        }));
        for validator in validators() {
            let engine = validator.engine_name();
            let ok = validator.validate(&json!({"level": 1.0, "code": "ab"}), &s).unwrap();
            assert!(ok.valid, "{}: {:?}", engine, ok.errors);

            let bad = validator.validate(&json!({"level": 3, "code": "a"}), &s).unwrap();
            let mut kinds: Vec<&str> = bad.details.iter().map(|d| d.validator_kind.as_str()).collect();
            kinds.sort();
            assert_eq!(kinds, vec!["enum", "minLength"], "{}", engine);
        }
    }

    #[test]
    fn test_list_data_on_both_engines() {
        let s = round_trip_schema();
        for validator in validators() {
            let result = validator
                .validate(&json!([{"n": "ok"}, {"n": 5}, {}]), &s)
                .unwrap();
            let paths: Vec<&str> = result.details.iter().map(|d| d.path.as_str()).collect();
            assert_eq!(paths, vec!["item[1].n", "item[2].n"], "{}", validator.engine_name());
            assert!(!result.valid);
        }
    }

    #[test]
    fn test_temporal_types_on_both_engines() {
        let s = schema(json!({"type": "object", "properties": {"d": {"type": "date"}}}));
        for validator in validators() {
            assert!(validator.validate(&json!({"d": "2024-01-01"}), &s).unwrap().valid);
            let bad = validator.validate(&json!({"d": 20240101}), &s).unwrap();
            assert_eq!(bad.details.len(), 1);
            assert_eq!(bad.details[0].validator_kind, "type");
        }
    }

    #[test]
    fn test_unparseable_string_data() {
        for validator in validators() {
            let result = validator.validate_str("{\"n\": ", &round_trip_schema()).unwrap();
            assert!(!result.valid);
            assert_eq!(result.errors.len(), 1);
        }
    }

    #[test]
    fn test_structural_schema_error_is_distinct() {
        let s = schema(json!({"type": "string"}));
        for validator in validators() {
            assert!(matches!(
                validator.validate(&json!({}), &s),
                Err(SchemaError::UnsupportedRootType(_))
            ));
        }
    }
}

mod merge_tests {
    use super::*;

    #[test]
    fn test_merge_tightening() {
        let primary = schema(json!({"properties": {"x": {"type": "integer", "minimum": 5}}}));
        let secondary = schema(json!({"properties": {"x": {"type": "integer", "minimum": 10}}}));
        let merged = merge(Some(&primary), Some(&secondary)).into_value();
        assert_eq!(merged["properties"]["x"]["minimum"], json!(10));
        assert_eq!(merged["required"], json!([]));
    }

    #[test]
    fn test_templates_then_document() {
        let template_a = normalize_value(&json!({
            "properties": {"id": {"type": "integer", "required": true, "description": "Identifier"}}
        }))
        .unwrap();
        let template_b = normalize_value(&json!({
            "properties": {"name": {"type": "string", "maxLength": 40}}
        }))
        .unwrap();
        let document = build_schema(&[
            FieldDefinition::new("name", "name", FieldType::String).with_required(true),
            FieldDefinition::new("id", "id", FieldType::String),
        ]);

        let templates = merge_all([&template_a, &template_b]);
        let merged = merge(Some(&templates), Some(&document));
        let value = merged.to_value();

        assert_eq!(value["properties"]["id"]["type"], "integer");
        assert_eq!(value["properties"]["id"]["description"], "Identifier");
        assert_eq!(value["properties"]["name"]["maxLength"], json!(40));
        assert_eq!(merged.required(), vec!["id".to_string(), "name".to_string()]);
    }
}

mod aggregation_tests {
    use super::*;

    #[test]
    fn test_aggregation_determinism() {
        let doc = |name: &str, required: bool| {
            DocumentExtraction::schema(
                vec![FieldDefinition::new(name, name, FieldType::String).with_required(required)],
                None,
                Vec::new(),
            )
        };
        let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

        for order in orders {
            let docs = [doc("a", false), doc("a", true), doc("b", false)];
            let arrivals: Vec<_> = order.iter().map(|&i| (i, Ok(docs[i].clone()))).collect();
            let context = ContextAggregator::new().aggregate(arrivals);

            assert_eq!(context.schema_context.fields.len(), 2);
            assert!(context.field("a").unwrap().required);
            assert_eq!(context.schema_context.fields[0].name, "a");
        }
    }

    #[test]
    fn test_generated_schemas_are_normalized_before_merging() {
        let extraction = |schema: Value| -> DocumentExtraction {
            serde_json::from_value(json!({
                "category": "schema_bearing",
                "context": {"context_type": "schema", "schema": schema}
            }))
            .unwrap()
        };
        let context = ContextAggregator::new().aggregate_ordered(vec![
            Ok(extraction(json!({"properties": {"a": {"type": "string", "required": true}}}))),
            Ok(extraction(json!({
                "type": "object",
                "properties": {"data": {"type": "object", "properties": {
                    "b": {"type": "integer", "required": true}
                }}}
            }))),
        ]);

        assert_eq!(context.schema_context.schemas[0].required(), vec!["a".to_string()]);
        let merged = context.schema_context.merged_schema().into_value();
        assert_eq!(merged["type"], json!("object"));
        assert_eq!(merged["required"], json!(["a", "b"]));
        assert!(merged["properties"]["a"].get("required").is_none());
        assert!(merged["properties"]["b"].get("required").is_none());
    }

    #[test]
    fn test_merged_schema_from_documents() {
        let first = FieldInferrer::new()
            .parse_json(r#"{"id": 10, "name": "widget"}"#)
            .unwrap();
        let second = FieldInferrer::new()
            .parse_json(r#"{"id": 40, "price": 2.5}"#)
            .unwrap();

        let context = ContextAggregator::new().aggregate_ordered(vec![
            Ok(DocumentExtraction::schema(first.field_definitions, Some(first.schema), vec![])),
            Ok(DocumentExtraction::schema(second.field_definitions, Some(second.schema), vec![])),
        ]);

        let id = context.field("id").unwrap();
        assert_eq!(id.constraints.minimum, Some(20.into()));
        assert_eq!(id.constraints.maximum, Some(20.into()));

        let merged = context.schema_context.merged_schema();
        let names: Vec<&String> = merged.properties().unwrap().keys().collect();
        assert_eq!(names, vec!["id", "name", "price"]);
    }
}
