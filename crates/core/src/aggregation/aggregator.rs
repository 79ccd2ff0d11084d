//! Deterministic merge of per-document contributions

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use super::config::AggregationConfig;
use super::error::DocumentResult;
use super::types::{
    AggregatedContext, DocumentCategory, DocumentContext, DocumentExtraction, Entity, FailedDocument,
};
use crate::inference::FieldDefinition;
use crate::schema::{Schema, normalize};

/// Combines extraction results from several documents into one context
///
/// Results are applied in index order no matter how they arrive, so "first
/// occurrence wins" is reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct ContextAggregator {
    config: AggregationConfig,
}

impl ContextAggregator {
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default())
    }

    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Aggregate results listed in input order
    pub fn aggregate_ordered<I>(&self, results: I) -> AggregatedContext
    where
        I: IntoIterator<Item = DocumentResult<DocumentExtraction>>,
    {
        self.aggregate(results.into_iter().enumerate())
    }

    /// Aggregate `(index, result)` pairs arriving in any order
    pub fn aggregate<I>(&self, results: I) -> AggregatedContext
    where
        I: IntoIterator<Item = (usize, DocumentResult<DocumentExtraction>)>,
    {
        let mut results: Vec<_> = results.into_iter().collect();
        results.sort_by_key(|(index, _)| *index);

        let mut state = State::default();
        for (index, result) in results {
            match result {
                Ok(extraction) => self.apply(&mut state, index, extraction),
                Err(e) => {
                    warn!(index, error = %e, "Document extraction failed, continuing without it");
                    state.context.counts.failed += 1;
                    state.context.failed.push(FailedDocument {
                        index,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.finish(state)
    }

    fn apply(&self, state: &mut State, index: usize, extraction: DocumentExtraction) {
        let DocumentExtraction { category, context } = extraction;
        let contributed = match (category, context) {
            (
                DocumentCategory::SchemaBearing,
                DocumentContext::Schema {
                    fields,
                    schema,
                    examples,
                },
            ) => {
                let contributed = !fields.is_empty() || schema.is_some() || !examples.is_empty();
                for field in fields {
                    state.merge_field(field);
                }
                if let Some(schema) = schema {
                    state.schemas.push(normalize(&schema));
                }
                state.examples.extend(examples);
                contributed
            }
            (
                DocumentCategory::TestPointBearing,
                DocumentContext::TestPoints {
                    test_points,
                    entities,
                    business_rules,
                },
            ) => {
                let contributed =
                    !test_points.is_empty() || !entities.is_empty() || !business_rules.is_empty();
                state.test_points.extend(test_points);
                for entity in entities {
                    state.merge_entity(entity);
                }
                state.business_rules.extend(business_rules);
                contributed
            }
            (
                DocumentCategory::TestPointBearing | DocumentCategory::Unknown,
                DocumentContext::RawContent { raw_content },
            ) => {
                let contributed = !raw_content.is_empty();
                if contributed {
                    let kept: String = raw_content.chars().take(self.config.max_raw_content_chars).collect();
                    if kept.len() < raw_content.len() {
                        state.context.truncation.raw_content_truncated.push(index);
                    }
                    state.context.raw_content.push(kept);
                }
                contributed
            }
            (category, _) => {
                debug!(index, ?category, "Context does not match document category, ignored");
                false
            }
        };

        let count = state.context.counts.category_mut(category);
        count.seen += 1;
        if contributed {
            count.contributed += 1;
        }
    }

    fn finish(&self, state: State) -> AggregatedContext {
        let State {
            mut context,
            fields,
            schemas,
            mut examples,
            mut test_points,
            entities,
            mut business_rules,
            ..
        } = state;

        let report = &mut context.truncation;
        report.examples_dropped = cap(&mut examples, self.config.max_examples);
        report.test_points_dropped = cap(&mut test_points, self.config.max_test_points);
        report.business_rules_dropped = cap(&mut business_rules, self.config.max_business_rules);
        if report.is_truncated() {
            warn!(
                examples_dropped = report.examples_dropped,
                test_points_dropped = report.test_points_dropped,
                business_rules_dropped = report.business_rules_dropped,
                raw_content_truncated = report.raw_content_truncated.len(),
                "Aggregated context truncated"
            );
        }

        context.schema_context.fields = fields;
        context.schema_context.schemas = schemas;
        context.schema_context.examples = examples;
        context.test_point_context.test_points = test_points;
        context.test_point_context.entities = entities;
        context.test_point_context.business_rules = business_rules;

        debug!(
            fields = context.schema_context.fields.len(),
            schemas = context.schema_context.schemas.len(),
            entities = context.test_point_context.entities.len(),
            failed = context.failed.len(),
            "Aggregation complete"
        );
        context
    }
}

#[derive(Default)]
struct State {
    context: AggregatedContext,
    fields: Vec<FieldDefinition>,
    field_index: HashMap<String, usize>,
    schemas: Vec<Schema>,
    examples: Vec<Value>,
    test_points: Vec<Value>,
    entities: Vec<Entity>,
    entity_index: HashMap<String, usize>,
    business_rules: Vec<Value>,
}

impl State {
    /// First occurrence is the base; later ones can only make it stricter
    fn merge_field(&mut self, field: FieldDefinition) {
        match self.field_index.get(&field.name) {
            Some(&i) => {
                let existing = &mut self.fields[i];
                existing.required |= field.required;
                existing.constraints.tighten_bounds(&field.constraints);
            }
            None => {
                self.field_index.insert(field.name.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    fn merge_entity(&mut self, entity: Entity) {
        match self.entity_index.get(&entity.name) {
            Some(&i) => self.entities[i].absorb_fields(&entity.fields),
            None => {
                self.entity_index.insert(entity.name.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }
}

/// Truncate to `max` entries, returning how many were dropped
fn cap<T>(items: &mut Vec<T>, max: usize) -> usize {
    let dropped = items.len().saturating_sub(max);
    items.truncate(max);
    dropped
}
