//! Per-document inputs and the aggregated context

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::inference::FieldDefinition;
use crate::schema::{Schema, merge_all, normalize};

/// What kind of document a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// API documentation and similar sources of fields and schemas
    SchemaBearing,
    /// Requirement documents yielding test points, entities and rules
    TestPointBearing,
    /// Anything unclassified
    Unknown,
}

/// Context extracted from one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "context_type", rename_all = "snake_case")]
pub enum DocumentContext {
    Schema {
        #[serde(default)]
        fields: Vec<FieldDefinition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Schema>,
        #[serde(default)]
        examples: Vec<Value>,
    },
    TestPoints {
        #[serde(default)]
        test_points: Vec<Value>,
        #[serde(default)]
        entities: Vec<Entity>,
        #[serde(default)]
        business_rules: Vec<Value>,
    },
    RawContent {
        #[serde(default)]
        raw_content: String,
    },
}

/// A business entity named by a requirement document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Field objects; deduplicated by their `name` key
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Value>) -> Self {
        self.fields = fields;
        self
    }

    /// Append fields not present yet, in source order
    ///
    /// Named fields dedupe by `name`; fields without one dedupe by value.
    pub fn absorb_fields(&mut self, fields: &[Value]) {
        for field in fields {
            if !self.fields.iter().any(|existing| same_field(existing, field)) {
                self.fields.push(field.clone());
            }
        }
    }
}

fn same_field(a: &Value, b: &Value) -> bool {
    match (field_name(a), field_name(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a == b,
        _ => false,
    }
}

fn field_name(field: &Value) -> Option<&str> {
    field.get("name").and_then(Value::as_str)
}

/// Extraction result for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub category: DocumentCategory,
    pub context: DocumentContext,
}

impl DocumentExtraction {
    pub fn new(category: DocumentCategory, context: DocumentContext) -> Self {
        Self { category, context }
    }

    /// Schema-bearing extraction from fields, an optional schema and examples
    pub fn schema(fields: Vec<FieldDefinition>, schema: Option<Schema>, examples: Vec<Value>) -> Self {
        Self::new(
            DocumentCategory::SchemaBearing,
            DocumentContext::Schema {
                fields,
                schema,
                examples,
            },
        )
    }

    /// Test-point-bearing extraction
    pub fn test_points(test_points: Vec<Value>, entities: Vec<Entity>, business_rules: Vec<Value>) -> Self {
        Self::new(
            DocumentCategory::TestPointBearing,
            DocumentContext::TestPoints {
                test_points,
                entities,
                business_rules,
            },
        )
    }

    /// Unclassified document carrying raw text
    pub fn raw(raw_content: impl Into<String>) -> Self {
        Self::new(
            DocumentCategory::Unknown,
            DocumentContext::RawContent {
                raw_content: raw_content.into(),
            },
        )
    }
}

/// Merged contributions of schema-bearing documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaContext {
    /// Fields deduplicated by name, first occurrence order
    pub fields: Vec<FieldDefinition>,
    /// Contributed schemas, unmerged, in input order
    pub schemas: Vec<Schema>,
    pub examples: Vec<Value>,
}

impl SchemaContext {
    /// Fold the contributed schemas into one, earlier documents as primary
    ///
    /// Each schema is normalized first, so hand-built contexts holding raw
    /// generated schemas still merge into a normalized result.
    pub fn merged_schema(&self) -> Schema {
        let normalized: Vec<Schema> = self.schemas.iter().map(normalize).collect();
        merge_all(&normalized)
    }
}

/// Merged contributions of test-point-bearing documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestPointContext {
    pub test_points: Vec<Value>,
    /// Entities deduplicated by name
    pub entities: Vec<Entity>,
    pub business_rules: Vec<Value>,
}

/// Documents seen in a category versus documents that contributed something
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub seen: usize,
    pub contributed: usize,
}

/// Per-category document counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationCounts {
    pub schema_bearing: CategoryCount,
    pub test_point_bearing: CategoryCount,
    pub unknown: CategoryCount,
    pub failed: usize,
}

impl AggregationCounts {
    pub(crate) fn category_mut(&mut self, category: DocumentCategory) -> &mut CategoryCount {
        match category {
            DocumentCategory::SchemaBearing => &mut self.schema_bearing,
            DocumentCategory::TestPointBearing => &mut self.test_point_bearing,
            DocumentCategory::Unknown => &mut self.unknown,
        }
    }

    pub fn category(&self, category: DocumentCategory) -> CategoryCount {
        match category {
            DocumentCategory::SchemaBearing => self.schema_bearing,
            DocumentCategory::TestPointBearing => self.test_point_bearing,
            DocumentCategory::Unknown => self.unknown,
        }
    }
}

/// Which collection caps dropped data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationReport {
    pub examples_dropped: usize,
    pub test_points_dropped: usize,
    pub business_rules_dropped: usize,
    /// Indices of documents whose raw content was cut
    pub raw_content_truncated: Vec<usize>,
}

impl TruncationReport {
    pub fn is_truncated(&self) -> bool {
        self.examples_dropped > 0
            || self.test_points_dropped > 0
            || self.business_rules_dropped > 0
            || !self.raw_content_truncated.is_empty()
    }
}

/// A document whose extraction failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    pub index: usize,
    pub error: String,
}

/// Combined context of several documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedContext {
    pub schema_context: SchemaContext,
    pub test_point_context: TestPointContext,
    /// Raw content per contributing document, in input order
    pub raw_content: Vec<String>,
    pub counts: AggregationCounts,
    pub failed: Vec<FailedDocument>,
    pub truncation: TruncationReport,
}

impl AggregatedContext {
    pub fn has_schema_context(&self) -> bool {
        self.counts.schema_bearing.contributed > 0
    }

    pub fn has_test_point_context(&self) -> bool {
        self.counts.test_point_bearing.contributed > 0
    }

    /// Look up a merged field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.schema_context.fields.iter().find(|f| f.name == name)
    }
}
