//! Aggregate context from a set of document files

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;
use schemaweave_core::aggregation::{
    AggregationConfig, ContextAggregator, DocumentError, DocumentExtraction, DocumentExtractor,
    DocumentResult, aggregate_concurrently,
};
use schemaweave_core::{FieldInferrer, InferenceConfig, InferenceError, parse_candidate};
use serde_json::Value;
use tracing::debug;

use crate::error::CliError;
use crate::output::{OutputFormat, emit};

/// Arguments for the `aggregate` command
#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    /// Document files, in the order their contributions apply
    #[arg(required = true, num_args = 1..)]
    pub documents: Vec<PathBuf>,
    /// Override the configured number of concurrent extractions
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Print only the merged schema of all schema-bearing documents
    #[arg(long)]
    pub merged_schema: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Reads documents from disk and classifies their content
///
/// A file holding a serialized [`DocumentExtraction`] is used as is. Any other
/// JSON (fenced or bare) is treated as an example and inferred into a
/// schema-bearing contribution, subject to the inference input ceiling.
/// Everything else is raw content.
pub struct FileExtractor {
    inferrer: FieldInferrer,
}

impl FileExtractor {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            inferrer: FieldInferrer::with_config(config),
        }
    }

    fn classify(&self, content: &str) -> DocumentResult<DocumentExtraction> {
        if let Ok(extraction) = serde_json::from_str::<DocumentExtraction>(content) {
            return Ok(extraction);
        }
        match parse_candidate(content) {
            Ok(example @ (Value::Object(_) | Value::Array(_))) => {
                let max = self.inferrer.config().max_input_bytes;
                if content.len() > max {
                    return Err(InferenceError::InputTooLarge {
                        size: content.len(),
                        max,
                    }
                    .into());
                }
                let parsed = self.inferrer.parse_value(&example);
                Ok(DocumentExtraction::schema(
                    parsed.field_definitions,
                    Some(parsed.schema),
                    vec![example],
                ))
            }
            _ => Ok(DocumentExtraction::raw(content)),
        }
    }
}

#[async_trait]
impl DocumentExtractor for FileExtractor {
    type Document = PathBuf;

    async fn extract(&self, document: &PathBuf) -> DocumentResult<DocumentExtraction> {
        let content = tokio::fs::read_to_string(document)
            .await
            .map_err(|e| DocumentError::Extraction(format!("{}: {}", document.display(), e)))?;
        debug!(path = %document.display(), bytes = content.len(), "Read document");
        self.classify(&content)
    }
}

/// Handle the `aggregate` command
pub fn handle_aggregate(
    args: &AggregateArgs,
    inference: &InferenceConfig,
    aggregation: &AggregationConfig,
) -> Result<(), CliError> {
    let mut config = aggregation.clone();
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.max(1);
    }

    let extractor = FileExtractor::new(inference.clone());
    let aggregator = ContextAggregator::with_config(config);
    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError::RuntimeError(e.to_string()))?;
    let context = runtime.block_on(aggregate_concurrently(&extractor, &args.documents, &aggregator));

    eprintln!("Aggregated {} document(s):", args.documents.len());
    eprintln!(
        "  Schema-bearing: {} seen, {} contributed",
        context.counts.schema_bearing.seen, context.counts.schema_bearing.contributed
    );
    eprintln!(
        "  Test-point-bearing: {} seen, {} contributed",
        context.counts.test_point_bearing.seen, context.counts.test_point_bearing.contributed
    );
    eprintln!(
        "  Unknown: {} seen, {} contributed",
        context.counts.unknown.seen, context.counts.unknown.contributed
    );
    for failed in &context.failed {
        eprintln!("  Failed #{}: {}", failed.index, failed.error);
    }
    if context.truncation.is_truncated() {
        eprintln!("  Some collections were capped, see `truncation`");
    }

    if args.merged_schema {
        if !context.has_schema_context() {
            return Err(CliError::InvalidArgument(
                "No schema-bearing documents to merge".to_string(),
            ));
        }
        emit(&context.schema_context.merged_schema(), args.format, args.output.as_ref())
    } else {
        emit(&context, args.format, args.output.as_ref())
    }
}
