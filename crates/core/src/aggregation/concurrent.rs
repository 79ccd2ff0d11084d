//! Concurrent per-document extraction feeding the aggregator

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

use super::aggregator::ContextAggregator;
use super::error::DocumentResult;
use super::types::{AggregatedContext, DocumentExtraction};

/// Produces an extraction result for one document
///
/// Implementations wrap whatever slow collaborator does the work (a text
/// generation service, a parser); timeouts and retries are theirs to handle.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Input handed to the extractor, e.g. a document id or its text
    type Document: Send + Sync;

    /// Extract the context of a single document
    async fn extract(&self, document: &Self::Document) -> DocumentResult<DocumentExtraction>;
}

/// Run `extractor` over every document and aggregate the results
///
/// At most `concurrency` extractions run at once. Completions are buffered and
/// applied by original index, so the outcome does not depend on which
/// extraction finishes first. A failed document is reported, not fatal.
pub async fn aggregate_concurrently<E>(
    extractor: &E,
    documents: &[E::Document],
    aggregator: &ContextAggregator,
) -> AggregatedContext
where
    E: DocumentExtractor,
{
    let concurrency = aggregator.config().concurrency.max(1);
    debug!(documents = documents.len(), concurrency, "Starting concurrent extraction");

    let results: Vec<(usize, DocumentResult<DocumentExtraction>)> = stream::iter(documents.iter().enumerate())
        .map(|(index, document)| async move { (index, extractor.extract(document).await) })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    aggregator.aggregate(results)
}
