use futures::stream::{self, StreamExt};
use tracing::info;

use super::prompts::{answer_prompt, query_generation_prompt};
use super::queries::extract_queries;
use crate::llm::client::{LlmError, ModelClient};
use crate::llm::think::parse_response;
use crate::search::{SearchProvider, SearchResult, search_or_empty};

pub const DEFAULT_RESULTS_PER_QUERY: usize = 3;
const MAX_CONCURRENCY: usize = 8;

#[derive(Debug)]
pub struct RagRequest<'a> {
    pub question: &'a str,
    pub results_per_query: usize,
    /// Searches in flight at once; results are still aggregated in query order.
    pub concurrency: usize,
}

impl<'a> RagRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self {
            question,
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            concurrency: 1,
        }
    }
}

/// Everything one run produced, kept separate from how it is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagReport {
    pub query_reasoning: String,
    pub queries: Vec<String>,
    pub results: Vec<SearchResult>,
    pub source_links: Vec<String>,
    pub final_prompt: String,
    pub reasoning: String,
    pub answer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("query generation failed: {0}")]
    QueryGeneration(#[source] LlmError),

    #[error("answer generation failed: {0}")]
    Answer(#[source] LlmError),
}

pub async fn run(
    model: &impl ModelClient,
    search: &impl SearchProvider,
    req: RagRequest<'_>,
) -> Result<RagReport, RagError> {
    info!("pass 1: generating search queries");
    let raw = model
        .complete(&query_generation_prompt(req.question))
        .await
        .map_err(RagError::QueryGeneration)?;
    let pass1 = parse_response(&raw);
    let queries = extract_queries(&pass1.answer);
    info!(count = queries.len(), ?queries, "identified search queries");

    let per_query = gather(search, &queries, req.results_per_query, req.concurrency).await;

    let mut results = Vec::new();
    let mut source_links = Vec::new();
    for (query, found) in queries.iter().zip(per_query) {
        if found.is_empty() {
            info!(query = %query, "no results found for query");
            continue;
        }
        source_links.extend(found.iter().map(|r| r.link.clone()));
        results.extend(found);
    }

    info!(results = results.len(), "pass 2: generating final answer");
    let final_prompt = answer_prompt(req.question, &results);
    let raw = model
        .complete(&final_prompt)
        .await
        .map_err(RagError::Answer)?;
    let pass2 = parse_response(&raw);

    Ok(RagReport {
        query_reasoning: pass1.reasoning,
        queries,
        results,
        source_links,
        final_prompt,
        reasoning: pass2.reasoning,
        answer: pass2.answer,
    })
}

/// Runs one search per query; the output is index-aligned with `queries`.
async fn gather(
    search: &impl SearchProvider,
    queries: &[String],
    max_results: usize,
    concurrency: usize,
) -> Vec<Vec<SearchResult>> {
    stream::iter(queries)
        .map(|query| async move {
            info!(query = %query, "searching");
            search_or_empty(search, query, max_results).await
        })
        .buffered(concurrency.clamp(1, MAX_CONCURRENCY))
        .collect()
        .await
}
