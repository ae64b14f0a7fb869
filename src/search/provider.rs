use tracing::warn;

pub const NO_TITLE: &str = "No title";
pub const NO_LINK: &str = "No link";
pub const NO_SNIPPET: &str = "No snippet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchResult {
    /// Builds a result, substituting placeholders for missing or blank fields.
    pub fn new(title: Option<String>, link: Option<String>, snippet: Option<String>) -> Self {
        fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| placeholder.to_string())
        }

        Self {
            title: or_placeholder(title, NO_TITLE),
            link: or_placeholder(link, NO_LINK),
            snippet: or_placeholder(snippet, NO_SNIPPET),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search failed: status {0}")]
    Status(u16),

    #[error("search blocked: provider returned a bot-check page")]
    Blocked,

    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Abstraction for a web search backend.
/// Implemented by `DuckDuckGo` for production; mock implementations used in tests.
pub trait SearchProvider {
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, SearchError>;
}

/// Runs one search, degrading any provider error to an empty result set.
pub async fn search_or_empty(
    provider: &impl SearchProvider,
    query: &str,
    max_results: usize,
) -> Vec<SearchResult> {
    match provider.search(query, max_results).await {
        Ok(results) => results,
        Err(e) => {
            warn!(query = %query, error = %e, "search failed, treating as no results");
            Vec::new()
        }
    }
}
