//! Web search: the provider abstraction, the lenient per-query wrapper, and the DuckDuckGo backend.

mod duckduckgo;
mod provider;

pub use duckduckgo::DuckDuckGo;
pub use provider::{SearchError, SearchProvider, SearchResult, search_or_empty};
