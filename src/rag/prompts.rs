use crate::search::SearchResult;

pub const NO_RESULTS_NOTICE: &str = "No relevant search results were found.";
pub const RESULTS_HEADING: &str = "### Search Results:";

/// Pass 1: ask for exactly three search queries, never an answer.
pub fn query_generation_prompt(question: &str) -> String {
    format!(
        "Given the user's question below, generate **exactly 3** precise DuckDuckGo search queries \
         that retrieve **real-time** information.\n\
         **Do NOT attempt to answer the question directly.** Just provide search queries.\n\
         \n\
         User Question: {question}\n\
         \n\
         Output format:\n\
         - <search query 1>\n\
         - <search query 2>\n\
         - <search query 3>\n"
    )
}

/// Pass 2: answer from the aggregated results, or from prior knowledge when there are none.
pub fn answer_prompt(question: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return fallback_prompt(question);
    }

    let formatted = results
        .iter()
        .map(|r| format!("{} - {}\nSnippet: {}", r.title, r.link, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following **real-time** DuckDuckGo search results to **accurately answer** \
         the user's question.\n\
         \n\
         {RESULTS_HEADING}\n\
         {formatted}\n\
         \n\
         ### User Query:\n\
         {question}\n\
         \n\
         Provide a well-reasoned response based on these search results.\n"
    )
}

fn fallback_prompt(question: &str) -> String {
    format!(
        "{NO_RESULTS_NOTICE}\n\
         \n\
         ### User Query:\n\
         {question}\n\
         \n\
         Provide an informative answer based on prior knowledge instead.\n"
    )
}
