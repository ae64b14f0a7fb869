use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::provider::{SearchError, SearchProvider, SearchResult};

const BASE_URL: &str = "https://html.duckduckgo.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// The HTML endpoint serves its bot-check page to non-browser agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

static RESULT: LazyLock<Selector> = LazyLock::new(|| selector("div.result"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a.result__a"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| selector(".result__snippet"));
static ANOMALY: LazyLock<Selector> =
    LazyLock::new(|| selector(".anomaly-modal, #challenge-form"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Web search over DuckDuckGo's no-JavaScript HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    http: Client,
    base_url: String,
}

impl DuckDuckGo {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl SearchProvider for DuckDuckGo {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let mut url = Url::parse(&format!("{}/html/", self.base_url))?;
        url.query_pairs_mut().append_pair("q", query);

        let response = self
            .http
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let results = parse_results(&html, max_results)?;
        debug!(query = %query, count = results.len(), "duckduckgo search complete");
        Ok(results)
    }
}

fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    if document.select(&ANOMALY).next().is_some() {
        return Err(SearchError::Blocked);
    }

    let results = document
        .select(&RESULT)
        .filter(|el| !el.value().classes().any(|c| c == "result--ad"))
        .map(|el| {
            let anchor = el.select(&TITLE).next();
            let title = anchor.map(collapsed_text);
            let link = anchor
                .and_then(|a| a.value().attr("href"))
                .map(decode_link);
            let snippet = el.select(&SNIPPET).next().map(collapsed_text);
            SearchResult::new(title, link, snippet)
        })
        .take(max_results)
        .collect();

    Ok(results)
}

fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` redirect links to their target.
fn decode_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        return href.to_string();
    };
    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
        && parsed.path() == "/l/";
    if !is_redirect {
        return absolute;
    }

    parsed
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
        .unwrap_or(absolute)
}
