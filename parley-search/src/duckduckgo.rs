//! DuckDuckGo HTML endpoint: request and result-page parsing.
//!
//! Queries are form-posted to the JavaScript-free page. Organic results
//! carry a `.result__a` title link and an optional `.result__snippet`;
//! sponsored blocks are marked `.result--ad` and skipped.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchResult;

const RESULT_BLOCK: &str =
    ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)";
const TITLE_LINK: &str = ".result__a";
const SNIPPET: &str = ".result__snippet";

/// Post `query` to the configured endpoint and parse the page.
///
/// # Errors
///
/// [`SearchError::Http`] for transport failures and non-2xx statuses;
/// [`SearchError::Parse`] if the page cannot be read.
pub async fn search(
    client: &reqwest::Client,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    let safe = config.safe_search.then_some(("kp", "1"));
    let form: Vec<(&str, &str)> = std::iter::once(("q", query)).chain(safe).collect();

    let response = client
        .post(&config.endpoint)
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .form(&form)
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("request to results page failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Http(format!("results page answered {status}")));
    }

    let page = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("results page body unreadable: {e}")))?;
    trace!(bytes = page.len(), "results page fetched");

    parse_results(&page, config.max_results)
}

/// Resolve a result link to its target.
///
/// `//duckduckgo.com/l/?uddg=<target>` click-tracking links yield the
/// decoded target; other absolute links are returned unchanged; relative
/// or malformed links yield `None`.
pub(crate) fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_owned(),
    };
    let url = Url::parse(&absolute).ok()?;

    let tracked = url.path().starts_with("/l/")
        && url
            .host_str()
            .is_some_and(|host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"));
    if !tracked {
        return Some(absolute);
    }
    url.query_pairs()
        .find_map(|(key, value)| (key == "uddg").then(|| value.into_owned()))
}

struct Selectors {
    block: Selector,
    title: Selector,
    snippet: Selector,
}

impl Selectors {
    fn new() -> Result<Self, SearchError> {
        Ok(Self {
            block: compile(RESULT_BLOCK)?,
            title: compile(TITLE_LINK)?,
            snippet: compile(SNIPPET)?,
        })
    }

    fn extract(&self, block: ElementRef<'_>) -> Option<SearchResult> {
        let link = block.select(&self.title).next()?;
        let title = squash(link.text());
        if title.is_empty() {
            return None;
        }
        let href = unwrap_redirect(link.value().attr("href")?)?;
        let body = block
            .select(&self.snippet)
            .next()
            .map(|s| squash(s.text()))
            .unwrap_or_default();
        Some(SearchResult { title, href, body })
    }
}

/// Extract up to `max_results` organic results from a results page.
///
/// # Errors
///
/// [`SearchError::Parse`] if a selector fails to compile.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let selectors = Selectors::new()?;
    let page = Html::parse_document(html);
    let results: Vec<SearchResult> = page
        .select(&selectors.block)
        .filter_map(|block| selectors.extract(block))
        .take(max_results)
        .collect();
    debug!(count = results.len(), "results parsed");
    Ok(results)
}

fn compile(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("bad selector {css:?}: {e:?}")))
}

fn squash<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let joined: String = pieces.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
