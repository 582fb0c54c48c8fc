//! The shared HTTP client.

use rand::seq::SliceRandom;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Desktop browser User-Agents; the endpoint serves a reduced page to
/// unknown agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

const MAX_REDIRECTS: usize = 5;

/// Client with a cookie jar, the configured timeout, and either the
/// configured User-Agent or a random browser one.
///
/// # Errors
///
/// [`SearchError::Http`] if reqwest cannot build the client.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let agent = match &config.user_agent {
        Some(custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .user_agent(agent)
        .timeout(config.timeout())
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| SearchError::Http(format!("client construction failed: {e}")))
}

/// One of the built-in browser User-Agents.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}
