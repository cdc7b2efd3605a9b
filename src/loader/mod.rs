use std::sync::Weak;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::model::{ApiResponse, TriviaItem};
use crate::transform;
use crate::view::TriviaView;

pub const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";
pub const DEFAULT_AMOUNT: u32 = 50;
pub const MAX_AMOUNT: u32 = 50;
pub const DEFAULT_TIMEOUT_SECONDS: usize = 10;

#[derive(Clone, Debug)]
pub struct LoaderOptions {
    pub endpoint: String,
    pub amount: u32,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            amount: DEFAULT_AMOUNT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            proxy: None,
        }
    }
}

/// Everything that can go wrong while loading the question batch. All of
/// them are terminal for the load attempt.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("invalid endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("invalid amount {value}, expected 1..=50")]
    InvalidAmount { value: u32 },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("question bank answered HTTP {status}")]
    Status { status: u16 },

    #[error("failed to read response body: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("question bank returned response_code {code} ({reason})")]
    Api { code: u8, reason: &'static str },
}

pub fn api_code_reason(code: u8) -> &'static str {
    match code {
        0 => "success",
        1 => "no results",
        2 => "invalid parameter",
        3 => "token not found",
        4 => "token empty",
        5 => "rate limited",
        _ => "unknown",
    }
}

fn build_client(proxy: Option<&str>, timeout_seconds: usize) -> Result<reqwest::Client, LoadFailure> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            "trivia-table/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| LoadFailure::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| LoadFailure::HttpClientBuild { source: e })
}

/// Fetches one batch of questions from the question bank.
#[derive(Clone, Debug)]
pub struct Loader {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl Loader {
    pub fn new(options: LoaderOptions) -> Result<Self, LoadFailure> {
        if options.amount == 0 || options.amount > MAX_AMOUNT {
            return Err(LoadFailure::InvalidAmount {
                value: options.amount,
            });
        }
        let mut url = reqwest::Url::parse(options.endpoint.trim()).map_err(|e| {
            LoadFailure::InvalidEndpoint {
                url: options.endpoint.clone(),
                message: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("amount", &options.amount.to_string());

        let client = build_client(options.proxy.as_deref(), options.timeout_seconds)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<TriviaItem>, LoadFailure> {
        tracing::debug!(url = %self.url, "requesting trivia batch");
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| LoadFailure::Request {
                url: self.url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadFailure::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| LoadFailure::Body { source: e })?;
        let parsed: ApiResponse =
            serde_json::from_slice(&body).map_err(|e| LoadFailure::Decode { source: e })?;
        if parsed.response_code != 0 {
            return Err(LoadFailure::Api {
                code: parsed.response_code,
                reason: api_code_reason(parsed.response_code),
            });
        }

        Ok(transform::decode_items(&parsed.results))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { items: usize },
    Failed,
    /// The view was gone before the response arrived.
    Discarded,
}

/// Runs the load and hands the result to `view` if it still exists.
///
/// Failures are logged here and never reach the view beyond marking the load
/// as failed; the table simply stays empty.
pub async fn load_into(loader: &Loader, view: &Weak<Mutex<TriviaView>>) -> LoadOutcome {
    let result = loader.fetch().await;

    let Some(view) = view.upgrade() else {
        tracing::debug!("view dropped before load completed, discarding result");
        return LoadOutcome::Discarded;
    };
    let mut view = view.lock().await;
    match result {
        Ok(items) => {
            let count = items.len();
            view.set_dataset(items);
            tracing::info!(items = count, "loaded trivia questions");
            LoadOutcome::Applied { items: count }
        }
        Err(e) => {
            tracing::error!(error = %e, "error fetching trivia questions");
            view.mark_failed();
            LoadOutcome::Failed
        }
    }
}

pub fn spawn_load(loader: Loader, view: Weak<Mutex<TriviaView>>) -> JoinHandle<LoadOutcome> {
    tokio::spawn(async move { load_into(&loader, &view).await })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_appends_amount_to_endpoint() {
        let loader = Loader::new(LoaderOptions::default()).unwrap();
        assert_eq!(loader.url().as_str(), "https://opentdb.com/api.php?amount=50");
    }

    #[test]
    fn loader_keeps_existing_query_pairs() {
        let loader = Loader::new(LoaderOptions {
            endpoint: "https://example.com/api.php?category=9".to_string(),
            amount: 5,
            ..LoaderOptions::default()
        })
        .unwrap();
        assert_eq!(
            loader.url().as_str(),
            "https://example.com/api.php?category=9&amount=5"
        );
    }

    #[test]
    fn loader_rejects_out_of_range_amount() {
        for amount in [0, 51] {
            let err = Loader::new(LoaderOptions {
                amount,
                ..LoaderOptions::default()
            })
            .unwrap_err();
            assert!(matches!(err, LoadFailure::InvalidAmount { .. }));
        }
    }

    #[test]
    fn loader_rejects_relative_endpoint() {
        let err = Loader::new(LoaderOptions {
            endpoint: "api.php".to_string(),
            ..LoaderOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, LoadFailure::InvalidEndpoint { .. }));
    }

    #[test]
    fn api_error_message_names_reason() {
        let err = LoadFailure::Api {
            code: 5,
            reason: api_code_reason(5),
        };
        assert_eq!(
            err.to_string(),
            "question bank returned response_code 5 (rate limited)"
        );
    }
}
