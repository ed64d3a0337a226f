use std::fmt::Debug;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;
use url::Url;

use crate::config::ScraperConfig;

/// How a page should be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchMode {
    /// Plain HTTP GET of the server response.
    Static,
    /// DOM after client-side scripts have run.
    #[default]
    Rendered,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("http client unavailable: {0}")]
    Client(String),
}

/// Source of page HTML. Implementations block the calling thread.
pub trait PageFetcher: Debug + Send + Sync {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP, routing rendered requests through a render proxy
/// when one is configured.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    user_agent: String,
    render_proxy: Option<Url>,
}

impl HttpPageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Client(err.to_string()))?;

        let render_proxy = config
            .render_proxy
            .as_deref()
            .map(|proxy| {
                Url::parse(proxy).map_err(|source| FetchError::InvalidUrl {
                    url: proxy.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            render_proxy,
        })
    }

    fn request_url(&self, target: &Url, mode: FetchMode) -> Url {
        match (mode, &self.render_proxy) {
            (FetchMode::Rendered, Some(proxy)) => {
                let mut proxied = proxy.clone();
                proxied
                    .query_pairs_mut()
                    .append_pair("url", target.as_str());
                proxied
            }
            (FetchMode::Rendered, None) => {
                debug!(url = %target, "no render proxy configured; fetching static html");
                target.clone()
            }
            (FetchMode::Static, _) => target.clone(),
        }
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, FetchError> {
        let target = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let request_url = self.request_url(&target, mode);

        let response = self
            .client
            .get(request_url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
