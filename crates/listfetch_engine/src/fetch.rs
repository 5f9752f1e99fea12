use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use futures_util::StreamExt;
use listfetch_core::{FetchQuery, ResultPage};
use listfetch_logging::{listfetch_debug, listfetch_warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::decode::{decode_results, error_message};
use crate::{FailureKind, FetchError};

/// The one capability the controller consumes: fetch a page of entities
/// matching an optional filter. Dropping the returned future cancels it.
#[async_trait::async_trait]
pub trait PageFetcher<T, F>: Send + Sync {
    async fn fetch_page(&self, query: FetchQuery<F>) -> Result<ResultPage<T>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Where pages live and how a [`FetchQuery`] maps onto query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEndpoint {
    pub base_url: String,
    pub page_param: String,
    pub filter_param: String,
    /// Top-level JSON field holding the entities; `None` for a bare array.
    pub results_field: Option<String>,
    /// Treat 404 as an empty page. The character API answers both "no
    /// matches for this filter" and "past the last page" that way.
    pub empty_on_not_found: bool,
}

impl Default for PageEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://rickandmortyapi.com/api/character".to_string(),
            page_param: "page".to_string(),
            filter_param: "status".to_string(),
            results_field: Some("results".to_string()),
            empty_on_not_found: true,
        }
    }
}

/// HTTP/JSON implementation of [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct ReqwestPageFetcher<T> {
    endpoint: PageEndpoint,
    settings: FetchSettings,
    client: reqwest::Client,
    _entity: PhantomData<fn() -> T>,
}

impl<T> ReqwestPageFetcher<T> {
    pub fn new(endpoint: PageEndpoint, settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            endpoint,
            settings,
            client,
            _entity: PhantomData,
        })
    }

    pub fn endpoint(&self) -> &PageEndpoint {
        &self.endpoint
    }

    /// Builds `{base_url}?{page_param}=N[&{filter_param}=filter]`.
    pub fn page_url<F: fmt::Display>(&self, query: &FetchQuery<F>) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint.base_url)
            .map_err(|err| FetchError::new(FailureKind::MalformedRequest, err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::MalformedRequest,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(&self.endpoint.page_param, &query.page.to_string());
            if let Some(filter) = &query.filter {
                pairs.append_pair(&self.endpoint.filter_param, &filter.to_string());
            }
        }
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl<T, F> PageFetcher<T, F> for ReqwestPageFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
    F: fmt::Display + Send + 'static,
{
    async fn fetch_page(&self, query: FetchQuery<F>) -> Result<ResultPage<T>, FetchError> {
        let url = self.page_url(&query)?;
        listfetch_debug!("GET page={} url={}", query.page, url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = self.read_body(response).await?;

        if status.is_success() {
            return decode_results(&body, self.endpoint.results_field.as_deref());
        }
        if status == StatusCode::NOT_FOUND && self.endpoint.empty_on_not_found {
            listfetch_debug!("No results at {}", url);
            return Ok(Vec::new());
        }

        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        listfetch_warn!("Page fetch failed status={} url={} message={}", status, url, message);
        let kind = if status.is_client_error() {
            FailureKind::Client {
                status: status.as_u16(),
            }
        } else if status.is_server_error() {
            FailureKind::Server {
                status: status.as_u16(),
            }
        } else {
            FailureKind::Network
        };
        Err(FetchError::new(kind, message))
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::MalformedRequest, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
