use std::time::Duration;

use orca_core::{validate_uid, ConfigError, CorpusStatus};
use orca_logging::orca_trace;
use url::Url;

use crate::wire::{decode_status, CreateSearchBody};
use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ConfigError::BaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl(format!("{base_url}: not a base url")));
        }
        Ok(Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        })
    }
}

/// The remote ORCA service, as seen by the synchronization engine.
#[async_trait::async_trait]
pub trait OrcaApi: Send + Sync {
    /// `GET <base>`: current corpus and search state.
    async fn fetch_status(&self) -> Result<CorpusStatus, ApiError>;

    /// `POST <base>/search`. The response body is not consumed.
    async fn create_search(&self, search_str: &str) -> Result<(), ApiError>;

    /// `DELETE <base>/search/{uid}`. The response body is not consumed.
    async fn delete_search(&self, uid: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Transport, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.settings.base_url.clone();
        if segments.is_empty() {
            return url;
        }
        // `ApiSettings::new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait::async_trait]
impl OrcaApi for ReqwestApi {
    async fn fetch_status(&self) -> Result<CorpusStatus, ApiError> {
        let url = self.endpoint(&[]);
        orca_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        decode_status(&body)
    }

    async fn create_search(&self, search_str: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["search"]);
        orca_trace!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(&CreateSearchBody { search_str })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response)?;
        Ok(())
    }

    async fn delete_search(&self, uid: &str) -> Result<(), ApiError> {
        let uid = validate_uid(uid)?;
        let url = self.endpoint(&["search", uid]);
        orca_trace!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response)?;
        Ok(())
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());
    Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), text))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Transport, err.to_string())
}
