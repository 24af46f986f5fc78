//! HTTP plumbing: configuration, headers, URL building and status mapping.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use standards::GithubError;
use tracing::debug;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const DEFAULT_USER_AGENT: &str = "github-standards";

/// Connection settings for [`GithubClient`].
#[derive(Clone)]
pub struct GithubClientConfig {
    /// API root, e.g. `https://api.github.com` or `https://ghe.example.com/api/v3`.
    pub api_base: String,
    /// Personal access or installation token.
    pub token: String,
    pub user_agent: String,
}

impl GithubClientConfig {
    /// Configuration for the public API with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Points the client at another API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl std::fmt::Debug for GithubClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Authenticated GitHub REST client.
#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
}

impl GithubClient {
    /// Builds a client. Fails if the base URL does not parse or the token
    /// cannot be used as a header value.
    pub fn new(config: GithubClientConfig) -> Result<Self, GithubError> {
        let api_base = Url::parse(&config.api_base).map_err(|e| GithubError::InvalidRequest {
            message: format!("invalid API base URL '{}': {e}", config.api_base),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|e| {
            GithubError::InvalidRequest {
                message: format!("token is not a valid header value: {e}"),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                GithubError::InvalidRequest {
                    message: format!("user agent is not a valid header value: {e}"),
                }
            })?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GithubError::InvalidRequest {
                message: format!("could not build HTTP client: {e}"),
            })?;

        Ok(Self { http, api_base })
    }

    /// Joins `segments` onto the API base, percent-encoding each one.
    ///
    /// Branch names may contain `/`; as a single segment it is encoded as `%2F`.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, GithubError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidRequest {
                message: format!("API base URL '{}' cannot take a path", self.api_base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` returning a decoded JSON body.
    pub(crate) async fn get_json<T>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, GithubError>
    where
        T: DeserializeOwned,
    {
        let resource = url.path().to_string();
        debug!(%resource, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport(&resource, e))?;
        let response = check_status(response, &resource).await?;
        response.json::<T>().await.map_err(|e| GithubError::Decode {
            resource,
            message: e.to_string(),
        })
    }

    /// Sends `body` as JSON with `method`; the response body is ignored.
    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), GithubError>
    where
        B: Serialize + ?Sized,
    {
        let resource = url.path().to_string();
        debug!(%resource, %method, "write");
        let response = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(&resource, e))?;
        check_status(response, &resource).await?;
        Ok(())
    }

    /// Sends a request with no body; the response body is ignored.
    pub(crate) async fn send_empty(&self, method: Method, url: Url) -> Result<(), GithubError> {
        let resource = url.path().to_string();
        debug!(%resource, %method, "write");
        let response = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| transport(&resource, e))?;
        check_status(response, &resource).await?;
        Ok(())
    }
}

fn transport(resource: &str, e: reqwest::Error) -> GithubError {
    GithubError::Transport {
        resource: resource.to_string(),
        message: e.to_string(),
    }
}

/// Maps 404 to [`GithubError::NotFound`] and every other non-success status
/// to [`GithubError::Api`], using the `message` field of the body when present.
async fn check_status(response: Response, resource: &str) -> Result<Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(GithubError::NotFound {
            resource: resource.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(GithubError::Api {
        status: status.as_u16(),
        resource: resource.to_string(),
        message,
    })
}
