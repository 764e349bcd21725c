//! HTTP client library for making API requests.
//!
//! This library provides a simplified wrapper around reqwest for making
//! HTTP requests with JSON serialization/deserialization support.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cov_requests::ApiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("https://api.example.com")?.with_basic_auth("admin", "secret");
//! let query = serde_json::json!({ "name": "demo" });
//! let data: serde_json::Value = client.post_json("api/v1/search", &query).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;

use std::str::FromStr;

use reqwest::{Response, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

pub use error::Error;

/// Result type for HTTP client operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Basic authentication credentials.
#[derive(Debug, Clone)]
struct Credentials {
    user: String,
    password: String,
}

/// HTTP client for making API requests with JSON support.
#[derive(Debug, Clone)]
pub struct ApiClient {
    url: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a new API client with the given base URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cov_requests::ApiClient;
    ///
    /// let client = ApiClient::new("https://api.example.com").unwrap();
    /// assert_eq!(client.url(), "https://api.example.com");
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;
        let url: String = url.into();
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            credentials: None,
            client,
        })
    }

    /// Authenticates every request with HTTP basic authentication.
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// The base URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Constructs the full URL for an endpoint.
    fn path(&self, endpoint: &str) -> Result<Url> {
        let path = format!("{}/{}", self.url, endpoint.trim_start_matches('/'));
        Url::from_str(&path).map_err(|err| Error::InvalidUrl {
            url: path,
            reason: err.to_string(),
        })
    }

    fn authenticate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.user, Some(&credentials.password)),
            None => request,
        }
    }

    /// Reads the response body, failing on a non-success status.
    async fn body(response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        trace!("Response {status}: {body}");
        if !status.is_success() {
            return Err(Error::Status { status, body });
        }
        Ok(body)
    }

    /// Makes a POST request with a JSON body and deserializes the response.
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.path(endpoint)?;
        let payload = serde_json::to_string(body)?;
        let response = self
            .authenticate(self.client.post(url))
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        Ok(serde_json::from_str(&Self::body(response).await?)?)
    }
}
