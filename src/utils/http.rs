//! Non-streaming HTTP helpers
//!
//! All vendor calls share the same failure policy: a non-success status is
//! surfaced immediately with status code and body text, and is never
//! retried by this layer.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::HttpConfig;

/// Build a `reqwest::Client` honoring the shared HTTP configuration.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, ProviderError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

/// Convert a string header map into reqwest headers.
pub fn header_map(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap, ProviderError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ProviderError::ConfigurationError(format!("Invalid header name: {e}")))?;
        let value = reqwest::header::HeaderValue::from_str(value)
            .map_err(|e| ProviderError::ConfigurationError(format!("Invalid header value: {e}")))?;
        out.insert(name, value);
    }
    Ok(out)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::api_error(status.as_u16(), body))
}

/// POST a JSON body and parse the JSON response.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &Value,
) -> Result<Value, ProviderError> {
    tracing::debug!(url, "sending json request");
    let response = client.post(url).headers(headers).json(body).send().await?;
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ProviderError::ParseError(format!("Invalid JSON response from {url}: {e}")))
}

/// POST a multipart form and parse the JSON response.
pub async fn post_multipart(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    form: reqwest::multipart::Form,
) -> Result<Value, ProviderError> {
    tracing::debug!(url, "sending multipart request");
    let response = client
        .post(url)
        .headers(headers)
        .multipart(form)
        .send()
        .await?;
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ProviderError::ParseError(format!("Invalid JSON response from {url}: {e}")))
}

/// GET and parse the JSON response.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<Value, ProviderError> {
    tracing::debug!(url, "sending get request");
    let response = client.get(url).headers(headers).send().await?;
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ProviderError::ParseError(format!("Invalid JSON response from {url}: {e}")))
}

/// POST a JSON body and return the raw response bytes (audio endpoints).
pub async fn post_for_bytes(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &Value,
) -> Result<Vec<u8>, ProviderError> {
    tracing::debug!(url, "sending binary request");
    let response = client.post(url).headers(headers).json(body).send().await?;
    let response = check_status(response).await?;
    Ok(response.bytes().await?.to_vec())
}

/// GET raw bytes (asset downloads).
pub async fn download_bytes(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<Vec<u8>, ProviderError> {
    tracing::debug!(url, "downloading asset");
    let response = client.get(url).headers(headers).send().await?;
    let response = check_status(response).await?;
    Ok(response.bytes().await?.to_vec())
}
