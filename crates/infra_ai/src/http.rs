//! Shared HTTP plumbing for outbound adapters
//!
//! One POST-JSON helper with retry, and the mapping of HTTP outcomes onto
//! `PortError`.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use core_kernel::{AdapterConfig, PortError};

/// Retry-After used when a 429 response carries none
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Builds a client with the adapter's request timeout
pub fn build_client(config: &AdapterConfig) -> Result<reqwest::Client, PortError> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| PortError::Internal {
            message: format!("{}: failed to build HTTP client", config.adapter_id),
            source: Some(Box::new(e)),
        })
}

/// Joins a base URL and a path without doubling slashes
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps a non-success status onto a port error
pub fn map_status(status: StatusCode, headers: &HeaderMap, service: &str) -> PortError {
    match status.as_u16() {
        401 | 403 => PortError::Unauthorized {
            message: format!("{service} rejected the request ({status})"),
        },
        404 => PortError::not_found("endpoint", service),
        429 => PortError::RateLimited {
            retry_after_secs: headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        500..=599 => PortError::ServiceUnavailable {
            service: service.to_string(),
        },
        _ => PortError::internal(format!("{service} returned unexpected status {status}")),
    }
}

/// Maps a transport failure onto a port error
pub fn map_transport(error: reqwest::Error, operation: &str, timeout: Duration) -> PortError {
    if error.is_timeout() {
        PortError::timeout(operation, timeout)
    } else if error.is_connect() {
        PortError::Connection {
            message: format!("{operation}: connection failed"),
            source: Some(Box::new(error)),
        }
    } else if error.is_decode() {
        PortError::transformation(format!("{operation}: undecodable response: {error}"))
    } else {
        PortError::Internal {
            message: format!("{operation}: request failed"),
            source: Some(Box::new(error)),
        }
    }
}

/// POSTs a JSON body and decodes a JSON reply, retrying transient failures
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - Full endpoint URL
/// * `bearer` - Optional bearer token
/// * `body` - Request body
/// * `config` - Timeout and retry settings; `adapter_id` names the service in errors
/// * `operation` - Operation name for logs and timeout errors
pub async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    config: &AdapterConfig,
    operation: &str,
) -> Result<R, PortError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut attempt = 0;
    loop {
        match send_once(client, url, bearer, body, config, operation).await {
            Ok(reply) => return Ok(reply),
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                attempt += 1;
                let delay = config.backoff(attempt);
                warn!(
                    adapter = %config.adapter_id,
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn send_once<B, R>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    config: &AdapterConfig,
    operation: &str,
) -> Result<R, PortError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| map_transport(e, operation, config.timeout()))?;

    let status = response.status();
    debug!(adapter = %config.adapter_id, operation, %status, "Response received");
    if !status.is_success() {
        return Err(map_status(status, response.headers(), &config.adapter_id));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| map_transport(e, operation, config.timeout()))
}
