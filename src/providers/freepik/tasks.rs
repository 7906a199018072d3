//! Freepik long-running task plumbing
//!
//! Every Freepik generation endpoint follows the same shape: POST creates
//! a task (`{"data": {"task_id", "status"}}`), GET on the same path plus
//! the task id reports status, and a terminal `COMPLETED` task carries a
//! `generated` array of asset URLs. Only the first generated asset is
//! kept.

use serde_json::Value;
use std::time::Duration;

use super::config::FreepikConfig;
use crate::error::ProviderError;
use crate::polling::{poll_until_terminal, PollConfig};
use crate::utils::cancel::CancelHandle;

pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub(crate) const POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Status of a Freepik task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreepikTaskStatus {
    /// Accepted, queued
    Created,
    /// Generation running
    InProgress,
    /// Finished successfully
    Completed,
    /// Finished with a failure
    Failed,
}

impl FreepikTaskStatus {
    fn parse(status: &str) -> Self {
        match status {
            "COMPLETED" => Self::Completed,
            "FAILED" | "CANCELLED" => Self::Failed,
            "IN_PROGRESS" => Self::InProgress,
            _ => Self::Created,
        }
    }

    /// Terminal means polling should stop, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One parsed Freepik task snapshot.
#[derive(Debug, Clone)]
pub struct FreepikTask {
    /// Vendor task id
    pub task_id: String,
    /// Current status
    pub status: FreepikTaskStatus,
    /// First generated asset URL, when terminal and successful
    pub generated_url: Option<String>,
}

/// Parse a create/status response body.
///
/// A response without a task identifier is rejected here, before any poll
/// attempt is made.
pub fn parse_task(body: &Value) -> Result<FreepikTask, ProviderError> {
    let data = body.get("data").unwrap_or(body);

    let task_id = data
        .get("task_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ProviderError::ParseError(
                "Freepik task response is missing the task identifier".to_string(),
            )
        })?
        .to_string();

    let status = data
        .get("status")
        .and_then(|v| v.as_str())
        .map(FreepikTaskStatus::parse)
        .unwrap_or(FreepikTaskStatus::Created);

    // Keep only the first generated asset.
    let generated_url = data
        .get("generated")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(FreepikTask {
        task_id,
        status,
        generated_url,
    })
}

/// Run one complete create-then-poll workflow against `endpoint`.
///
/// `endpoint` is the path under the base URL (e.g. "v1/ai/mystic"); the
/// status URL is `endpoint` plus the task id. Returns the terminal task;
/// a vendor-reported failure becomes an `ApiError`.
pub async fn run_task(
    config: &FreepikConfig,
    http_client: &reqwest::Client,
    endpoint: &str,
    body: &Value,
    cancel: &CancelHandle,
) -> Result<FreepikTask, ProviderError> {
    let create_url = config.url(endpoint);
    let created =
        crate::utils::http::post_json(http_client, &create_url, config.headers()?, body).await?;
    let task = parse_task(&created)?;
    tracing::debug!(task_id = %task.task_id, endpoint, "created generation task");

    if task.status.is_terminal() {
        return finish(task);
    }

    let status_url = config.url(&format!("{endpoint}/{}", task.task_id));
    let poll_config = PollConfig::new(POLL_INTERVAL).with_timeout(POLL_TIMEOUT);
    let client = http_client.clone();
    let headers_config = config.clone();

    let terminal = poll_until_terminal(
        move || {
            let client = client.clone();
            let url = status_url.clone();
            let config = headers_config.clone();
            async move {
                let body = crate::utils::http::get_json(&client, &url, config.headers()?).await?;
                parse_task(&body)
            }
        },
        |task: &FreepikTask| task.status.is_terminal(),
        &poll_config,
        cancel,
    )
    .await?;

    finish(terminal)
}

fn finish(task: FreepikTask) -> Result<FreepikTask, ProviderError> {
    if task.status == FreepikTaskStatus::Failed {
        return Err(ProviderError::api_error(
            422,
            format!("Freepik task {} failed", task.task_id),
        ));
    }
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_response_without_task_id_is_rejected() {
        let err = parse_task(&json!({"data": {"status": "CREATED"}})).unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
    }

    #[test]
    fn only_first_generated_asset_is_kept() {
        let task = parse_task(&json!({
            "data": {
                "task_id": "t1",
                "status": "COMPLETED",
                "generated": ["https://cdn/one.png", "https://cdn/two.png"]
            }
        }))
        .expect("task");
        assert_eq!(task.generated_url.as_deref(), Some("https://cdn/one.png"));
    }

    #[test]
    fn unknown_status_is_treated_as_created() {
        let task = parse_task(&json!({"data": {"task_id": "t1", "status": "WARMING_UP"}}))
            .expect("task");
        assert_eq!(task.status, FreepikTaskStatus::Created);
        assert!(!task.status.is_terminal());
    }
}
