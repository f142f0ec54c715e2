use std::time::Duration;

use reqwest::Client;

use super::error::RobotError;
use super::types::{CommandReceipt, RobotCommand, RobotControl};

const DEFAULT_ADDR: &str = "http://localhost:31950";

/// HTTP driver for the robot-control endpoint.
///
/// Each command is POSTed to `/commands` and the call returns once the
/// robot has executed it, so a delay command keeps the request open for
/// the full incubation. The overall timeout is sized for the longest
/// incubation in the protocol, not for a quick API round trip.
pub struct HttpRobotClient {
    client: Client,
    base_url: String,
}

impl HttpRobotClient {
    pub fn new(addr: Option<String>) -> Self {
        Self::with_base_url(addr.unwrap_or_else(|| DEFAULT_ADDR.to_string()))
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30 * 60))
            .build()
            .expect("failed to build HTTP client");
        Self { client, base_url }
    }
}

impl RobotControl for HttpRobotClient {
    async fn execute(&self, command: &RobotCommand) -> Result<CommandReceipt, RobotError> {
        let response = self
            .client
            .post(format!("{}/commands", self.base_url))
            .header("content-type", "application/json")
            .json(command)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::CONFLICT {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(RobotError::Busy {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RobotError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<CommandReceipt>()
            .await
            .map_err(|e| RobotError::ParseError(e.to_string()))?;
        Ok(body)
    }
}
