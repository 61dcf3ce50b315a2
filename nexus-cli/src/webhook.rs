//! Outbound webhook client
//!
//! Forwards a username/message pair as a JSON POST. External
//! collaborator only: nothing in the key lifecycle depends on whether
//! the POST succeeds.

use anyhow::Result;
use serde::Serialize;

/// Wire body of the webhook POST
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub content: String,
}

/// POST `{username, content}` to the endpoint
pub async fn send(url: &str, username: &str, message: &str) -> Result<()> {
    let payload = WebhookPayload {
        username: username.to_string(),
        content: message.to_string(),
    };

    let response = reqwest::Client::new().post(url).json(&payload).send().await?;

    if response.status().is_success() {
        tracing::info!(%url, "webhook delivered");
        println!("Message sent.");
        Ok(())
    } else {
        anyhow::bail!("webhook returned {}", response.status())
    }
}
