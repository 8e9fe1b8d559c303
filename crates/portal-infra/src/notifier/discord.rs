//! DiscordNotifier -- posts portal announcements to a Discord webhook.
//!
//! The webhook URL is the credential. A GET on it doubles as the probe:
//! Discord answers 200 with the webhook object for a live URL and 401 with an
//! error `message` for a revoked one.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use portal_core::notify::Notifier;
use portal_types::error::NotifyError;
use portal_types::notifier::{Channel, NotifierConfig};
use portal_types::run::RunContext;

use super::{http_client, visible_title};

const AVATAR_URL: &str =
    "https://interactiveinputs.com/static/img/interactive-inputs-bg-black-text-white.png";

#[derive(Debug, Serialize)]
struct ExecuteWebhookRequest<'a> {
    username: &'a str,
    avatar_url: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WebhookProbeResponse {
    message: String,
}

/// Render the announcement body. Without a title the sentence simply ends.
pub fn render_message(run: &RunContext, title: Option<&str>, message: &str) -> String {
    let title_clause = visible_title(title)
        .map(|t| format!(" - *`\"{t}\"`*."))
        .unwrap_or_else(|| ".".to_string());
    format!(
        "**`User Input Required`**\n\nGithub user {} has kicked off a workflow that requires runtime input(s){title_clause} *You can find out more by visiting the job at {}*.\n\n{message}\n\n\n> *Powered by **[Interactive Inputs](https://interactiveinputs.com/)***",
        run.actor,
        run.run_url(),
    )
}

pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook: SecretString,
    username: String,
    thread_id: Option<String>,
    run: RunContext,
}

impl DiscordNotifier {
    pub fn from_config(config: NotifierConfig, run: RunContext) -> Self {
        Self {
            client: http_client(),
            username: config.display_name_or_default().to_string(),
            webhook: config.credential,
            thread_id: config.thread_ref.filter(|t| !t.is_empty()),
            run,
        }
    }

    fn transport(e: reqwest::Error) -> NotifyError {
        NotifyError::Transport {
            channel: Channel::Discord,
            reason: e.to_string(),
        }
    }
}

impl Notifier for DiscordNotifier {
    fn channel(&self) -> Channel {
        Channel::Discord
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn portal_link(&self, url: &str) -> String {
        format!("[**Enter required input**]({url})")
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        tracing::debug!("Verifying Discord webhook");

        let response = self
            .client
            .get(self.webhook.expose_secret())
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::UNAUTHORIZED {
            tracing::error!(status = status.as_u16(), "Unexpected response from Discord endpoint");
            return Err(NotifyError::UnexpectedVerificationStatusCode {
                channel: Channel::Discord,
                status: status.as_u16(),
            });
        }

        let body: WebhookProbeResponse = response.json().await.map_err(|e| NotifyError::Decode {
            channel: Channel::Discord,
            reason: e.to_string(),
        })?;
        if !body.message.is_empty() {
            tracing::error!(error = %body.message, "Unable to verify the Discord webhook");
            return Err(NotifyError::InvalidCredentialProvided {
                channel: Channel::Discord,
            });
        }

        tracing::debug!("Discord webhook verified");
        Ok(())
    }

    async fn notify(&self, title: Option<&str>, message: &str) -> Result<Option<String>, NotifyError> {
        let content = render_message(&self.run, title, message);
        let request = ExecuteWebhookRequest {
            username: &self.username,
            avatar_url: AVATAR_URL,
            content: &content,
        };

        let mut call = self.client.post(self.webhook.expose_secret()).json(&request);
        if let Some(thread_id) = &self.thread_id {
            call = call.query(&[("thread_id", thread_id)]);
        }
        let response = call.send().await.map_err(Self::transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::NO_CONTENT {
            tracing::error!(status = status.as_u16(), "Unable to send message to Discord webhook");
            return Err(NotifyError::FailedToSendMessage {
                channel: Channel::Discord,
                reason: format!("unexpected status code {}", status.as_u16()),
            });
        }

        tracing::debug!("Message sent to Discord webhook");
        Ok(None)
    }
}
