//! SlackNotifier -- posts portal announcements through the Slack Web API.
//!
//! Verification calls `auth.test` with the bot token; delivery calls
//! `chat.postMessage` with a single mrkdwn section block. Slack reports
//! application errors with HTTP 200 and `ok: false`, so both calls inspect
//! the body rather than only the status.
//!
//! The bot token is wrapped in [`SecretString`] and only exposed when building
//! the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use portal_core::notify::Notifier;
use portal_types::error::NotifyError;
use portal_types::notifier::{Channel, NotifierConfig};
use portal_types::run::RunContext;

use super::{http_client, visible_title};

const DEFAULT_API_BASE: &str = "https://slack.com/api";
const ICON_URL: &str =
    "https://interactiveinputs.com/static/img/interactive-inputs-no-bg-text-black.png";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    username: &'a str,
    icon_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
    blocks: Vec<Block<'a>>,
}

#[derive(Debug, Serialize)]
struct Block<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: BlockText<'a>,
}

#[derive(Debug, Serialize)]
struct BlockText<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Common shape of `auth.test` and `chat.postMessage` responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
    ts: Option<String>,
}

/// Render the announcement body. The title clause is omitted without a title.
pub fn render_message(run: &RunContext, title: Option<&str>, message: &str) -> String {
    let title_clause = visible_title(title)
        .map(|t| format!("*Title:* _`\"{t}\"`_ | "))
        .unwrap_or_default();
    format!(
        "*`User Input Required`*\n\n{title_clause}<{}|*Go to run*>\n*Initiator:* {}\n\n\n{message}\n",
        run.run_url(),
        run.actor,
    )
}

pub struct SlackNotifier {
    client: reqwest::Client,
    token: SecretString,
    channel: String,
    bot_name: String,
    thread_ts: Option<String>,
    run: RunContext,
    api_base: String,
}

impl SlackNotifier {
    pub fn from_config(config: NotifierConfig, run: RunContext) -> Self {
        Self {
            client: http_client(),
            bot_name: config.display_name_or_default().to_string(),
            token: config.credential,
            channel: config.target.unwrap_or_default(),
            thread_ts: config.thread_ref.filter(|t| !t.is_empty()),
            run,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (useful for testing or proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base.trim_end_matches('/'))
    }

    fn transport(e: reqwest::Error) -> NotifyError {
        NotifyError::Transport {
            channel: Channel::Slack,
            reason: e.to_string(),
        }
    }

    async fn decode(response: reqwest::Response) -> Result<SlackResponse, NotifyError> {
        response.json().await.map_err(|e| NotifyError::Decode {
            channel: Channel::Slack,
            reason: e.to_string(),
        })
    }
}

impl Notifier for SlackNotifier {
    fn channel(&self) -> Channel {
        Channel::Slack
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn portal_link(&self, url: &str) -> String {
        format!("<{url}|*Enter required input*>")
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        tracing::debug!("Verifying Slack token");

        let response = self
            .client
            .get(self.url("auth.test"))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!(status = status.as_u16(), "Unexpected response from Slack endpoint");
            return Err(NotifyError::UnexpectedVerificationStatusCode {
                channel: Channel::Slack,
                status: status.as_u16(),
            });
        }

        let body = Self::decode(response).await?;
        if !body.ok {
            tracing::error!(error = ?body.error, "Unable to verify the Slack token");
            return Err(NotifyError::InvalidCredentialProvided {
                channel: Channel::Slack,
            });
        }

        tracing::debug!("Slack token verified");
        Ok(())
    }

    async fn notify(&self, title: Option<&str>, message: &str) -> Result<Option<String>, NotifyError> {
        let text = render_message(&self.run, title, message);
        let request = PostMessageRequest {
            channel: &self.channel,
            username: &self.bot_name,
            icon_url: ICON_URL,
            thread_ts: self.thread_ts.as_deref(),
            blocks: vec![Block {
                kind: "section",
                text: BlockText {
                    kind: "mrkdwn",
                    text: &text,
                },
            }],
        };

        let response = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(self.token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(channel = %self.channel, status = status.as_u16(), "Unable to send message to Slack channel");
            return Err(NotifyError::FailedToSendMessage {
                channel: Channel::Slack,
                reason: format!("unexpected status code {}", status.as_u16()),
            });
        }

        let body = Self::decode(response).await?;
        if !body.ok {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            tracing::error!(channel = %self.channel, %reason, "Unable to send message to Slack channel");
            return Err(NotifyError::FailedToSendMessage {
                channel: Channel::Slack,
                reason,
            });
        }

        tracing::debug!(channel = %self.channel, ts = ?body.ts, "Message sent to Slack channel");
        Ok(body.ts)
    }
}
