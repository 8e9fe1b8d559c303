//! CLI argument definitions for the `interactive-inputs` binary.
//!
//! Every flag falls back to an environment variable so the binary can be
//! driven entirely by workflow inputs (`INPUT_<NAME>`).

use std::path::PathBuf;

use clap::Parser;
use clap::builder::BoolishValueParser;

/// Default request body limit for uploads (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Collect runtime inputs for a workflow run through a short-lived web form.
#[derive(Debug, Parser)]
#[command(name = "interactive-inputs", version, about, long_about = None)]
pub struct Cli {
    /// Header shown on the form and in notifications.
    #[arg(long, env = "INPUT_TITLE")]
    pub title: Option<String>,

    /// Field list as YAML with a top-level `fields` sequence.
    #[arg(long, env = "INPUT_INTERACTIVE")]
    pub interactive: Option<String>,

    /// Seconds before the session expires.
    #[arg(long, env = "INPUT_TIMEOUT", default_value_t = 300)]
    pub timeout: u64,

    /// Announce the portal in Slack.
    #[arg(
        long = "notifier-slack-enabled",
        env = "INPUT_NOTIFIER-SLACK-ENABLED",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub slack_enabled: bool,

    /// Slack bot token.
    #[arg(long = "notifier-slack-token", env = "INPUT_NOTIFIER-SLACK-TOKEN", hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Slack channel to post in.
    #[arg(long = "notifier-slack-channel", env = "INPUT_NOTIFIER-SLACK-CHANNEL")]
    pub slack_channel: Option<String>,

    /// Display name of the Slack bot.
    #[arg(long = "notifier-slack-bot", env = "INPUT_NOTIFIER-SLACK-BOT")]
    pub slack_bot: Option<String>,

    /// Post into an existing Slack thread.
    #[arg(long = "notifier-slack-thread-ts", env = "INPUT_NOTIFIER-SLACK-THREAD-TS")]
    pub slack_thread_ts: Option<String>,

    /// Announce the portal in Discord.
    #[arg(
        long = "notifier-discord-enabled",
        env = "INPUT_NOTIFIER-DISCORD-ENABLED",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub discord_enabled: bool,

    /// Discord webhook URL.
    #[arg(long = "notifier-discord-webhook", env = "INPUT_NOTIFIER-DISCORD-WEBHOOK", hide_env_values = true)]
    pub discord_webhook: Option<String>,

    /// Username shown for Discord messages.
    #[arg(long = "notifier-discord-username", env = "INPUT_NOTIFIER-DISCORD-USERNAME")]
    pub discord_username: Option<String>,

    /// Post into an existing Discord thread.
    #[arg(long = "notifier-discord-thread-id", env = "INPUT_NOTIFIER-DISCORD-THREAD-ID")]
    pub discord_thread_id: Option<String>,

    /// Tunnel agent credential. Required unless running locally.
    #[arg(long = "ngrok-authtoken", env = "INPUT_NGROK-AUTHTOKEN", hide_env_values = true)]
    pub ngrok_authtoken: Option<String>,

    /// Public URL the tunnel exposes. Required unless running locally.
    #[arg(long, env = "PORTAL_TUNNEL_URL")]
    pub tunnel_url: Option<String>,

    /// Working directory; upload caches are created inside it.
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Run on localhost without a tunnel. Any non-empty value enables it.
    #[arg(long, env = "IAIP_LOCAL_RUN", num_args = 0..=1, default_missing_value = "true")]
    pub local: Option<String>,

    /// Port to bind.
    #[arg(long, env = "PORTAL_PORT", default_value_t = portal_infra::tunnel::DEFAULT_PORT)]
    pub port: u16,

    /// Directory served under `/static/`.
    #[arg(long, env = "PORTAL_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Keep upload caches whatever the outcome.
    #[arg(
        long,
        env = "PORTAL_KEEP_CACHE",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub keep_cache: bool,

    /// Request body limit for uploads, in bytes.
    #[arg(long, env = "PORTAL_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long)]
    pub otel: bool,
}

impl Cli {
    pub fn is_local(&self) -> bool {
        self.local.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}
