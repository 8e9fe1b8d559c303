//! Concrete notifier channels.
//!
//! - [`slack::SlackNotifier`]: bot token against the Slack Web API
//! - [`discord::DiscordNotifier`]: incoming webhook
//!
//! [`build_notifier_set`] selects the concrete or disabled variant for each
//! channel once at startup.

pub mod discord;
pub mod slack;

use std::time::Duration;

use portal_core::notify::{BoxNotifier, DisabledNotifier, NotifierSet};
use portal_types::notifier::{Channel, NotifierConfig};
use portal_types::run::RunContext;

pub use discord::DiscordNotifier;
pub use slack::SlackNotifier;

/// Upper bound for a single provider request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// A title only counts when it has visible characters.
fn visible_title(title: Option<&str>) -> Option<&str> {
    title.filter(|t| !t.trim().is_empty())
}

/// Build the Slack and Discord notifiers in that order.
pub fn build_notifier_set(
    slack: NotifierConfig,
    discord: NotifierConfig,
    run: &RunContext,
) -> NotifierSet {
    let slack = if slack.enabled {
        BoxNotifier::new(SlackNotifier::from_config(slack, run.clone()))
    } else {
        BoxNotifier::new(DisabledNotifier::new(Channel::Slack))
    };
    let discord = if discord.enabled {
        BoxNotifier::new(DiscordNotifier::from_config(discord, run.clone()))
    } else {
        BoxNotifier::new(DisabledNotifier::new(Channel::Discord))
    };
    NotifierSet::new(vec![slack, discord])
}
