use portal_types::error::NotifyError;
use portal_types::notifier::Channel;

use super::Notifier;

/// Stand-in for a channel that is switched off. Every call succeeds at once.
#[derive(Debug, Clone, Copy)]
pub struct DisabledNotifier {
    channel: Channel,
}

impl DisabledNotifier {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

impl Notifier for DisabledNotifier {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn portal_link(&self, url: &str) -> String {
        url.to_string()
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn notify(&self, _title: Option<&str>, _message: &str) -> Result<Option<String>, NotifyError> {
        Ok(None)
    }
}
