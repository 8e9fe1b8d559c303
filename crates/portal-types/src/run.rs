use serde::{Deserialize, Serialize};

/// Identity of the workflow run hosting the portal.
///
/// Used to link notifications and response pages back to the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// User who started the run.
    pub actor: String,
    /// Base URL of the hosting server, e.g. `https://github.com`.
    pub server_url: String,
    /// `owner/name` of the repository.
    pub repository: String,
    pub run_id: String,
}

impl RunContext {
    /// `{server_url}/{repository}/actions/runs/{run_id}`
    pub fn run_url(&self) -> String {
        format!(
            "{}/{}/actions/runs/{}",
            self.server_url.trim_end_matches('/'),
            self.repository,
            self.run_id
        )
    }

    /// Owner half of `repository`, shown as the portal's display context.
    pub fn repository_owner(&self) -> &str {
        self.repository
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(&self.repository)
    }
}
