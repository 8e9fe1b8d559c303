//! Run context from the workflow environment.

use portal_types::run::RunContext;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Read `GITHUB_ACTOR`, `GITHUB_SERVER_URL`, `GITHUB_REPOSITORY` and
/// `GITHUB_RUN_ID`. Missing values become empty strings.
pub fn run_context_from_env() -> RunContext {
    run_context_from(|key| std::env::var(key).ok())
}

/// Same as [`run_context_from_env`] over an arbitrary lookup.
pub fn run_context_from(lookup: impl Fn(&str) -> Option<String>) -> RunContext {
    let get = |key: &str| lookup(key).unwrap_or_default();
    let server_url = lookup("GITHUB_SERVER_URL")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    RunContext {
        actor: get("GITHUB_ACTOR"),
        server_url,
        repository: get("GITHUB_REPOSITORY"),
        run_id: get("GITHUB_RUN_ID"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_reads_variables() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_ACTOR", "octocat"),
            ("GITHUB_SERVER_URL", "https://ghe.example.com"),
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_RUN_ID", "1234"),
        ]);
        let ctx = run_context_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(ctx.actor, "octocat");
        assert_eq!(ctx.run_url(), "https://ghe.example.com/acme/widgets/actions/runs/1234");
    }

    #[test]
    fn test_defaults_server_url() {
        let ctx = run_context_from(|_| None);
        assert_eq!(ctx.server_url, "https://github.com");
        assert!(ctx.actor.is_empty());
    }
}
