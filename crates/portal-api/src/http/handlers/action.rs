//! Terminal actions: submit and cancel.
//!
//! The first accepted action schedules the session's end after a grace
//! period so the response page can reach the browser. Any later submit or
//! cancel is rejected with 409.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use portal_types::session::SessionResult;

use crate::http::error::AppError;
use crate::state::PortalState;

/// Headers the form page listens for to swap in the response.
const HTMX_HEADERS: [(&str, &str); 2] = [
    ("HX-Trigger", "template-executed"),
    ("HX-Trigger-After-Swap", "template-swapped"),
];

/// Group repeated keys, keeping first-seen key order and value order.
fn group_values(pairs: Vec<(String, String)>) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (key, value) in pairs {
        match index.get(&key) {
            Some(&i) => grouped[i].1.push(value),
            None => {
                index.insert(key.clone(), grouped.len());
                grouped.push((key, vec![value]));
            }
        }
    }
    grouped
}

/// POST /submit - report every value and end the session as submitted.
pub async fn submit(
    State(state): State<PortalState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let control = &state.context.control;
    if !control.begin_closing() {
        tracing::warn!("Submit received after the portal was closed");
        return Err(AppError::SessionClosing);
    }

    for (key, values) in group_values(pairs) {
        let resolved = if let Some(dir) = state.context.cache.dir_for(&key) {
            dir.display().to_string()
        } else if state.context.schema.get(&key).is_some() {
            values.join(",")
        } else {
            tracing::warn!(key = %key, "Ignoring value for undeclared field");
            continue;
        };

        tracing::info!(key = %key, value = %resolved, "Input received");

        if let Err(e) = state.output.set_output(&key, &resolved) {
            tracing::error!(key = %key, error = %e, "Unable to report input value");
            control.finish(SessionResult::server_error(format!(
                "unable to report value for '{key}': {e}"
            )));
            return Err(AppError::Internal(format!("Unable to report value for '{key}'")));
        }
    }

    tracing::info!("Your inputs have successfully been received!");
    control.schedule_finish(SessionResult::submitted(), state.termination.submit_grace);

    Ok((HTMX_HEADERS, Html(state.renderer.render_submitted(&state.run_url))).into_response())
}

/// POST /cancel - end the session as cancelled.
pub async fn cancel(State(state): State<PortalState>) -> Result<Response, AppError> {
    let control = &state.context.control;
    if !control.begin_closing() {
        tracing::warn!("Cancel received after the portal was closed");
        return Err(AppError::SessionClosing);
    }

    tracing::info!("Portal cancelled by the user");
    control.schedule_finish(SessionResult::cancelled(), state.termination.cancel_grace);

    Ok((HTMX_HEADERS, Html(state.renderer.render_cancelled(&state.run_url))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_values_keeps_order() {
        let grouped = group_values(vec![
            ("b".to_string(), "1".to_string()),
            ("a".to_string(), "x".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(
            grouped,
            vec![
                ("b".to_string(), vec!["1".to_string(), "2".to_string()]),
                ("a".to_string(), vec!["x".to_string()]),
            ]
        );
    }
}
