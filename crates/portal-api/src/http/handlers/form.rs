//! GET / - the input form.

use axum::extract::State;
use axum::response::Html;

use crate::render::FormView;
use crate::state::PortalState;

pub async fn show_form(State(state): State<PortalState>) -> Html<String> {
    let view = FormView {
        schema: &state.context.schema,
        title: state.title.as_deref(),
        timeout: &state.timeout_display,
        display_context: &state.display_context,
    };
    Html(state.renderer.render_form(&view))
}
