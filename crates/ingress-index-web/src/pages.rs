//! The index page handler.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use ingress_index_core::{EndpointRecord, sort_records};
use tracing::error;

use crate::WebState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    ingresses: Vec<EndpointRecord>,
}

/// `GET /` — render every currently accumulated record.
///
/// Reads the latest published snapshot without blocking dispatch, and
/// sorts a copy for display stability; the shared snapshot is never
/// mutated. A template failure yields a fixed 500 body and the process
/// keeps serving.
pub async fn index(State(state): State<WebState>) -> Response {
    let mut ingresses = state.published.borrow().clone();
    sort_records(&mut ingresses);

    match (IndexTemplate { ingresses }).render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error").into_response()
        }
    }
}
