//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::logic::*;
use crate::protocol::*;
use crate::state::{AppState, SessionError};

impl IntoResponse for SessionError {
  fn into_response(self) -> Response {
    let status = match &self {
      SessionError::UnknownSession(_) => StatusCode::NOT_FOUND,
      SessionError::Exercise(_) => StatusCode::BAD_REQUEST,
    };
    warn!(target: "cloze_backend", %status, error = %self, "Request failed");
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_exercise(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(exercise_out(&state.exercise))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let view = new_session(&state).await;
  info!(target: "exercise", session_id = %view.session_id, "HTTP session created");
  Json(view)
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SessionView>, SessionError> {
  Ok(Json(get_session(&state, &q.session_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, %body.word, %body.group, %body.blank))]
pub async fn http_post_drop(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DropIn>,
) -> Result<Json<DropOut>, SessionError> {
  let out = do_drop(&state, &body.session_id, &body.word, body.group, &body.blank).await?;
  info!(target: "exercise", id = %body.session_id, accepted = out.accepted, "HTTP drop handled");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, %body.group, %body.blank, value_len = body.value.len()))]
pub async fn http_post_input(
  State(state): State<Arc<AppState>>,
  Json(body): Json<InputIn>,
) -> Result<Json<SessionView>, SessionError> {
  Ok(Json(do_input(&state, &body.session_id, body.group, &body.blank, &body.value).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmitOut>, SessionError> {
  let out = do_submit(&state, &body.session_id).await?;
  info!(target: "exercise", id = %body.session_id, all_correct = out.all_correct, "HTTP submit evaluated");
  Ok(Json(out))
}
