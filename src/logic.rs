//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each function runs one learner event against the session store and turns
//! the outcome into the DTO the client re-renders from.

use tracing::instrument;

use crate::domain::BlankGroup;
use crate::protocol::{submit_out, to_view, DropOut, SessionView, SubmitOut};
use crate::state::{AppState, SessionError};

#[instrument(level = "info", skip(state))]
pub async fn new_session(state: &AppState) -> SessionView {
  let (id, st) = state.create_session().await;
  to_view(&state.exercise, &state.policies, &id, &st)
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn get_session(state: &AppState, session_id: &str) -> Result<SessionView, SessionError> {
  let st = state.session(session_id).await?;
  Ok(to_view(&state.exercise, &state.policies, session_id, &st))
}

#[instrument(level = "info", skip(state), fields(%session_id, %word, %group, %blank))]
pub async fn do_drop(
  state: &AppState,
  session_id: &str,
  word: &str,
  group: BlankGroup,
  blank: &str,
) -> Result<DropOut, SessionError> {
  let res = state.drop_word(session_id, word, group, blank).await?;
  Ok(DropOut {
    accepted: res.accepted,
    displaced: res.displaced.map(|w| state.exercise.word(w).word.clone()),
    view: to_view(&state.exercise, &state.policies, session_id, &res.state),
  })
}

#[instrument(level = "info", skip(state, value), fields(%session_id, %group, %blank, value_len = value.len()))]
pub async fn do_input(
  state: &AppState,
  session_id: &str,
  group: BlankGroup,
  blank: &str,
  value: &str,
) -> Result<SessionView, SessionError> {
  let st = state.set_input(session_id, group, blank, value).await?;
  Ok(to_view(&state.exercise, &state.policies, session_id, &st))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn do_submit(state: &AppState, session_id: &str) -> Result<SubmitOut, SessionError> {
  let (verdict, notification) = state.submit(session_id).await?;
  Ok(submit_out(&state.exercise, &verdict, notification))
}
