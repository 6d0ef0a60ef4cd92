//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::{AppState, SessionError};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "cloze_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "cloze_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match respond(msg, &state).await {
      Frame::Reply(out) => {
        if let Err(e) = socket.send(out).await {
          error!(target: "cloze_backend", error = %e, "WS send error");
          break;
        }
      }
      Frame::Close => break,
      Frame::Skip => {}
    }
  }
  info!(target: "cloze_backend", "WebSocket disconnected");
}

/// What the loop does with one incoming frame. Every reply goes through the same send path.
#[derive(Debug, PartialEq, Eq)]
enum Frame {
  Reply(Message),
  Close,
  Skip,
}

async fn respond(msg: Message, state: &AppState) -> Frame {
  match msg {
    Message::Text(txt) => {
      // Parse, dispatch, serialize response.
      let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
        Ok(incoming) => {
          debug!(target: "cloze_backend", "WS received: {:?}", &incoming);
          handle_client_ws(incoming, state).await
        }
        Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
      };

      let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
      });
      Frame::Reply(Message::Text(out))
    }
    Message::Ping(payload) => Frame::Reply(Message::Pong(payload)),
    Message::Close(_) => Frame::Close,
    _ => Frame::Skip,
  }
}

fn or_error<T>(res: Result<T, SessionError>, ok: impl FnOnce(T) -> ServerWsMessage) -> ServerWsMessage {
  match res {
    Ok(v) => ok(v),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewSession => {
      let session = new_session(state).await;
      info!(target: "exercise", session_id = %session.session_id, "WS session created");
      ServerWsMessage::Session { session }
    }

    ClientWsMessage::GetSession { session_id } =>
      or_error(get_session(state, &session_id).await, |session| ServerWsMessage::Session { session }),

    ClientWsMessage::Drop { session_id, word, group, blank } =>
      or_error(do_drop(state, &session_id, &word, group, &blank).await, |result| ServerWsMessage::DropResult { result }),

    ClientWsMessage::Input { session_id, group, blank, value } =>
      or_error(do_input(state, &session_id, group, &blank, &value).await, |session| ServerWsMessage::Session { session }),

    ClientWsMessage::Submit { session_id } => {
      let res = do_submit(state, &session_id).await;
      if let Ok(out) = &res {
        info!(target: "exercise", id = %session_id, all_correct = out.all_correct, "WS submit evaluated");
      }
      or_error(res, |result| ServerWsMessage::SubmitResult { result })
    }
  }
}
