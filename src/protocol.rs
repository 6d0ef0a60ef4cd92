//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::dnd::{AcceptPolicy, GroupPolicies};
use crate::domain::{Blank, BlankGroup, BlankId, Exercise, Segment, WordColor, WordToken};
use crate::fill::FillState;
use crate::notify::Notification;
use crate::validation::Verdict;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewSession,
    GetSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Drop {
        #[serde(rename = "sessionId")]
        session_id: String,
        word: String,
        #[serde(default)]
        group: BlankGroup,
        blank: String,
    },
    Input {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(default)]
        group: BlankGroup,
        blank: String,
        value: String,
    },
    Submit {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session { session: SessionView },
    DropResult { result: DropOut },
    SubmitResult { result: SubmitOut },
    Error { message: String },
}

//
// Rendered view of one session
//

/// One blank as the client draws it. A dropped word wins over typed text; an
/// empty slot shows the input field prefilled with `input`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotOut {
    pub group: BlankGroup,
    pub blank: String,
    /// Lets the client refuse a dragover before any request is made.
    pub accept: AcceptPolicy,
    pub is_filled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentOut {
    Text { text: String },
    Blank { slot: SlotOut },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TableRowOut {
    pub label: String,
    pub slot: SlotOut,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WordOut {
    pub word: String,
    pub color: WordColor,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub paragraph: Vec<SegmentOut>,
    pub table: Vec<TableRowOut>,
    /// Words still draggable, in configuration order.
    pub pool: Vec<WordOut>,
}

fn slot_out(ex: &Exercise, policies: &GroupPolicies, st: &FillState, id: BlankId) -> SlotOut {
    let b = ex.blank(id);
    let filled_word = st.filled(id).map(|w| ex.word(w).word.clone());
    SlotOut {
        group: b.group,
        blank: b.correct_answer.clone(),
        accept: policies.for_group(b.group),
        is_filled: filled_word.is_some(),
        filled_word,
        input: st.input(id).map(str::to_string),
    }
}

/// Project exercise + fill state into what the client renders.
pub fn to_view(ex: &Exercise, policies: &GroupPolicies, session_id: &str, st: &FillState) -> SessionView {
    let paragraph = ex
        .paragraph_segments()
        .into_iter()
        .map(|seg| match seg {
            Segment::Text(text) => SegmentOut::Text { text },
            Segment::Slot(id) => SegmentOut::Blank { slot: slot_out(ex, policies, st, id) },
        })
        .collect();

    let table = ex
        .group_blanks(BlankGroup::Table)
        .map(|id| TableRowOut {
            label: ex.blank(id).label.clone().unwrap_or_default(),
            slot: slot_out(ex, policies, st, id),
        })
        .collect();

    let pool = st
        .available(ex)
        .map(|w| {
            let t = ex.word(w);
            WordOut { word: t.word.clone(), color: t.color }
        })
        .collect();

    SessionView { session_id: session_id.to_string(), paragraph, table, pool }
}

//
// HTTP request/response DTOs
//

/// Static exercise description (no session state).
#[derive(Debug, Serialize)]
pub struct ExerciseOut {
    pub paragraph: String,
    pub blanks: Vec<Blank>,
    pub words: Vec<WordToken>,
}

pub fn exercise_out(ex: &Exercise) -> ExerciseOut {
    ExerciseOut {
        paragraph: ex.paragraph().to_string(),
        blanks: ex.blanks().to_vec(),
        words: ex.words().to_vec(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DropIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub word: String,
    #[serde(default)]
    pub group: BlankGroup,
    pub blank: String,
}

#[derive(Debug, Serialize)]
pub struct DropOut {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaced: Option<String>,
    pub view: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct InputIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub group: BlankGroup,
    pub blank: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct BlankResultOut {
    pub group: BlankGroup,
    pub blank: String,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOut {
    pub all_correct: bool,
    pub blanks: Vec<BlankResultOut>,
    pub notification: Notification,
}

pub fn submit_out(ex: &Exercise, verdict: &Verdict, notification: Notification) -> SubmitOut {
    SubmitOut {
        all_correct: verdict.all_correct,
        blanks: verdict
            .blanks
            .iter()
            .map(|v| {
                let b = ex.blank(v.blank);
                BlankResultOut { group: b.group, blank: b.correct_answer.clone(), correct: v.correct }
            })
            .collect(),
        notification,
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
