//! Application state: the shared exercise, drop/scoring policy, and per-learner sessions.
//!
//! This module owns:
//!   - the exercise (from TOML or the built-in seed), read-only after startup
//!   - accept policies per fill area and the scoring scope
//!   - the session map: session id -> current `FillState`
//!
//! Sessions are dropped once idle past `sessions.idle_ttl_secs`, and the map never
//! holds more than `sessions.max_sessions`; both are enforced when a session is created.
//!
//! Every operation computes the next `FillState` with a pure transition and swaps
//! it in while holding the write lock, so two events on one session never interleave.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::{sync::RwLock, time::Instant};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_config_from_env, AppConfig, SessionSettings};
use crate::dnd::{reconcile, DragPayload, DropOutcome, GroupPolicies};
use crate::domain::{BlankGroup, Exercise, ExerciseError, WordId};
use crate::fill::{FillEvent, FillState};
use crate::notify::{LogNotifier, Notification, NotificationSettings, Notifier};
use crate::seeds::seed_exercise;
use crate::util::trunc_for_log;
use crate::validation::{validate, ScoringScope, Verdict};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
}

/// Result of a drop request as seen by the session owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropResult {
    pub accepted: bool,
    pub displaced: Option<WordId>,
    pub state: FillState,
}

/// One learner's fill state plus the last time any request touched it.
#[derive(Clone, Debug)]
pub struct Session {
    pub fill: FillState,
    pub last_used: Instant,
}

fn touch<'a>(sessions: &'a mut HashMap<String, Session>, id: &str) -> Result<&'a mut FillState, SessionError> {
    let s = sessions
        .get_mut(id)
        .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
    s.last_used = Instant::now();
    Ok(&mut s.fill)
}

#[derive(Clone)]
pub struct AppState {
    pub exercise: Arc<Exercise>,
    pub policies: GroupPolicies,
    pub scoring: ScoringScope,
    pub notifications: NotificationSettings,
    pub notifier: Arc<dyn Notifier>,
    pub session_limits: SessionSettings,
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl AppState {
    /// Build state from env: load config, build the exercise, log the active policy.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, ExerciseError> {
        let cfg = load_config_from_env().unwrap_or_default();
        Self::from_config(cfg, Arc::new(LogNotifier))
    }

    pub fn from_config(cfg: AppConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ExerciseError> {
        let exercise = match cfg.exercise.map(|e| e.build()) {
            Some(Ok(ex)) => {
                info!(target: "exercise", "Using exercise from config");
                ex
            }
            Some(Err(e)) => {
                error!(target: "exercise", error = %e, "Configured exercise is invalid; using built-in exercise");
                seed_exercise()?
            }
            None => {
                info!(target: "exercise", "No exercise configured; using built-in exercise");
                seed_exercise()?
            }
        };

        let table_blanks = exercise.group_blanks(BlankGroup::Table).count();
        info!(
            target: "exercise",
            paragraph_blanks = exercise.group_blanks(BlankGroup::Paragraph).count(),
            table_blanks,
            words = exercise.words().len(),
            paragraph_accept = ?cfg.policy.accept.paragraph,
            table_accept = ?cfg.policy.accept.table,
            scoring = ?cfg.policy.scoring,
            "Exercise inventory"
        );
        if table_blanks > 0 && !cfg.policy.scoring.includes(BlankGroup::Table) {
            warn!(target: "exercise", table_blanks, "Table blanks are not scored on submit (policy.scoring = \"paragraph\")");
        }

        Ok(Self {
            exercise: Arc::new(exercise),
            policies: cfg.policy.accept,
            scoring: cfg.policy.scoring,
            notifications: cfg.notifications,
            notifier,
            session_limits: cfg.sessions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Start a learner session with every blank empty and the full pool.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> (String, FillState) {
        let id = Uuid::new_v4().to_string();
        let st = FillState::new(&self.exercise);
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let evicted = evict(&mut sessions, &self.session_limits, now);
        sessions.insert(id.clone(), Session { fill: st.clone(), last_used: now });
        info!(target: "exercise", session_id = %id, live = sessions.len(), evicted, "Session created");
        (id, st)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn session(&self, id: &str) -> Result<FillState, SessionError> {
        let mut sessions = self.sessions.write().await;
        touch(&mut sessions, id).map(|st| st.clone())
    }

    /// Drag `word` onto the blank `(group, key)`. The target's accept policy decides.
    #[instrument(level = "info", skip(self))]
    pub async fn drop_word(
        &self,
        id: &str,
        word: &str,
        group: BlankGroup,
        key: &str,
    ) -> Result<DropResult, SessionError> {
        let blank = self.exercise.resolve_blank(group, key)?;
        let target = self.policies.target(&self.exercise, blank);
        let payload = DragPayload { word: word.to_string() };

        let mut sessions = self.sessions.write().await;
        let current = touch(&mut sessions, id)?;

        match reconcile(&self.exercise, current, &payload, target)? {
            DropOutcome::Rejected => {
                debug!(target: "exercise", session_id = %id, %word, %group, blank = %key, "Drop rejected by target");
                Ok(DropResult { accepted: false, displaced: None, state: current.clone() })
            }
            DropOutcome::Placed { state, displaced, .. } => {
                *current = state.clone();
                info!(
                    target: "exercise",
                    session_id = %id,
                    %word,
                    %group,
                    blank = %key,
                    displaced = displaced.map(|w| self.exercise.word(w).word.as_str()).unwrap_or(""),
                    pool = state.pool_len(),
                    "Word placed"
                );
                Ok(DropResult { accepted: true, displaced, state })
            }
        }
    }

    /// Record manual typing into a blank. Does not touch dropped words or the pool.
    #[instrument(level = "info", skip(self, value), fields(value_len = value.len()))]
    pub async fn set_input(
        &self,
        id: &str,
        group: BlankGroup,
        key: &str,
        value: &str,
    ) -> Result<FillState, SessionError> {
        let blank = self.exercise.resolve_blank(group, key)?;
        let mut sessions = self.sessions.write().await;
        let current = touch(&mut sessions, id)?;
        let t = current.apply(&self.exercise, &FillEvent::Input { blank, value: value.to_string() })?;
        *current = t.state.clone();
        debug!(target: "exercise", session_id = %id, %group, blank = %key, value = %trunc_for_log(value, 32), "Input updated");
        Ok(t.state)
    }

    /// Grade the session and fire the matching toast. The session is left as is.
    #[instrument(level = "info", skip(self))]
    pub async fn submit(&self, id: &str) -> Result<(Verdict, Notification), SessionError> {
        let st = self.session(id).await?;
        let verdict = validate(&self.exercise, &st, self.scoring);
        let notification = self.notifications.for_result(verdict.all_correct);
        self.notifier.notify(id, &notification);
        info!(
            target: "exercise",
            session_id = %id,
            all_correct = verdict.all_correct,
            graded = verdict.blanks.len(),
            "Submit evaluated"
        );
        Ok((verdict, notification))
    }
}

/// Drop idle sessions, then the least recently used ones until a new session fits.
fn evict(sessions: &mut HashMap<String, Session>, limits: &SessionSettings, now: Instant) -> usize {
    let before = sessions.len();
    let ttl = limits.idle_ttl();
    sessions.retain(|_, s| now.duration_since(s.last_used) < ttl);

    let cap = limits.max_sessions.max(1);
    while sessions.len() >= cap {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, s)| s.last_used)
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                sessions.remove(&id);
            }
            None => break,
        }
    }

    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(target: "exercise", evicted, remaining = sessions.len(), "Evicted sessions");
    }
    evicted
}
