//! Drag/drop pairing: a drag source carries a word, a drop target decides whether
//! to take it. Only an accepted drop reaches the fill state.
//!
//! The fill state never looks at correctness. Strict and permissive targets run
//! through the same `reconcile` path and differ only in `AcceptPolicy::accepts`.

use serde::{Deserialize, Serialize};

use crate::domain::{Blank, BlankGroup, BlankId, Exercise, ExerciseError, WordId};
use crate::fill::{FillEvent, FillState};

/// Accept predicate advertised by a drop target.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AcceptPolicy {
  /// Only the blank's correct answer may be dropped.
  Strict,
  /// Any word is recorded; validation judges it later.
  Permissive,
}

impl AcceptPolicy {
  pub fn accepts(self, blank: &Blank, payload: &DragPayload) -> bool {
    match self {
      AcceptPolicy::Strict => payload.word == blank.correct_answer,
      AcceptPolicy::Permissive => true,
    }
  }
}

/// Accept policy per fill area.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupPolicies {
  #[serde(default = "strict")]
  pub paragraph: AcceptPolicy,
  #[serde(default = "permissive")]
  pub table: AcceptPolicy,
}

fn strict() -> AcceptPolicy { AcceptPolicy::Strict }
fn permissive() -> AcceptPolicy { AcceptPolicy::Permissive }

impl Default for GroupPolicies {
  fn default() -> Self {
    Self { paragraph: strict(), table: permissive() }
  }
}

impl GroupPolicies {
  pub fn for_group(&self, group: BlankGroup) -> AcceptPolicy {
    match group {
      BlankGroup::Paragraph => self.paragraph,
      BlankGroup::Table => self.table,
    }
  }

  pub fn target(&self, exercise: &Exercise, blank: BlankId) -> DropTarget {
    DropTarget { blank, policy: self.for_group(exercise.blank(blank).group) }
  }
}

/// What a drag source advertises.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
  pub word: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTarget {
  pub blank: BlankId,
  pub policy: AcceptPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
  /// Target refused the payload; the state is unchanged.
  Rejected,
  Placed {
    state: FillState,
    displaced: Option<WordId>,
  },
}

pub fn reconcile(
  exercise: &Exercise,
  state: &FillState,
  payload: &DragPayload,
  target: DropTarget,
) -> Result<DropOutcome, ExerciseError> {
  let word = exercise.resolve_word(&payload.word)?;
  if !target.policy.accepts(exercise.blank(target.blank), payload) {
    return Ok(DropOutcome::Rejected);
  }
  let t = state.apply(exercise, &FillEvent::Drop { word, target: target.blank })?;
  Ok(DropOutcome::Placed { state: t.state, displaced: t.displaced })
}
