//! Submit-time grading. Reads the fill state, never changes it.

use serde::{Deserialize, Serialize};

use crate::domain::{BlankGroup, BlankId, Exercise};
use crate::fill::FillState;

/// Which groups count toward the pass/fail result.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScope {
  /// Only paragraph blanks are graded; the table is practice.
  #[default]
  Paragraph,
  All,
}

impl ScoringScope {
  pub fn includes(self, group: BlankGroup) -> bool {
    match self {
      ScoringScope::Paragraph => group == BlankGroup::Paragraph,
      ScoringScope::All => true,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlankVerdict {
  pub blank: BlankId,
  pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
  pub all_correct: bool,
  pub blanks: Vec<BlankVerdict>,
}

/// A blank passes if either its typed value or its dropped word equals the answer.
pub fn validate(exercise: &Exercise, state: &FillState, scope: ScoringScope) -> Verdict {
  let blanks: Vec<BlankVerdict> = exercise
    .blank_ids()
    .filter(|id| scope.includes(exercise.blank(*id).group))
    .map(|id| {
      let answer = exercise.blank(id).correct_answer.as_str();
      let typed = state.input(id) == Some(answer);
      let dropped = state.filled(id).is_some_and(|w| exercise.word(w).word == answer);
      BlankVerdict { blank: id, correct: typed || dropped }
    })
    .collect();
  let all_correct = blanks.iter().all(|b| b.correct);
  Verdict { all_correct, blanks }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fill::FillEvent;
  use crate::seeds::seed_exercise;

  fn typed(ex: &Exercise, st: FillState, key: &str, value: &str) -> FillState {
    let blank = ex.resolve_blank(BlankGroup::Paragraph, key).unwrap();
    st.apply(ex, &FillEvent::Input { blank, value: value.into() }).unwrap().state
  }

  fn dropped(ex: &Exercise, st: FillState, word: &str, group: BlankGroup, key: &str) -> FillState {
    let event = FillEvent::Drop {
      word: ex.resolve_word(word).unwrap(),
      target: ex.resolve_blank(group, key).unwrap(),
    };
    st.apply(ex, &event).unwrap().state
  }

  #[test]
  fn typed_answers_pass() {
    let ex = seed_exercise().unwrap();
    let st = typed(&ex, FillState::new(&ex), "blue", "blue");
    let st = typed(&ex, st, "green", "green");
    assert!(validate(&ex, &st, ScoringScope::Paragraph).all_correct);
  }

  #[test]
  fn dropped_answers_pass() {
    let ex = seed_exercise().unwrap();
    let st = dropped(&ex, FillState::new(&ex), "blue", BlankGroup::Paragraph, "blue");
    let st = dropped(&ex, st, "green", BlankGroup::Paragraph, "green");
    let v = validate(&ex, &st, ScoringScope::Paragraph);
    assert!(v.all_correct);
    assert_eq!(v.blanks.len(), 2);
  }

  #[test]
  fn mixed_typed_and_dropped_pass() {
    let ex = seed_exercise().unwrap();
    let st = typed(&ex, FillState::new(&ex), "blue", "blue");
    let st = dropped(&ex, st, "green", BlankGroup::Paragraph, "green");
    assert!(validate(&ex, &st, ScoringScope::Paragraph).all_correct);
  }

  #[test]
  fn wrong_typed_value_fails() {
    let ex = seed_exercise().unwrap();
    let st = typed(&ex, FillState::new(&ex), "blue", "red");
    let v = validate(&ex, &st, ScoringScope::Paragraph);
    assert!(!v.all_correct);
    assert!(v.blanks.iter().all(|b| !b.correct));
  }

  #[test]
  fn empty_state_fails() {
    let ex = seed_exercise().unwrap();
    assert!(!validate(&ex, &FillState::new(&ex), ScoringScope::Paragraph).all_correct);
  }

  #[test]
  fn wrong_table_word_counts_only_when_table_is_scored() {
    let ex = seed_exercise().unwrap();
    let st = dropped(&ex, FillState::new(&ex), "yellow", BlankGroup::Table, "red");
    let st = typed(&ex, st, "blue", "blue");
    let st = typed(&ex, st, "green", "green");

    assert!(validate(&ex, &st, ScoringScope::Paragraph).all_correct);

    let all = validate(&ex, &st, ScoringScope::All);
    assert!(!all.all_correct);
    let row = ex.resolve_blank(BlankGroup::Table, "red").unwrap();
    assert!(all.blanks.iter().any(|b| b.blank == row && !b.correct));
  }

  #[test]
  fn validation_leaves_state_untouched() {
    let ex = seed_exercise().unwrap();
    let st = typed(&ex, FillState::new(&ex), "blue", "blue");
    let before = st.clone();
    let _ = validate(&ex, &st, ScoringScope::All);
    assert_eq!(st, before);
  }
}
