//! Fill state of one learner: dropped words, typed values and the shared word pool.
//!
//! `FillState` is never mutated in place by callers. `apply` takes an event and
//! returns the next state plus whatever the transition displaced, so the
//! displacement rule can be checked without any transport or rendering around it.
//!
//! Invariant: a word sits in at most one blank across both groups, and it is in
//! the pool exactly when it sits in no blank.

use std::collections::HashMap;

use crate::domain::{BlankId, Exercise, ExerciseError, WordId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FillEvent {
  /// A drop the target has already accepted.
  Drop { word: WordId, target: BlankId },
  /// Manual typing into the blank's input field.
  Input { blank: BlankId, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
  pub state: FillState,
  /// Word sent back to the pool by this transition, if any.
  pub displaced: Option<WordId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillState {
  // Indexed by BlankId.
  slots: Vec<Option<WordId>>,
  inputs: HashMap<BlankId, String>,
  // Indexed by WordId; true while the word can still be dragged.
  pool: Vec<bool>,
}

impl FillState {
  /// Every blank empty, every word available.
  pub fn new(exercise: &Exercise) -> Self {
    Self {
      slots: vec![None; exercise.blanks().len()],
      inputs: HashMap::new(),
      pool: vec![true; exercise.words().len()],
    }
  }

  pub fn filled(&self, blank: BlankId) -> Option<WordId> {
    self.slots.get(blank.index()).copied().flatten()
  }

  pub fn input(&self, blank: BlankId) -> Option<&str> {
    self.inputs.get(&blank).map(String::as_str)
  }

  pub fn is_available(&self, word: WordId) -> bool {
    self.pool.get(word.index()).copied().unwrap_or(false)
  }

  /// Words still in the pool, in configuration order.
  pub fn available<'a>(&'a self, exercise: &'a Exercise) -> impl Iterator<Item = WordId> + 'a {
    exercise.word_ids().filter(move |w| self.is_available(*w))
  }

  pub fn pool_len(&self) -> usize {
    self.pool.iter().filter(|a| **a).count()
  }

  pub fn apply(&self, exercise: &Exercise, event: &FillEvent) -> Result<Transition, ExerciseError> {
    match event {
      FillEvent::Drop { word, target } => {
        if !self.is_available(*word) {
          return Err(ExerciseError::WordUnavailable(exercise.word(*word).word.clone()));
        }
        let mut next = self.clone();
        let displaced = next.slots[target.index()].replace(*word);
        if let Some(prev) = displaced {
          next.pool[prev.index()] = true;
        }
        next.pool[word.index()] = false;
        Ok(Transition { state: next, displaced })
      }
      FillEvent::Input { blank, value } => {
        let mut next = self.clone();
        next.inputs.insert(*blank, value.clone());
        Ok(Transition { state: next, displaced: None })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::BlankGroup;
  use crate::seeds::seed_exercise;

  fn ids(ex: &Exercise, words: &[&str]) -> Vec<WordId> {
    words.iter().map(|w| ex.resolve_word(w).unwrap()).collect()
  }

  fn place(ex: &Exercise, st: &FillState, word: &str, group: BlankGroup, key: &str) -> Transition {
    let event = FillEvent::Drop {
      word: ex.resolve_word(word).unwrap(),
      target: ex.resolve_blank(group, key).unwrap(),
    };
    st.apply(ex, &event).unwrap()
  }

  fn assert_invariant(ex: &Exercise, st: &FillState) {
    for w in ex.word_ids() {
      let placed = ex.blank_ids().filter(|b| st.filled(*b) == Some(w)).count();
      assert!(placed <= 1, "{} placed {placed} times", ex.word(w).word);
      assert_eq!(st.is_available(w), placed == 0, "pool disagrees for {}", ex.word(w).word);
    }
  }

  #[test]
  fn drop_moves_word_from_pool_into_blank() {
    let ex = seed_exercise().unwrap();
    let st = FillState::new(&ex);
    let t = place(&ex, &st, "blue", BlankGroup::Paragraph, "blue");
    let blue_blank = ex.resolve_blank(BlankGroup::Paragraph, "blue").unwrap();
    assert_eq!(t.state.filled(blue_blank), ex.resolve_word("blue").ok());
    assert_eq!(t.displaced, None);
    assert_eq!(t.state.pool_len(), 3);
    let remaining: Vec<WordId> = t.state.available(&ex).collect();
    assert_eq!(remaining, ids(&ex, &["green", "yellow", "red"]));
    // The previous state is untouched.
    assert_eq!(st.pool_len(), 4);
    assert_invariant(&ex, &t.state);
  }

  #[test]
  fn drop_onto_filled_blank_returns_previous_word() {
    let ex = seed_exercise().unwrap();
    let st = FillState::new(&ex);
    let st = place(&ex, &st, "yellow", BlankGroup::Table, "red").state;
    let before = st.pool_len();
    let t = place(&ex, &st, "red", BlankGroup::Table, "red");
    assert_eq!(t.displaced, ex.resolve_word("yellow").ok());
    assert_eq!(t.state.pool_len(), before);
    let remaining: Vec<WordId> = t.state.available(&ex).collect();
    assert_eq!(remaining, ids(&ex, &["blue", "green", "yellow"]));
    assert_invariant(&ex, &t.state);
  }

  #[test]
  fn placed_word_cannot_be_dropped_again() {
    let ex = seed_exercise().unwrap();
    let st = place(&ex, &FillState::new(&ex), "blue", BlankGroup::Paragraph, "blue").state;
    let event = FillEvent::Drop {
      word: ex.resolve_word("blue").unwrap(),
      target: ex.resolve_blank(BlankGroup::Table, "red").unwrap(),
    };
    assert_eq!(st.apply(&ex, &event).unwrap_err(), ExerciseError::WordUnavailable("blue".into()));
  }

  #[test]
  fn invariant_holds_across_drop_sequences() {
    let ex = seed_exercise().unwrap();
    let targets = [
      (BlankGroup::Paragraph, "blue"),
      (BlankGroup::Paragraph, "green"),
      (BlankGroup::Table, "red"),
    ];
    let words = ["blue", "green", "yellow", "red"];
    let mut st = FillState::new(&ex);
    // Deterministic walk over every (word, target) pairing, several rounds.
    for round in 0..5 {
      for (i, word) in words.iter().enumerate() {
        let (group, key) = targets[(i + round) % targets.len()];
        let event = FillEvent::Drop {
          word: ex.resolve_word(word).unwrap(),
          target: ex.resolve_blank(group, key).unwrap(),
        };
        match st.apply(&ex, &event) {
          Ok(t) => {
            assert_eq!(t.state.pool_len(), st.pool_len() - 1 + usize::from(t.displaced.is_some()));
            st = t.state;
          }
          Err(ExerciseError::WordUnavailable(_)) => {}
          Err(e) => panic!("unexpected error: {e}"),
        }
        assert_invariant(&ex, &st);
      }
    }
  }

  #[test]
  fn typing_and_dropping_are_independent() {
    let ex = seed_exercise().unwrap();
    let blue = ex.resolve_blank(BlankGroup::Paragraph, "blue").unwrap();
    let st = FillState::new(&ex);

    let typed = st
      .apply(&ex, &FillEvent::Input { blank: blue, value: "bl".into() })
      .unwrap()
      .state;
    assert_eq!(typed.filled(blue), None);
    assert_eq!(typed.pool_len(), 4);
    assert_eq!(typed.input(blue), Some("bl"));

    let dropped = place(&ex, &typed, "blue", BlankGroup::Paragraph, "blue").state;
    assert_eq!(dropped.input(blue), Some("bl"));
    assert_eq!(dropped.filled(blue), ex.resolve_word("blue").ok());
  }
}
