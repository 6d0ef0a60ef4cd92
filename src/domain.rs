//! Domain models: word tokens, blanks, typed handles and the static exercise.
//!
//! An `Exercise` is built once at startup and shared read-only by every session.
//! Blanks and words are addressed through `BlankId` / `WordId` handles that only
//! the exercise hands out, so a misspelled answer key fails at lookup instead of
//! quietly creating a new map entry.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder inside the paragraph text where a paragraph blank is rendered.
pub const BLANK_MARKER: &str = "[_input]";

/// Display tag of a draggable word.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WordColor {
  #[default]
  Default,
  #[serde(alias = "red")]
  Highlighted,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordToken {
  pub word: String,
  #[serde(default)]
  pub color: WordColor,
}

impl WordToken {
  pub fn new(word: impl Into<String>, color: WordColor) -> Self {
    Self { word: word.into(), color }
  }
}

/// Which fill area a blank belongs to. Both areas draw from the same word pool.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BlankGroup {
  #[default]
  Paragraph,
  Table,
}

impl fmt::Display for BlankGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BlankGroup::Paragraph => f.write_str("paragraph"),
      BlankGroup::Table => f.write_str("table"),
    }
  }
}

/// A slot bound to one correct answer. Within a group the answer doubles as the blank's key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blank {
  pub id: u32,
  #[serde(rename = "correctAnswer", alias = "correct_answer")]
  pub correct_answer: String,
  #[serde(default)]
  pub group: BlankGroup,
  /// Row caption for table blanks.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}

impl Blank {
  pub fn paragraph(id: u32, correct_answer: impl Into<String>) -> Self {
    Self { id, correct_answer: correct_answer.into(), group: BlankGroup::Paragraph, label: None }
  }

  pub fn table(id: u32, correct_answer: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      id,
      correct_answer: correct_answer.into(),
      group: BlankGroup::Table,
      label: Some(label.into()),
    }
  }
}

/// Handle to a blank of a specific `Exercise` (index into its blank list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(usize);

impl BlankId {
  pub(crate) fn index(self) -> usize { self.0 }
}

/// Handle to a word token of a specific `Exercise` (index into its word list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(usize);

impl WordId {
  pub(crate) fn index(self) -> usize { self.0 }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExerciseError {
  #[error("duplicate word token: {0}")]
  DuplicateWord(String),
  #[error("duplicate {group} blank: {key}")]
  DuplicateBlank { group: BlankGroup, key: String },
  #[error("paragraph has {markers} blank markers but {blanks} paragraph blanks")]
  MarkerMismatch { markers: usize, blanks: usize },
  #[error("unknown {group} blank: {key}")]
  UnknownBlank { group: BlankGroup, key: String },
  #[error("unknown word: {0}")]
  UnknownWord(String),
  #[error("word is not available to drag: {0}")]
  WordUnavailable(String),
}

/// Piece of the paragraph as the client renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
  Text(String),
  Slot(BlankId),
}

/// Static exercise: paragraph with markers, ordered blanks, ordered word pool.
#[derive(Clone, Debug)]
pub struct Exercise {
  paragraph: String,
  blanks: Vec<Blank>,
  words: Vec<WordToken>,
  blank_index: HashMap<(BlankGroup, String), BlankId>,
  word_index: HashMap<String, WordId>,
}

impl Exercise {
  pub fn new(
    paragraph: impl Into<String>,
    blanks: Vec<Blank>,
    words: Vec<WordToken>,
  ) -> Result<Self, ExerciseError> {
    let paragraph = paragraph.into();

    let mut word_index = HashMap::with_capacity(words.len());
    for (i, w) in words.iter().enumerate() {
      if word_index.insert(w.word.clone(), WordId(i)).is_some() {
        return Err(ExerciseError::DuplicateWord(w.word.clone()));
      }
    }

    let mut blank_index = HashMap::with_capacity(blanks.len());
    for (i, b) in blanks.iter().enumerate() {
      if blank_index.insert((b.group, b.correct_answer.clone()), BlankId(i)).is_some() {
        return Err(ExerciseError::DuplicateBlank { group: b.group, key: b.correct_answer.clone() });
      }
    }

    let markers = paragraph.matches(BLANK_MARKER).count();
    let paragraph_blanks = blanks.iter().filter(|b| b.group == BlankGroup::Paragraph).count();
    if markers != paragraph_blanks {
      return Err(ExerciseError::MarkerMismatch { markers, blanks: paragraph_blanks });
    }

    Ok(Self { paragraph, blanks, words, blank_index, word_index })
  }

  pub fn paragraph(&self) -> &str { &self.paragraph }
  pub fn blanks(&self) -> &[Blank] { &self.blanks }
  pub fn words(&self) -> &[WordToken] { &self.words }

  pub fn blank(&self, id: BlankId) -> &Blank { &self.blanks[id.0] }
  pub fn word(&self, id: WordId) -> &WordToken { &self.words[id.0] }

  pub fn blank_ids(&self) -> impl Iterator<Item = BlankId> + '_ {
    (0..self.blanks.len()).map(BlankId)
  }

  pub fn word_ids(&self) -> impl Iterator<Item = WordId> + '_ {
    (0..self.words.len()).map(WordId)
  }

  /// Blanks of one group, in configuration order.
  pub fn group_blanks(&self, group: BlankGroup) -> impl Iterator<Item = BlankId> + '_ {
    self.blank_ids().filter(move |id| self.blank(*id).group == group)
  }

  pub fn resolve_blank(&self, group: BlankGroup, key: &str) -> Result<BlankId, ExerciseError> {
    self.blank_index
      .get(&(group, key.to_string()))
      .copied()
      .ok_or_else(|| ExerciseError::UnknownBlank { group, key: key.to_string() })
  }

  pub fn resolve_word(&self, word: &str) -> Result<WordId, ExerciseError> {
    self.word_index
      .get(word)
      .copied()
      .ok_or_else(|| ExerciseError::UnknownWord(word.to_string()))
  }

  /// Split the paragraph at each marker; the n-th marker becomes the n-th paragraph blank.
  pub fn paragraph_segments(&self) -> Vec<Segment> {
    let mut slots = self.group_blanks(BlankGroup::Paragraph);
    let mut out = Vec::new();
    for (i, piece) in self.paragraph.split(BLANK_MARKER).enumerate() {
      if i > 0 {
        if let Some(id) = slots.next() {
          out.push(Segment::Slot(id));
        }
      }
      if !piece.is_empty() {
        out.push(Segment::Text(piece.to_string()));
      }
    }
    out
  }
}
