//! Built-in exercise used when no TOML config is provided.

use crate::config::ExerciseCfg;
use crate::domain::{Blank, Exercise, ExerciseError, WordColor, WordToken};

/// The stock colour exercise: two paragraph blanks, one table row, four words.
pub fn seed_exercise_cfg() -> ExerciseCfg {
  ExerciseCfg {
    paragraph: "The sky is [_input] and the grass is [_input]. \
                You should drag the word green to the correct blank."
      .into(),
    blanks: vec![
      Blank::paragraph(1, "blue"),
      Blank::paragraph(2, "green"),
      Blank::table(3, "red", "Ripe tomatoes are"),
    ],
    words: vec![
      WordToken::new("blue", WordColor::Default),
      WordToken::new("green", WordColor::Highlighted),
      WordToken::new("yellow", WordColor::Default),
      WordToken::new("red", WordColor::Default),
    ],
  }
}

pub fn seed_exercise() -> Result<Exercise, ExerciseError> {
  seed_exercise_cfg().build()
}
