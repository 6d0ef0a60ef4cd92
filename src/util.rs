//! Small utility helpers used across modules.

/// Log-safe truncation for learner-typed text.
/// Cuts on a char boundary so multi-byte input never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_text_is_kept() {
    assert_eq!(trunc_for_log("blue", 16), "blue");
  }

  #[test]
  fn long_text_is_cut_on_char_boundary() {
    let out = trunc_for_log("Chính xác!", 3);
    assert_eq!(out, "Ch… (12 bytes total)");
  }
}
