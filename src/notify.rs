//! Toast notifications produced by a submit.
//!
//! The server does not render toasts. It builds the notification, hands it to a
//! `Notifier` (fire-and-forget) and returns it to the client, which shows it
//! for `auto_close_ms` and then dismisses it.

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  Success,
  Error,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
  TopLeft,
  #[default]
  TopCenter,
  TopRight,
  BottomLeft,
  BottomCenter,
  BottomRight,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub kind: NotificationKind,
  pub message: String,
  pub position: ToastPosition,
  pub auto_close_ms: u64,
}

/// Texts and presentation of the submit toasts. Overridable in TOML.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
  pub success_message: String,
  pub failure_message: String,
  pub position: ToastPosition,
  pub auto_close_ms: u64,
}

impl Default for NotificationSettings {
  fn default() -> Self {
    Self {
      success_message: "Chính xác!".into(),
      failure_message: "Sai rồi, thử lại nhé!".into(),
      position: ToastPosition::TopCenter,
      auto_close_ms: 2000,
    }
  }
}

impl NotificationSettings {
  pub fn for_result(&self, all_correct: bool) -> Notification {
    let (kind, message) = if all_correct {
      (NotificationKind::Success, &self.success_message)
    } else {
      (NotificationKind::Error, &self.failure_message)
    };
    Notification {
      kind,
      message: message.clone(),
      position: self.position,
      auto_close_ms: self.auto_close_ms,
    }
  }
}

/// Outbound notification surface. No return value is consumed.
pub trait Notifier: Send + Sync {
  fn notify(&self, session_id: &str, notification: &Notification);
}

/// Default notifier: records the toast in the structured log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn notify(&self, session_id: &str, n: &Notification) {
    info!(
      target: "exercise",
      %session_id,
      kind = ?n.kind,
      message = %n.message,
      auto_close_ms = n.auto_close_ms,
      "Toast notification"
    );
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_toasts_match_the_stock_exercise() {
    let s = NotificationSettings::default();
    let ok = s.for_result(true);
    assert_eq!(ok.kind, NotificationKind::Success);
    assert_eq!(ok.message, "Chính xác!");
    assert_eq!(ok.auto_close_ms, 2000);

    let bad = s.for_result(false);
    assert_eq!(bad.kind, NotificationKind::Error);
    assert_eq!(bad.message, "Sai rồi, thử lại nhé!");
  }

  #[test]
  fn notification_serializes_for_the_client() {
    let n = NotificationSettings::default().for_result(true);
    let v = serde_json::to_value(&n).unwrap();
    assert_eq!(v["position"], "top-center");
    assert_eq!(v["autoCloseMs"], 2000);
    assert_eq!(v["kind"], "success");
  }

  #[test]
  fn every_position_has_a_client_style() {
    let page = include_str!("../static/index.html");
    for pos in [
      ToastPosition::TopLeft,
      ToastPosition::TopCenter,
      ToastPosition::TopRight,
      ToastPosition::BottomLeft,
      ToastPosition::BottomCenter,
      ToastPosition::BottomRight,
    ] {
      let class = serde_json::to_value(pos).unwrap();
      let rule = format!("#toast.{} {{", class.as_str().unwrap());
      assert!(page.contains(&rule), "no style for {rule}");
    }
  }
}
