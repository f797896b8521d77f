use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Severity attached to user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Information,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Information => "INFORMATION",
        }
    }
}

/// Structured toast payload handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_for: Option<Duration>,
}

impl Notification {
    pub fn new(title: impl Into<String>, content: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            severity,
            display_for: None,
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new("Success", content, Severity::Success)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new("Error", content, Severity::Error)
    }

    pub fn validation(content: impl Into<String>) -> Self {
        Self::new("Validation Error", content, Severity::Error)
    }

    pub fn with_display_for(mut self, duration: Duration) -> Self {
        self.display_for = Some(duration);
        self
    }
}

/// Outbound feedback channel (toast library, test recorder, log).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that writes every notification to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let content = notification.content.as_deref().unwrap_or_default();
        match notification.severity {
            Severity::Error => {
                tracing::error!(title = %notification.title, %content, "listing notification")
            }
            Severity::Warning => {
                tracing::warn!(title = %notification.title, %content, "listing notification")
            }
            Severity::Success | Severity::Information => tracing::info!(
                severity = notification.severity.label(),
                title = %notification.title,
                %content,
                "listing notification"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_upper_case() {
        let json = serde_json::to_string(&Severity::Information).expect("serialize");
        assert_eq!(json, "\"INFORMATION\"");
        assert_eq!(Severity::Success.label(), "SUCCESS");
    }

    #[test]
    fn constructors_fill_titles() {
        let note = Notification::validation("Please enter a listing title");
        assert_eq!(note.title, "Validation Error");
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.content.as_deref(), Some("Please enter a listing title"));

        let timed = Notification::success("done").with_display_for(Duration::from_secs(3));
        assert_eq!(timed.display_for, Some(Duration::from_secs(3)));
    }
}
