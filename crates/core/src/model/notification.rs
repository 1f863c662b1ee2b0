use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{NotificationId, UserId};

/// Category of a notification. Unknown categories from the store are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Quiz,
    Achievement,
    System,
    Other(String),
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Quiz => "quiz",
            NotificationKind::Achievement => "achievement",
            NotificationKind::System => "system",
            NotificationKind::Other(kind) => kind,
        }
    }

    /// Icon name used by the feed.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Quiz => "book",
            NotificationKind::Achievement => "trophy",
            NotificationKind::System => "information-circle",
            NotificationKind::Other(_) => "notifications",
        }
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "quiz" => Self::Quiz,
            "achievement" => Self::Achievement,
            "system" => Self::System,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Other(kind) => kind,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    /// Unix milliseconds.
    pub created_at: i64,
}

/// Label for the unread badge: empty for zero, the count up to 99, then `99+`.
#[must_use]
pub fn badge_label(unread: usize) -> String {
    match unread {
        0 => String::new(),
        1..=99 => unread.to_string(),
        _ => "99+".to_owned(),
    }
}
