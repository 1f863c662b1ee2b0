use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for parsing an ID from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to parse {kind} from string")]
pub struct ParseIdError {
    kind: &'static str,
}

impl ParseIdError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

// String identifiers are authored by hand in quiz datasets or issued by the
// identity provider, so they are only required to be non-blank.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from a non-blank string (surrounding whitespace is trimmed).
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if the value is empty after trimming.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
                let raw = id.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique identifier for a Quiz.
    QuizId
}

string_id! {
    /// Identifier for a Question, unique within its quiz.
    QuestionId
}

string_id! {
    /// Identifier issued by the identity provider for a signed-in user.
    UserId
}

/// Identifier for a Notification row in the document store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl NotificationId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotificationId({})", self.0)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotificationId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::new).map_err(|_| ParseIdError {
            kind: "NotificationId",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_id_trims_and_displays() {
        let id = QuizId::new("  js-basics ").unwrap();
        assert_eq!(id.as_str(), "js-basics");
        assert_eq!(id.to_string(), "js-basics");
        assert_eq!(format!("{id:?}"), "QuizId(js-basics)");
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = QuestionId::new("   ").unwrap_err();
        assert_eq!(err.kind(), "QuestionId");
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn string_ids_deserialize_with_validation() {
        let id: QuizId = serde_json::from_str("\"q-1\"").unwrap();
        assert_eq!(id, QuizId::new("q-1").unwrap());
        assert!(serde_json::from_str::<QuizId>("\"  \"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"q-1\"");
    }

    #[test]
    fn notification_id_from_str() {
        let id: NotificationId = "42".parse().unwrap();
        assert_eq!(id, NotificationId::new(42));
        assert!("forty-two".parse::<NotificationId>().is_err());
    }
}
