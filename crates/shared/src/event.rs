use serde::{Deserialize, Serialize};
use strum::Display;

/// Broker topic user events are published on.
pub const USER_TOPIC: &str = "users";

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Create,
    Delete,
}

/// Membership change notification handed to the publisher after a
/// successful create or delete. Equal when email and operation match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserEvent {
    pub email: String,
    pub operation: Operation,
}

impl UserEvent {
    pub fn created(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            operation: Operation::Create,
        }
    }

    pub fn deleted(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            operation: Operation::Delete,
        }
    }
}
