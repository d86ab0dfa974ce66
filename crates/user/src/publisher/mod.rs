use async_trait::async_trait;
use userhub_shared::UserEvent;

mod channel;
mod logger;
mod outbox;

pub use channel::{ChannelPublisher, Relay};
pub use logger::LogPublisher;
pub use outbox::{OutboxMessage, OutboxPublisher};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("publisher queue is full")]
    Full,

    #[error("publisher is closed")]
    Closed,

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write event: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hands a user event to the broker side. Callers treat it as
/// fire-and-forget: a failure is reported but nothing is rolled back.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError>;
}
