use async_trait::async_trait;
use userhub_shared::{USER_TOPIC, UserEvent};

use super::{PublishError, Publisher};

/// Writes events to the log instead of a broker.
#[derive(Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError> {
        tracing::info!(
            topic = USER_TOPIC,
            email = %event.email,
            operation = %event.operation,
            "user event published"
        );

        Ok(())
    }
}
