use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use userhub_shared::UserEvent;

use super::{PublishError, Publisher};

/// Non-blocking front for a slower publisher. `publish` only enqueues;
/// the paired [`Relay`] forwards queued events in order.
#[derive(Clone)]
pub struct ChannelPublisher {
    sender: Sender<UserEvent>,
}

pub struct Relay {
    receiver: Receiver<UserEvent>,
    inner: Arc<dyn Publisher>,
}

impl ChannelPublisher {
    pub fn new(inner: Arc<dyn Publisher>, buffer: usize) -> (Self, Relay) {
        let (sender, receiver) = mpsc::channel(buffer);

        (Self { sender }, Relay { receiver, inner })
    }
}

#[async_trait]
impl Publisher for ChannelPublisher {
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError> {
        self.sender
            .try_send(event.clone())
            .map_err(|err| match err {
                TrySendError::Full(_) => PublishError::Full,
                TrySendError::Closed(_) => PublishError::Closed,
            })
    }
}

impl Relay {
    /// Runs until every [`ChannelPublisher`] clone is dropped and the
    /// queue is drained. Returns the number of events forwarded.
    pub async fn run(mut self) -> usize {
        let mut forwarded = 0;

        while let Some(event) = self.receiver.recv().await {
            match self.inner.publish(&event).await {
                Ok(()) => forwarded += 1,
                Err(err) => tracing::error!(
                    email = %event.email,
                    operation = %event.operation,
                    error = %err,
                    "failed to relay user event"
                ),
            }
        }

        tracing::info!(forwarded, "user event relay stopped");

        forwarded
    }
}
