use std::sync::Arc;

use userhub_shared::UserEvent;

use crate::{publisher::Publisher, repository::Store};

mod create;
mod delete;
mod read;
mod update;

pub use create::CreateUserInput;
pub use update::UpdateUserInput;

pub(crate) const USER_NOT_FOUND: &str = "User not found";

/// Runs the create/read/update/delete use cases against an injected
/// store and publisher. Holds no state of its own, so clones share both.
#[derive(Clone)]
pub struct Command {
    store: Arc<dyn Store>,
    publisher: Arc<dyn Publisher>,
}

impl Command {
    pub fn new(store: Arc<dyn Store>, publisher: Arc<dyn Publisher>) -> Self {
        Self { store, publisher }
    }

    /// The store write already happened; a lost event is logged for
    /// out-of-band alerting and never surfaces to the caller.
    async fn emit(&self, event: UserEvent) {
        if let Err(err) = self.publisher.publish(&event).await {
            tracing::error!(
                email = %event.email,
                operation = %event.operation,
                error = %err,
                "failed to publish user event"
            );
        }
    }
}
