use userhub_shared::UserEvent;

impl super::Command {
    /// Publishes the DELETE event from the pre-deletion record, then
    /// removes it. A publish failure does not stop the delete.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> userhub_shared::Result<()> {
        let Some(user) = self.store.find_by_id(id).await? else {
            userhub_shared::not_found!("{}", super::USER_NOT_FOUND);
        };

        self.emit(UserEvent::deleted(user.email.to_owned())).await;

        // A concurrent delete of the same id won the race after our event
        // went out, so the event is delivered at least once, maybe twice.
        if !self.store.delete_by_id(id).await? {
            tracing::warn!(
                user.id = id,
                email = %user.email,
                "user removed concurrently after its delete event was published"
            );
            userhub_shared::not_found!("{}", super::USER_NOT_FOUND);
        }

        tracing::info!(user.id = id, "user deleted");

        Ok(())
    }
}
