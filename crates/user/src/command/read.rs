use crate::UserResponse;

impl super::Command {
    pub async fn read(&self, id: i64) -> userhub_shared::Result<UserResponse> {
        let Some(user) = self.store.find_by_id(id).await? else {
            userhub_shared::not_found!("{}", super::USER_NOT_FOUND);
        };

        Ok(user.into())
    }

    pub async fn list(&self) -> userhub_shared::Result<Vec<UserResponse>> {
        Ok(self
            .store
            .find_all()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }
}
