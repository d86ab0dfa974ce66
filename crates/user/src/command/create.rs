use serde::Deserialize;
use userhub_shared::UserEvent;
use validator::Validate;

use crate::{NewUser, UserResponse, email};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserInput {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 50, message = "size must be between 0 and 50")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        email(message = "must be a well-formed email address"),
        length(max = 254, message = "size must be between 0 and 254")
    )]
    pub email: String,

    #[validate(required(message = "must not be null"))]
    pub age: Option<i32>,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some(std::borrow::Cow::from("must not be blank"));
        return Err(error);
    }

    Ok(())
}

impl super::Command {
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, mut input: CreateUserInput) -> userhub_shared::Result<UserResponse> {
        input.email = input.email.trim().to_owned();
        input.validate()?;

        let email = email::normalize(&input.email);
        email::ensure_unique(self.store.as_ref(), &email).await?;

        // A concurrent create can still pass the guard; the store's unique
        // index turns that race into a conflict here.
        let user = self
            .store
            .insert(NewUser {
                name: input.name,
                email,
                age: input.age.unwrap_or_default(),
            })
            .await?;

        tracing::info!(user.id = user.id, "user created");

        self.emit(UserEvent::created(user.email.to_owned())).await;

        Ok(user.into())
    }
}
