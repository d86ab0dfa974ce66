use serde::Deserialize;
use validator::Validate;

use crate::{UserResponse, email};

/// Omitted fields are left unchanged. A blank email counts as omitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(max = 50, message = "size must be between 0 and 50"))]
    pub name: Option<String>,

    #[validate(
        email(message = "must be a well-formed email address"),
        length(max = 254, message = "size must be between 0 and 254")
    )]
    pub email: Option<String>,

    pub age: Option<i32>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        mut input: UpdateUserInput,
    ) -> userhub_shared::Result<UserResponse> {
        input.email = input
            .email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty());
        input.validate()?;

        let Some(mut user) = self.store.find_by_id(id).await? else {
            userhub_shared::not_found!("{}", super::USER_NOT_FOUND);
        };

        if let Some(email) = input.email.as_deref().map(email::normalize) {
            if email != user.email {
                email::ensure_unique(self.store.as_ref(), &email).await?;
                user.email = email;
            }
        }

        if let Some(name) = input.name {
            user.name = name;
        }

        if let Some(age) = input.age {
            user.age = age;
        }

        let user = self.store.update(&user).await?;

        Ok(user.into())
    }
}
