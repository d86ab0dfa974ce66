use std::collections::BTreeMap;

use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use userhub_user::UserResponse;

pub const HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

type Links = BTreeMap<&'static str, Link>;

/// A user with the routes that act on it.
#[derive(Debug, Serialize)]
pub struct UserModel {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<UserResponse> for UserModel {
    fn from(user: UserResponse) -> Self {
        let links = Links::from([
            ("self", Link::new(format!("/users/read/{}", user.id))),
            ("all-users", Link::new("/users")),
            ("update", Link::new(format!("/users/update/{}", user.id))),
            ("delete", Link::new(format!("/users/delete/{}", user.id))),
        ]);

        Self { user, links }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedded {
    pub user_response_list: Vec<UserModel>,
}

/// Listing envelope. `_embedded` is left out when there are no users.
#[derive(Debug, Serialize)]
pub struct UserCollection {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Vec<UserResponse>> for UserCollection {
    fn from(users: Vec<UserResponse>) -> Self {
        let embedded = (!users.is_empty()).then(|| Embedded {
            user_response_list: users.into_iter().map(UserModel::from).collect(),
        });
        let links = Links::from([
            ("self", Link::new("/users")),
            ("create", Link::new("/users/create")),
        ]);

        Self { embedded, links }
    }
}

/// JSON body sent as `application/hal+json`.
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, HAL_JSON)], Json(self.0)).into_response()
    }
}
