mod command;
mod email;
mod mapper;
mod model;
pub mod publisher;
pub mod repository;

pub use command::*;
pub use email::{EMAIL_IN_USE, ensure_unique, normalize};
pub use mapper::UserResponse;
pub use model::{NewUser, User};
