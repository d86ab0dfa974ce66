use async_trait::async_trait;
use userhub_shared::Result;

use crate::{NewUser, User};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable store owning user records and the email uniqueness invariant.
///
/// Every operation is durable once it returns. Absence is reported as
/// `None`/`false`, never as an error; a write that would duplicate an
/// email fails with [`userhub_shared::Error::Conflict`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// `email` must already be normalized.
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// First save: assigns the id and both timestamps.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Subsequent saves: writes name, email and age, refreshes `updated_at`.
    async fn update(&self, user: &User) -> Result<User>;

    /// Returns `false` when no record had this id.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// All live records in insertion order.
    async fn find_all(&self) -> Result<Vec<User>>;
}
