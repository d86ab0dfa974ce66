use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use userhub_shared::{Error, Result};

use crate::{NewUser, User, email::EMAIL_IN_USE};

use super::Store;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, User>,
    emails: HashMap<String, i64>,
}

/// Process-local store: an id-keyed table plus a unique email index,
/// both mutated under one write lock so check and write are atomic.
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.table.read().await.emails.contains_key(email))
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut table = self.table.write().await;
        if table.emails.contains_key(&user.email) {
            return Err(Error::Conflict(EMAIL_IN_USE.to_owned()));
        }

        // Ids only ever grow, so a deleted id is never handed out again.
        table.last_id += 1;
        let now = userhub_shared::now();
        let user = User {
            id: table.last_id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: now,
            updated_at: now,
        };

        table.emails.insert(user.email.to_owned(), user.id);
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let mut table = self.table.write().await;
        let Some(current_email) = table.rows.get(&user.id).map(|row| row.email.to_owned()) else {
            userhub_shared::not_found!("User not found");
        };

        if current_email != user.email {
            if table.emails.contains_key(&user.email) {
                return Err(Error::Conflict(EMAIL_IN_USE.to_owned()));
            }

            table.emails.remove(&current_email);
            table.emails.insert(user.email.to_owned(), user.id);
        }

        let Some(row) = table.rows.get_mut(&user.id) else {
            userhub_shared::not_found!("User not found");
        };

        row.name = user.name.to_owned();
        row.email = user.email.to_owned();
        row.age = user.age;
        row.updated_at = userhub_shared::now();

        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let mut table = self.table.write().await;
        let Some(user) = table.rows.remove(&id) else {
            return Ok(false);
        };

        table.emails.remove(&user.email);

        Ok(true)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}
