use crate::repository::Store;

pub const EMAIL_IN_USE: &str = "Email already in use";

/// Canonical form used for uniqueness checks, storage and event payloads.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fails fast with a conflict when the normalized email is already taken.
///
/// This is a check-then-act guard, not a lock: the store's unique index
/// stays the source of truth and rejects a racing insert on its own.
pub async fn ensure_unique(store: &dyn Store, email: &str) -> userhub_shared::Result<()> {
    if store.exists_by_email(&normalize(email)).await? {
        userhub_shared::conflict!("{}", EMAIL_IN_USE);
    }

    Ok(())
}
