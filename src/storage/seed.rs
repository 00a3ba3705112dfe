// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo account seeding.

use crate::auth::password::{hash_password, PasswordHashError};
use crate::auth::Role;

use super::{CredentialRecord, CredentialStore, StoreError};

/// A plaintext account definition used to seed a fresh store.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub username: &'static str,
    pub password: &'static str,
    pub role: &'static str,
    pub full_name: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        username: "admin@example.com",
        password: "Admin123!",
        role: "admin",
        full_name: "Admin User",
    },
    DemoAccount {
        username: "user@example.com",
        password: "User123!",
        role: "user",
        full_name: "Regular User",
    },
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] PasswordHashError),
}

impl DemoAccount {
    /// Hash the password and build the stored record.
    pub fn to_record(&self) -> Result<CredentialRecord, PasswordHashError> {
        Ok(CredentialRecord {
            username: self.username.to_string(),
            hashed_password: hash_password(self.password)?,
            role: Role::from(self.role),
            disabled: false,
            full_name: Some(self.full_name.to_string()),
        })
    }
}

/// Insert the demo accounts that are not present yet.
///
/// Returns how many were added. Existing usernames are left untouched, so
/// running this on every start is safe.
pub fn seed_demo_users(store: &dyn CredentialStore) -> Result<usize, SeedError> {
    let mut added = 0;
    for account in DEMO_ACCOUNTS {
        if store.find_by_username(account.username)?.is_some() {
            tracing::debug!(username = account.username, "Demo account already present");
            continue;
        }
        if store.insert(account.to_record()?)? {
            tracing::info!(username = account.username, role = account.role, "Seeded demo account");
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::storage::{testing::FailingStore, InMemoryCredentialStore};

    #[test]
    fn seeds_both_accounts_once() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(seed_demo_users(&store).unwrap(), 2);
        assert_eq!(seed_demo_users(&store).unwrap(), 0);

        let admin = store.find_by_username("admin@example.com").unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.full_name.as_deref(), Some("Admin User"));
        assert!(verify_password("Admin123!", &admin.hashed_password));

        let user = store.find_by_username("user@example.com").unwrap().unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.disabled);
        assert!(verify_password("User123!", &user.hashed_password));
    }

    #[test]
    fn existing_account_is_not_overwritten() {
        let store = InMemoryCredentialStore::new();
        let mut custom = DEMO_ACCOUNTS[1].to_record().unwrap();
        custom.disabled = true;
        store.insert(custom).unwrap();

        assert_eq!(seed_demo_users(&store).unwrap(), 1);
        assert!(store.find_by_username("user@example.com").unwrap().unwrap().disabled);
    }

    #[test]
    fn store_errors_propagate() {
        assert!(matches!(
            seed_demo_users(&FailingStore),
            Err(SeedError::Store(_))
        ));
    }
}
