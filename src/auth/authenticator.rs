// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password authentication against the credential store.

use std::sync::Arc;

use super::password::{verify_password, DUMMY_HASH};
use crate::storage::{CredentialRecord, CredentialStore, StoreResult};

/// Turns a username/password pair into a verified record.
///
/// The `disabled` flag is not checked here. A disabled account still
/// authenticates and is stopped by the active gate instead.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Returns the record when the password matches, `None` otherwise.
    ///
    /// Unknown usernames still run one verification against a dummy hash so
    /// both failure paths cost the same. Store errors propagate.
    ///
    /// Blocking: performs a store read and a full key derivation.
    pub fn authenticate(&self, username: &str, password: &str) -> StoreResult<Option<CredentialRecord>> {
        match self.store.find_by_username(username)? {
            Some(record) if verify_password(password, &record.hashed_password) => Ok(Some(record)),
            Some(_) => Ok(None),
            None => {
                let _ = verify_password(password, DUMMY_HASH);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{password::hash_password, Role};
    use crate::storage::{testing::FailingStore, InMemoryCredentialStore, StoreError};

    fn authenticator() -> Authenticator {
        let records = [
            ("admin@example.com", "Admin123!", Role::Admin, false),
            ("user@example.com", "User123!", Role::User, false),
            ("off@example.com", "Off123!", Role::User, true),
        ]
        .map(|(username, password, role, disabled)| CredentialRecord {
            username: username.to_string(),
            hashed_password: hash_password(password).unwrap(),
            role,
            disabled,
            full_name: None,
        });
        Authenticator::new(Arc::new(InMemoryCredentialStore::with_records(records)))
    }

    #[test]
    fn matching_password_returns_record_with_role() {
        let auth = authenticator();

        let admin = auth.authenticate("admin@example.com", "Admin123!").unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);

        let user = auth.authenticate("user@example.com", "User123!").unwrap().unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let auth = authenticator();

        let wrong_password = auth.authenticate("user@example.com", "wrong").unwrap();
        let unknown_user = auth.authenticate("ghost@example.com", "User123!").unwrap();
        assert_eq!(wrong_password, None);
        assert_eq!(wrong_password, unknown_user);
    }

    #[test]
    fn disabled_account_still_authenticates() {
        let record = authenticator()
            .authenticate("off@example.com", "Off123!")
            .unwrap()
            .unwrap();
        assert!(record.disabled);
    }

    #[test]
    fn store_failure_is_not_treated_as_unknown_user() {
        let auth = Authenticator::new(Arc::new(FailingStore));
        assert!(matches!(
            auth.authenticate("user@example.com", "User123!"),
            Err(StoreError::Unavailable(_))
        ));
    }
}
