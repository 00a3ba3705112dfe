// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{Authenticator, TokenCodec};
use crate::storage::CredentialStore;

/// Shared handler state. Cloning is cheap; everything sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub tokens: Arc<TokenCodec>,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenCodec) -> Self {
        Self {
            authenticator: Authenticator::new(Arc::clone(&store)),
            store,
            tokens: Arc::new(tokens),
        }
    }
}
