// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization middleware for Axum.
//!
//! Guards a whole router subtree instead of individual handlers. The
//! middleware runs the chain up to its [`Requirement`] (at least the active
//! gate) and attaches the passed [`Active`] state to the request, where the
//! extractors in `extractor.rs` pick it up without re-validating.
//!
//! ```rust,ignore
//! let admin_routes = Router::new()
//!     .route("/reports", get(reports))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         GateLayer::role(state.clone(), Role::Admin),
//!         require_gates,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::gates::{self, Active, Requirement};
use super::Role;
use crate::state::AppState;

/// Middleware state: application state plus the depth to enforce.
#[derive(Clone)]
pub struct GateLayer {
    state: AppState,
    role: Option<Role>,
}

impl GateLayer {
    /// Require an enabled account.
    pub fn active(state: AppState) -> Self {
        Self { state, role: None }
    }

    /// Require an enabled account holding `role`.
    pub fn role(state: AppState, role: Role) -> Self {
        Self {
            state,
            role: Some(role),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match &self.role {
            Some(role) => Requirement::Role(role.clone()),
            None => Requirement::Active,
        }
    }
}

/// Authorization middleware function.
pub async fn require_gates(
    State(layer): State<GateLayer>,
    mut request: Request,
    next: Next,
) -> Response {
    // The request body is not `Sync`; no borrow of the request may cross an await.
    let token = match gates::bearer_token(request.headers()) {
        Ok(token) => token.to_owned(),
        Err(e) => return e.into_response(),
    };

    let requirement = layer.requirement();
    let result = async {
        let active: Active = gates::identify(&layer.state.tokens, &layer.state.store, &token)
            .await?
            .require_active()?;
        if let Requirement::Role(role) = &requirement {
            active.clone().require_role(role)?;
        }
        Ok::<_, super::AuthError>(active)
    }
    .await;

    match result {
        Ok(active) => {
            tracing::debug!(
                username = %active.user().username,
                requirement = ?requirement,
                "Request passed authorization gates"
            );
            request.extensions_mut().insert(active);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
