// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_gates, AuthenticatedUser, GateLayer, Role},
    models::{ErrorResponse, InfoResponse, LoginRequest, TokenResponse},
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod users;

/// Build the application router.
///
/// `cors_origins` empty means any origin (without credentials).
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let admin_routes = Router::new()
        .route("/reports", get(admin::get_reports))
        .route_layer(middleware::from_fn_with_state(
            GateLayer::role(state.clone(), Role::Admin),
            require_gates,
        ));

    let user_routes = Router::new()
        .route("/me", get(users::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            GateLayer::active(state.clone()),
            require_gates,
        ));

    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/info", get(health::info))
        .nest("/users", user_routes)
        .nest("/admin", admin_routes);

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(cors_origins)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let restricted = !parsed.is_empty();
    let allow_origin = if restricted {
        tracing::info!(count = parsed.len(), "CORS restricted to configured origins");
        AllowOrigin::list(parsed)
    } else {
        tracing::warn!("No CORS origins configured, allowing any origin");
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        // Wildcard origins cannot carry credentials
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// Registers the `bearer` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        health::info,
        health::liveness,
        health::readiness,
        users::get_current_user,
        admin::get_reports
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            InfoResponse,
            ErrorResponse,
            AuthenticatedUser,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential exchange"),
        (name = "Info", description = "Public service information"),
        (name = "Users", description = "Current user"),
        (name = "Admin", description = "Admin-only endpoints"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
