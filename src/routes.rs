use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, events, rewards};
use crate::middleware::{guard::policy, jwt_auth_middleware, require_roles};
use crate::services::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_auth_routes(state.clone()))
        // Everything below the JWT middleware
        .merge(protected_routes(state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router {
    Router::new()
        .merge(session_routes(state.clone()))
        .merge(event_routes(state.clone()))
        .merge(reward_routes(state))
        .layer(from_fn(jwt_auth_middleware))
}

fn session_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/whoami", get(auth::whoami))
        .merge(
            Router::new()
                .route("/auth/users/:username/roles", put(auth::assign_roles))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::ROLE_ASSIGN, req, next)
                })),
        )
        .with_state(state)
}

fn event_routes(state: AppState) -> Router {
    Router::new()
        .route("/events", get(events::list_events))
        .merge(
            Router::new()
                .route("/events", post(events::create_event))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::EVENT_CREATE, req, next)
                })),
        )
        .merge(
            Router::new()
                .route(
                    "/events/:event_id/attendance",
                    post(events::record_attendance),
                )
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::EVENT_ATTENDANCE, req, next)
                })),
        )
        .with_state(state)
}

fn reward_routes(state: AppState) -> Router {
    Router::new()
        // Any authenticated caller may browse an event's rewards
        .route("/rewards/event/:event_id", get(rewards::list_for_event))
        .merge(
            Router::new()
                .route("/rewards", post(rewards::create_reward))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::REWARD_CREATE, req, next)
                })),
        )
        .merge(
            Router::new()
                .route("/rewards/:reward_id", put(rewards::update_reward))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::REWARD_UPDATE, req, next)
                })),
        )
        .merge(
            Router::new()
                .route("/rewards/request", post(rewards::request_reward))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::REWARD_REQUEST, req, next)
                })),
        )
        .merge(
            Router::new()
                .route("/rewards/status", get(rewards::status_query))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::REWARD_STATUS, req, next)
                })),
        )
        .merge(
            Router::new()
                .route("/rewards/history", get(rewards::claim_history))
                .route_layer(from_fn(|req: Request, next: Next| {
                    require_roles(policy::REWARD_HISTORY, req, next)
                })),
        )
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Gala API",
            "version": version,
            "description": "Event & reward platform API with JWT auth and role-based access control",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public), /auth/whoami (authenticated)",
                "events": "/events (OPERATOR/ADMIN create, any authenticated list)",
                "attendance": "/events/:event_id/attendance (OPERATOR/ADMIN)",
                "rewards": "/rewards (OPERATOR/ADMIN), /rewards/event/:event_id (authenticated)",
                "claims": "/rewards/request (USER), /rewards/status (authenticated, own-id policy)",
                "audit": "/rewards/history (AUDITOR/ADMIN)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
