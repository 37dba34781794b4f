//! Gateway in front of the mentorship scheduling app.
//!
//! # Request Flow
//! - Every request passes the access [`gate`] first
//! - Page requests that survive it are served from the static bundle
//! - `/api` requests skip the gate and check their own cookies and roles
//! - Session and slot data stays upstream; we only derive state from it
//!
//!
//!
//! # Cookies
//!
//! | cookie | set by | read by |
//! |---|---|---|
//! | `token` | sign in | gate, every `/api` route |
//! | `selectedRole` | role selection | gate |
//! | `userId` | sign in | session and slot routes, meeting authorship |
//!
//!
//!
//! # Setup
//!
//! Run against a local backend.
//! ```sh
//! UPSTREAM_URL=http://localhost:4000 RUST_LOG=info cargo run
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{CONTENT_TYPE, COOKIE},
    },
    middleware,
    routing::{get, post, put},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod admin;
pub mod config;
pub mod error;
pub mod gate;
pub mod policy;
pub mod routes;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;

use admin::{
    create_meeting_handler, delete_user_handler, meetings_handler, session_policy_handler,
    update_session_policy_handler, update_user_handler, users_handler,
};
use gate::gate;
use routes::{
    book_handler, calendar_handler, cancel_handler, preview_handler, publish_slots_handler,
    reschedule_handler, respond_handler, select_role_handler, sessions_handler, sign_in_handler,
    sign_out_handler, slots_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, COOKIE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/auth/signin", post(sign_in_handler))
        .route("/auth/signout", post(sign_out_handler))
        .route("/select-role", post(select_role_handler))
        .route("/sessions", get(sessions_handler).post(book_handler))
        .route("/sessions/{id}/cancel", post(cancel_handler))
        .route("/sessions/{id}/reschedule", post(reschedule_handler))
        .route("/sessions/{id}/respond", post(respond_handler))
        .route("/slots", get(slots_handler))
        .route("/slots/preview", post(preview_handler))
        .route("/mentors/slots", post(publish_slots_handler))
        .route("/calendar", get(calendar_handler))
        .route("/admin/users", get(users_handler))
        .route(
            "/admin/users/{id}",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route(
            "/admin/meetings",
            get(meetings_handler).post(create_meeting_handler),
        )
        .route(
            "/admin/session-policy",
            get(session_policy_handler).put(update_session_policy_handler),
        );

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new()?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
