//! # Access Gate
//!
//! Runs in front of every page request and answers allow or redirect.
//!
//! ## Flow
//! 1. Public paths pass straight through
//! 2. No `token` cookie: back to `/`
//! 3. Ask the backend for the account status with the token as bearer credential
//! 4. `PENDING`: only the pending approval page
//! 5. `ACTIVE`: several roles need a `selectedRole` cookie naming one of them, otherwise
//!    `/select-role`. The role's prefixes decide the rest, with its default page as fallback
//!
//! Anything that goes wrong on the way resolves to a redirect. A failed status lookup
//! is never retried and never lets the request through.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use remote::{AccountStatus, Backend, RemoteError, Role, UserStatus};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    policy::{PENDING_APPROVAL, ROOT, RouteTable, SELECT_ROLE, is_pending_page, is_public},
    state::AppState,
    utils::{ROLE_COOKIE, TOKEN_COOKIE, cookie_value},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

impl Decision {
    fn redirect(target: &str) -> Self {
        Decision::Redirect(target.to_string())
    }
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("No credential cookie")]
    CredentialMissing,

    #[error("User status unavailable: {0}")]
    UpstreamUnavailable(#[from] RemoteError),

    #[error("Account is not active")]
    AccountDisabled,

    #[error("Active account has no known roles")]
    NoRoles,

    #[error("{role} may not access {path}")]
    RoleMismatch {
        role: Role,
        path: String,
        fallback: String,
    },
}

impl GateError {
    pub fn redirect_target(&self) -> &str {
        match self {
            GateError::RoleMismatch { fallback, .. } => fallback,
            _ => ROOT,
        }
    }

    fn log(&self, path: &str) {
        match self {
            GateError::CredentialMissing => debug!("Gate redirect on {path}: {self}"),
            GateError::UpstreamUnavailable(_) => error!("Gate error on {path}: {self}"),
            _ => warn!("Gate error on {path}: {self}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub token: Option<String>,
    pub selected_role: Option<String>,
}

impl Credentials {
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self {
            token: cookie_value(jar, TOKEN_COOKIE),
            selected_role: cookie_value(jar, ROLE_COOKIE),
        }
    }
}

/// Decides on an already fetched account. No I/O.
pub fn authorize(
    user: &UserStatus,
    selected_role: Option<&str>,
    path: &str,
    routes: &RouteTable,
) -> Result<Decision, GateError> {
    match user.status {
        AccountStatus::Pending if is_pending_page(path) => Ok(Decision::Allow),
        AccountStatus::Pending => Ok(Decision::redirect(PENDING_APPROVAL)),
        AccountStatus::Disabled => Err(GateError::AccountDisabled),
        AccountStatus::Active => {
            let role = match user.roles.as_slice() {
                [] => return Err(GateError::NoRoles),
                [only] => *only,
                _ => {
                    let selected = selected_role
                        .and_then(|name| name.parse::<Role>().ok())
                        .filter(|role| user.has_role(*role));

                    match selected {
                        Some(role) => role,
                        None if path == SELECT_ROLE => return Ok(Decision::Allow),
                        None => return Ok(Decision::redirect(SELECT_ROLE)),
                    }
                }
            };

            if routes.allows(role, path) {
                Ok(Decision::Allow)
            } else {
                Err(GateError::RoleMismatch {
                    role,
                    path: path.to_string(),
                    fallback: routes.default_path(role).to_string(),
                })
            }
        }
    }
}

async fn resolve(
    path: &str,
    credentials: &Credentials,
    backend: &dyn Backend,
    routes: &RouteTable,
) -> Result<Decision, GateError> {
    let token = credentials
        .token
        .as_deref()
        .ok_or(GateError::CredentialMissing)?;

    let user = backend.user_status(token).await?;

    authorize(&user, credentials.selected_role.as_deref(), path, routes)
}

pub async fn evaluate(
    path: &str,
    credentials: &Credentials,
    backend: &dyn Backend,
    routes: &RouteTable,
) -> Decision {
    if is_public(path) {
        return Decision::Allow;
    }

    resolve(path, credentials, backend, routes)
        .await
        .unwrap_or_else(|e| {
            e.log(path);
            Decision::redirect(e.redirect_target())
        })
}

pub async fn gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let credentials = Credentials::from_jar(&jar);

    match evaluate(&path, &credentials, state.backend.as_ref(), &state.routes).await {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(target) => Redirect::temporary(&target).into_response(),
    }
}
