//! # Admin API
//!
//! Account approval, meetings and the session policy. Every route needs an
//! active `ADMIN` account.
//!
//! | route | upstream |
//! |---|---|
//! | `GET /api/admin/users?q=` | `GET /api/users` |
//! | `PUT /api/admin/users/{id}` | `PUT /api/users/{id}` |
//! | `DELETE /api/admin/users/{id}` | `DELETE /api/users/{id}` |
//! | `GET /api/admin/meetings` | `GET /api/meetings` |
//! | `POST /api/admin/meetings` | `POST /api/meetings` |
//! | `GET/PUT /api/admin/session-policy` | none, held in process |
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use remote::{ACCOUNT_STATES, Meeting, Role, UserPatch, UserRecord};
use schedule::{ParseError, SessionPolicy, parse_local_datetime};
use serde::Deserialize;
use serde_json::Map;
use tracing::info;

use crate::{
    error::AppError,
    state::AppState,
    utils::{USER_ID_COOKIE, bearer, cookie_value, require_role},
};

async fn admin_token(state: &AppState, jar: &CookieJar) -> Result<String, AppError> {
    let token = bearer(jar)?;
    require_role(state, &token, Role::Admin).await?;

    Ok(token)
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub q: Option<String>,
}

pub async fn users_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let token = admin_token(&state, &jar).await?;
    let users = state.backend.users(&token).await?;

    let users = match query.q.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => users
            .into_iter()
            .filter(|record| record.matches(term))
            .collect(),
        _ => users,
    };

    Ok(Json(users))
}

/// Normalises the patch before it goes upstream. Status is upper cased and
/// must be one of [`ACCOUNT_STATES`]; an empty role list is refused.
fn checked_patch(mut patch: UserPatch) -> Result<UserPatch, AppError> {
    if patch.is_empty() {
        return Err(AppError::MalformedPayload);
    }

    if let Some(status) = patch.status.take() {
        let status = status.trim().to_ascii_uppercase();
        if !ACCOUNT_STATES.contains(&status.as_str()) {
            return Err(AppError::MalformedPayload);
        }

        patch.status = Some(status);
    }

    if patch.roles.as_ref().is_some_and(Vec::is_empty) {
        return Err(AppError::MalformedPayload);
    }

    Ok(patch)
}

pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserRecord>, AppError> {
    let token = admin_token(&state, &jar).await?;
    let patch = checked_patch(patch)?;

    let updated = state.backend.update_user(&token, &id, &patch).await?;
    info!("Updated user {id} to status {}", updated.status);

    Ok(Json(updated))
}

pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let token = admin_token(&state, &jar).await?;

    state.backend.delete_user(&token, &id).await?;
    info!("Deleted user {id}");

    Ok(StatusCode::NO_CONTENT)
}

/// Most recent first.
pub async fn meetings_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<Meeting>>, AppError> {
    let token = admin_token(&state, &jar).await?;

    let mut meetings = state.backend.meetings(&token).await?;
    meetings.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    Ok(Json(meetings))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date_time: String,
    pub end_date_time: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl MeetingRequest {
    /// Upstream stores a start and a length in minutes rather than an end.
    fn into_meeting(self, created_by: Option<String>) -> Result<Meeting, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::MalformedPayload);
        }

        let start = parse_local_datetime(&self.start_date_time)?;
        let end = parse_local_datetime(&self.end_date_time)?;
        let duration = u32::try_from((end - start).num_minutes())
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                ParseError::InvertedRange(format!(
                    "{} - {}",
                    self.start_date_time, self.end_date_time
                ))
            })?;

        Ok(Meeting {
            id: None,
            title: self.title.trim().to_string(),
            description: self.description,
            start_time: start.format("%Y-%m-%dT%H:%M").to_string(),
            duration,
            labels: self.participants,
            created_by,
            extra: Map::new(),
        })
    }
}

pub async fn create_meeting_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<MeetingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = admin_token(&state, &jar).await?;
    let meeting = request.into_meeting(cookie_value(&jar, USER_ID_COOKIE))?;

    let created = state.backend.create_meeting(&token, &meeting).await?;
    info!("Created meeting `{}` at {}", created.title, created.start_time);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn session_policy_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<SessionPolicy>, AppError> {
    admin_token(&state, &jar).await?;

    Ok(Json(state.session_policy.read().await.clone()))
}

pub async fn update_session_policy_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(policy): Json<SessionPolicy>,
) -> Result<Json<SessionPolicy>, AppError> {
    admin_token(&state, &jar).await?;
    policy.validate()?;

    *state.session_policy.write().await = policy.clone();
    info!("Session policy updated: {policy:?}");

    Ok(Json(policy))
}
