use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use remote::{Booking, BookingUpdate, NewSlot, Role, SessionResponse, SignIn, Slot, UserStatus};
use schedule::{
    BookingStatus, DateGroup, Day, GeneratedSlot, SessionPolicy, SessionWindow, Tab, UiState,
    Window, current_week, format_date, generate_slots, group_by_date, next_weekday,
    parse_clock_time, parse_date, parse_time_range, session_state, upcoming_days,
    within_booking_window,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::AppError,
    state::AppState,
    utils::{
        ROLE_COOKIE, TOKEN_COOKIE, USER_ID_COOKIE, bearer, build_cookie, expired_cookie, identity,
        now, require_role, today,
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<Window>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionView {
    /// Malformed records keep their raw fields plus the parse error for display.
    pub fn describe(booking: Booking, now: NaiveDateTime) -> Self {
        match session_state(&booking.status, &booking.slot.date, &booking.slot.time, now) {
            Ok(state) => Self {
                booking,
                window: Some(state.window),
                ui: Some(state.ui),
                error: None,
            },
            Err(e) => {
                warn!("Session {} is malformed: {e}", booking.id);

                Self {
                    booking,
                    window: None,
                    ui: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Landing {
    pub redirect: String,
    pub user: UserStatus,
}

pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<SignIn>,
) -> Result<impl IntoResponse, AppError> {
    let signed_in = state.backend.sign_in(&credentials).await?;
    let user = state.backend.user_status(&signed_in.token).await?;
    let secure = state.config.secure_cookies;

    let mut jar = jar
        .remove(expired_cookie(ROLE_COOKIE))
        .add(build_cookie(TOKEN_COOKIE, signed_in.token, secure));

    if let Some(user_id) = signed_in.user_id {
        jar = jar.add(build_cookie(USER_ID_COOKIE, user_id, secure));
    }

    info!("Signed in {}", user.email);

    let redirect = state.routes.landing_path(&user).to_string();
    Ok((jar, Json(Landing { redirect, user })))
}

pub async fn sign_out_handler(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(expired_cookie(TOKEN_COOKIE))
        .remove(expired_cookie(ROLE_COOKIE))
        .remove(expired_cookie(USER_ID_COOKIE));

    (StatusCode::NO_CONTENT, jar)
}

#[derive(Debug, Deserialize)]
pub struct RoleSelection {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct SelectedRole {
    pub role: Role,
    pub redirect: String,
}

pub async fn select_role_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(selection): Json<RoleSelection>,
) -> Result<impl IntoResponse, AppError> {
    let token = bearer(&jar)?;
    let role: Role = selection
        .role
        .parse()
        .map_err(|_| AppError::MalformedPayload)?;

    let user = state.backend.user_status(&token).await?;
    if !user.has_role(role) {
        return Err(AppError::Forbidden(role.to_string()));
    }

    let jar = jar.add(build_cookie(
        ROLE_COOKIE,
        role.to_string(),
        state.config.secure_cookies,
    ));
    let redirect = state.routes.default_path(role).to_string();

    Ok((jar, Json(SelectedRole { role, redirect })))
}

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub tab: Option<Tab>,
}

pub async fn sessions_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<SessionsQuery>,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let (token, user_id) = identity(&jar)?;
    let bookings = state.backend.bookings(&token, &user_id).await?;
    let now = now();

    let sessions = bookings
        .into_iter()
        .map(|booking| SessionView::describe(booking, now))
        .filter(|view| {
            query
                .tab
                .is_none_or(|tab| view.window.is_some_and(|window| tab.includes(window)))
        })
        .collect();

    Ok(Json(sessions))
}

pub async fn book_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let (token, user_id) = identity(&jar)?;
    require_role(&state, &token, Role::Student).await?;

    if !request.is_object() {
        return Err(AppError::MalformedPayload);
    }

    let existing = state.backend.bookings(&token, &user_id).await?;
    if existing.len() >= state.config.max_bookings {
        return Err(AppError::BookingLimit(state.config.max_bookings));
    }

    let booking = state.backend.create_booking(&token, &request).await?;
    info!("Booked session {} for {user_id}", booking.id);

    Ok((
        StatusCode::CREATED,
        Json(SessionView::describe(booking, now())),
    ))
}

async fn find_booking(
    state: &AppState,
    token: &str,
    user_id: &str,
    id: &str,
) -> Result<Booking, AppError> {
    state
        .backend
        .bookings(token, user_id)
        .await?
        .into_iter()
        .find(|booking| booking.id == id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let (token, user_id) = identity(&jar)?;
    require_role(&state, &token, Role::Student).await?;

    let booking = find_booking(&state, &token, &user_id, &id).await?;
    let current = session_state(
        &booking.status,
        &booking.slot.date,
        &booking.slot.time,
        now(),
    )?;
    if !current.ui.cancel_allowed {
        return Err(AppError::Conflict(format!(
            "Session {id} cannot be cancelled: {}",
            current.ui.join_label
        )));
    }

    let update = BookingUpdate {
        status: BookingStatus::CancellationRequested,
        slot: None,
    };
    let updated = state.backend.update_booking(&token, &id, &update).await?;
    info!("Cancellation requested for session {id}");

    Ok(Json(SessionView::describe(updated, now())))
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub date: String,
    pub time: String,
}

pub async fn reschedule_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<SessionView>, AppError> {
    let (token, user_id) = identity(&jar)?;
    require_role(&state, &token, Role::Student).await?;
    let now = now();

    let date = parse_date(&request.date)?;
    let range = parse_time_range(&request.time)?;
    if SessionWindow::new(date, range).classify(now) != Window::Upcoming {
        return Err(AppError::Conflict(
            "A session can only be moved to a future slot".to_string(),
        ));
    }

    let booking = find_booking(&state, &token, &user_id, &id).await?;
    let current = session_state(
        &booking.status,
        &booking.slot.date,
        &booking.slot.time,
        now,
    )?;
    if !current.ui.reschedule_allowed {
        return Err(AppError::Conflict(format!(
            "Session {id} cannot be rescheduled: {}",
            current.ui.join_label
        )));
    }

    let update = BookingUpdate {
        status: BookingStatus::RescheduleRequested,
        slot: Some(Slot {
            date: format_date(date),
            time: range.to_string(),
            ..booking.slot
        }),
    };
    let updated = state.backend.update_booking(&token, &id, &update).await?;
    info!("Reschedule requested for session {id}");

    Ok(Json(SessionView::describe(updated, now)))
}

#[derive(Debug, Deserialize)]
pub struct ResponseRequest {
    pub response: SessionResponse,
}

/// Mentor settles a student's pending cancellation or reschedule request.
pub async fn respond_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(request): Json<ResponseRequest>,
) -> Result<Json<SessionView>, AppError> {
    let (token, mentor_id) = identity(&jar)?;
    require_role(&state, &token, Role::Mentor).await?;

    let booking = find_booking(&state, &token, &mentor_id, &id).await?;
    let status: BookingStatus = booking.status.parse()?;
    if !status.is_pending_request() {
        return Err(AppError::Conflict(format!(
            "Session {id} has no pending request"
        )));
    }

    let updated = state
        .backend
        .respond_to_booking(&token, &id, request.response)
        .await?;
    info!(
        "Mentor {mentor_id} answered {status} on session {id}: {:?}",
        request.response
    );

    Ok(Json(SessionView::describe(updated, now())))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub mentor: String,
}

/// Open slots a student may still book, grouped by day.
pub async fn slots_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<DateGroup<Slot>>>, AppError> {
    let token = bearer(&jar)?;
    require_role(&state, &token, Role::Student).await?;

    let slots = state.backend.open_slots(&token, &query.mentor).await?;
    let today = today();

    let bookable = slots.into_iter().filter(|slot| match parse_date(&slot.date) {
        Ok(date) => within_booking_window(date, today, state.config.booking_window_days),
        Err(e) => {
            warn!("Skipping slot for mentor {}: {e}", query.mentor);
            false
        }
    });

    Ok(Json(group_by_date(bookable, |slot| slot.date.as_str())))
}

#[derive(Debug, Deserialize)]
pub struct Availability {
    pub days: Vec<String>,
    pub start: String,
    pub end: String,
    pub duration: Option<u32>,
    #[serde(default)]
    pub buffer: u32,
}

#[derive(Debug, Serialize)]
pub struct PlannedDay {
    pub day: String,
    pub date: String,
    pub slots: Vec<GeneratedSlot>,
}

/// Lays the mentor's availability onto the next occurrence of each chosen weekday.
///
/// Without a duration the whole window becomes a single slot. Days and the
/// number of slots per day must fit the admin's session policy.
pub fn plan_availability(
    availability: &Availability,
    policy: &SessionPolicy,
    today: NaiveDate,
) -> Result<Vec<PlannedDay>, AppError> {
    let duration = match availability.duration {
        Some(duration) => duration,
        None => parse_clock_time(&availability.end)?
            .saturating_sub(parse_clock_time(&availability.start)?),
    };
    let slots = generate_slots(
        &availability.start,
        &availability.end,
        duration,
        availability.buffer,
    )?;

    if slots.len() > policy.max_slots_per_day as usize {
        return Err(AppError::Conflict(format!(
            "{} slots exceed the limit of {} per day",
            slots.len(),
            policy.max_slots_per_day
        )));
    }

    availability
        .days
        .iter()
        .map(|day| {
            let weekday: Weekday = day.parse().map_err(|_| AppError::MalformedPayload)?;
            if !policy.allows_day(weekday) {
                return Err(AppError::Conflict(format!(
                    "Sessions are not offered on {weekday}"
                )));
            }

            Ok(PlannedDay {
                day: weekday.to_string(),
                date: format_date(next_weekday(today, weekday)),
                slots: slots.clone(),
            })
        })
        .collect()
}

pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(availability): Json<Availability>,
) -> Result<Json<Vec<PlannedDay>>, AppError> {
    let token = bearer(&jar)?;
    require_role(&state, &token, Role::Mentor).await?;

    let policy = state.session_policy.read().await;
    Ok(Json(plan_availability(&availability, &policy, today())?))
}

pub async fn publish_slots_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(availability): Json<Availability>,
) -> Result<impl IntoResponse, AppError> {
    let (token, mentor_id) = identity(&jar)?;
    require_role(&state, &token, Role::Mentor).await?;

    let plan = {
        let policy = state.session_policy.read().await;
        plan_availability(&availability, &policy, today())?
    };

    let slots: Vec<NewSlot> = plan
        .into_iter()
        .flat_map(|planned| {
            let mentor_id = mentor_id.clone();

            planned.slots.into_iter().map(move |slot| NewSlot {
                day: planned.day.clone(),
                date: planned.date.clone(),
                start_time: slot.start,
                end_time: slot.end,
                mentor_id: mentor_id.clone(),
            })
        })
        .collect();

    if slots.is_empty() {
        return Err(AppError::MalformedPayload);
    }

    let created = state
        .backend
        .create_slots(&token, &mentor_id, &slots)
        .await?;
    info!("Published {} slots for mentor {mentor_id}", slots.len());

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Serialize)]
pub struct Calendar {
    pub today: String,
    pub week: Vec<Day>,
    pub bookable: Vec<Day>,
}

pub async fn calendar_handler(State(state): State<Arc<AppState>>) -> Json<Calendar> {
    let today = today();

    Json(Calendar {
        today: format_date(today),
        week: current_week(today),
        bookable: upcoming_days(today, state.config.booking_window_days + 1),
    })
}
