use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Local, NaiveDate, NaiveDateTime};
use remote::{AccountStatus, Role, UserStatus};

use crate::{error::AppError, state::AppState};

pub const TOKEN_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "selectedRole";
pub const USER_ID_COOKIE: &str = "userId";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Cookie value, with empty values treated as absent.
pub fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn bearer(jar: &CookieJar) -> Result<String, AppError> {
    cookie_value(jar, TOKEN_COOKIE).ok_or(AppError::Unauthorized)
}

/// Token plus the user id the backend keys bookings by.
pub fn identity(jar: &CookieJar) -> Result<(String, String), AppError> {
    let token = bearer(jar)?;
    let user_id = cookie_value(jar, USER_ID_COOKIE).ok_or(AppError::Unauthorized)?;

    Ok((token, user_id))
}

/// Active account holding `role`, checked against the backend on every call.
///
/// `/api` routes are public to the gate, so this is their role check.
pub async fn require_role(
    state: &AppState,
    token: &str,
    role: Role,
) -> Result<UserStatus, AppError> {
    let user = state.backend.user_status(token).await?;

    if user.status != AccountStatus::Active || !user.has_role(role) {
        return Err(AppError::Forbidden(role.to_string()));
    }

    Ok(user)
}

/// The token cookie is HttpOnly and strict; the others stay readable by the pages.
pub fn build_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    let is_token = name == TOKEN_COOKIE;
    let same_site = if is_token {
        SameSite::Strict
    } else {
        SameSite::Lax
    };

    Cookie::build((name, value))
        .path("/")
        .same_site(same_site)
        .http_only(is_token)
        .secure(secure)
        .build()
}

pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cookie_is_absent() {
        let jar = CookieJar::new()
            .add(Cookie::new(TOKEN_COOKIE, "  "))
            .add(Cookie::new(USER_ID_COOKIE, "u1"));

        assert_eq!(cookie_value(&jar, TOKEN_COOKIE), None);
        assert_eq!(cookie_value(&jar, USER_ID_COOKIE).as_deref(), Some("u1"));
        assert!(matches!(identity(&jar), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_token_cookie_is_strict() {
        let cookie = build_cookie(TOKEN_COOKIE, "abc".to_string(), true);

        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        let role = build_cookie(ROLE_COOKIE, "MENTOR".to_string(), false);
        assert_eq!(role.same_site(), Some(SameSite::Lax));
        assert_ne!(role.http_only(), Some(true));
    }
}
