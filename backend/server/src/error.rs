use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use remote::RemoteError;
use schedule::{ParseError, SlotError};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Not signed in")]
    Unauthorized,

    #[error("Role {0} is not assigned to this account")]
    Forbidden(String),

    #[error("Session {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Booking limit of {0} sessions reached")]
    BookingLimit(usize),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] RemoteError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedPayload | AppError::Parse(_) | AppError::Slot(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::BookingLimit(_) => StatusCode::CONFLICT,
            AppError::Upstream(e) => match e.status() {
                Some(401 | 403) => StatusCode::UNAUTHORIZED,
                Some(404) => StatusCode::NOT_FOUND,
                _ => {
                    error!("{self}");
                    StatusCode::BAD_GATEWAY
                }
            },
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::BookingLimit(105), StatusCode::CONFLICT),
            (
                AppError::Parse(ParseError::Date("x".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Upstream(RemoteError::Status(403)),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Upstream(RemoteError::Status(500)),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
