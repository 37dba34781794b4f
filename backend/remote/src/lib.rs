//! # Remote
//!
//! Typed access to the scheduling backend. Every piece of data lives there,
//! this crate only shapes requests and decodes the parts we read.
//!
//! ## Endpoints
//! - `GET /api/get-user-status`: account status and roles for a bearer token
//! - `POST /api/auth/signin`: trades credentials for a token
//! - `GET|POST /api/bookings`, `PUT /api/bookings/:id`: student and mentor sessions
//! - `GET /api/slots?mentor=&status=Open`: bookable mentor slots
//! - `POST /api/mentors/:id/slots`: publishes a mentor's new availability
//! - `PUT /api/bookings/:id/response`: a mentor accepts or declines a pending request
//! - `GET /api/users`, `PUT|DELETE /api/users/:id`: account administration
//! - `GET|POST /api/meetings`: admin meetings
//!
//! ## Failures
//! No retries. A timeout, a refused connection or any non-2xx answer comes back
//! as a [`RemoteError`] and the caller decides what that means.
use async_trait::async_trait;
use serde_json::Value;

pub mod client;
pub mod error;
pub mod models;

pub use client::HttpBackend;
pub use error::RemoteError;
pub use models::{
    ACCOUNT_STATES, AccountStatus, Booking, BookingUpdate, Meeting, NewSlot, Role, SessionResponse,
    SignIn, SignInResponse, Slot, UserPatch, UserRecord, UserStatus,
};

#[async_trait]
pub trait Backend: Send + Sync {
    async fn user_status(&self, token: &str) -> Result<UserStatus, RemoteError>;

    async fn sign_in(&self, credentials: &SignIn) -> Result<SignInResponse, RemoteError>;

    async fn bookings(&self, token: &str, user_id: &str) -> Result<Vec<Booking>, RemoteError>;

    async fn create_booking(&self, token: &str, booking: &Value) -> Result<Booking, RemoteError>;

    async fn update_booking(
        &self,
        token: &str,
        id: &str,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError>;

    async fn open_slots(&self, token: &str, mentor_id: &str) -> Result<Vec<Slot>, RemoteError>;

    async fn create_slots(
        &self,
        token: &str,
        mentor_id: &str,
        slots: &[NewSlot],
    ) -> Result<Value, RemoteError>;

    async fn respond_to_booking(
        &self,
        token: &str,
        id: &str,
        response: SessionResponse,
    ) -> Result<Booking, RemoteError>;

    async fn users(&self, token: &str) -> Result<Vec<UserRecord>, RemoteError>;

    async fn update_user(
        &self,
        token: &str,
        id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord, RemoteError>;

    async fn delete_user(&self, token: &str, id: &str) -> Result<(), RemoteError>;

    async fn meetings(&self, token: &str) -> Result<Vec<Meeting>, RemoteError>;

    async fn create_meeting(&self, token: &str, meeting: &Meeting) -> Result<Meeting, RemoteError>;
}
