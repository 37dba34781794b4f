use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    Backend,
    error::RemoteError,
    models::{
        Booking, BookingUpdate, Meeting, NewSlot, SessionResponse, SignIn, SignInResponse, Slot,
        UserPatch, UserRecord, UserStatus,
    },
};

pub const USER_STATUS_PATH: &str = "/api/get-user-status";
pub const SIGN_IN_PATH: &str = "/api/auth/signin";
pub const BOOKINGS_PATH: &str = "/api/bookings";
pub const SLOTS_PATH: &str = "/api/slots";
pub const MENTORS_PATH: &str = "/api/mentors";
pub const USERS_PATH: &str = "/api/users";
pub const MEETINGS_PATH: &str = "/api/meetings";

/// The meetings endpoints wrap their payload in an object.
#[derive(Deserialize)]
struct MeetingList {
    meetings: Vec<Meeting>,
}

#[derive(Deserialize)]
struct CreatedMeeting {
    meeting: Meeting,
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn dispatch(request: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        debug!("Upstream rejected request with {status}");
        return Err(RemoteError::Status(status.as_u16()));
    }

    Ok(response)
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    Ok(dispatch(request).await?.json().await?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn user_status(&self, token: &str) -> Result<UserStatus, RemoteError> {
        send(self.client.get(self.url(USER_STATUS_PATH)).bearer_auth(token)).await
    }

    async fn sign_in(&self, credentials: &SignIn) -> Result<SignInResponse, RemoteError> {
        send(self.client.post(self.url(SIGN_IN_PATH)).json(credentials)).await
    }

    async fn bookings(&self, token: &str, user_id: &str) -> Result<Vec<Booking>, RemoteError> {
        send(
            self.client
                .get(self.url(BOOKINGS_PATH))
                .query(&[("user", user_id)])
                .bearer_auth(token),
        )
        .await
    }

    async fn create_booking(&self, token: &str, booking: &Value) -> Result<Booking, RemoteError> {
        send(
            self.client
                .post(self.url(BOOKINGS_PATH))
                .json(booking)
                .bearer_auth(token),
        )
        .await
    }

    async fn update_booking(
        &self,
        token: &str,
        id: &str,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError> {
        let path = format!("{BOOKINGS_PATH}/{id}");

        send(
            self.client
                .put(self.url(&path))
                .json(update)
                .bearer_auth(token),
        )
        .await
    }

    async fn open_slots(&self, token: &str, mentor_id: &str) -> Result<Vec<Slot>, RemoteError> {
        send(
            self.client
                .get(self.url(SLOTS_PATH))
                .query(&[("mentor", mentor_id), ("status", "Open")])
                .bearer_auth(token),
        )
        .await
    }

    async fn create_slots(
        &self,
        token: &str,
        mentor_id: &str,
        slots: &[NewSlot],
    ) -> Result<Value, RemoteError> {
        let path = format!("{MENTORS_PATH}/{mentor_id}/slots");

        send(
            self.client
                .post(self.url(&path))
                .json(slots)
                .bearer_auth(token),
        )
        .await
    }

    async fn respond_to_booking(
        &self,
        token: &str,
        id: &str,
        response: SessionResponse,
    ) -> Result<Booking, RemoteError> {
        let path = format!("{BOOKINGS_PATH}/{id}/response");

        send(
            self.client
                .put(self.url(&path))
                .json(&json!({ "response": response }))
                .bearer_auth(token),
        )
        .await
    }

    async fn users(&self, token: &str) -> Result<Vec<UserRecord>, RemoteError> {
        send(self.client.get(self.url(USERS_PATH)).bearer_auth(token)).await
    }

    async fn update_user(
        &self,
        token: &str,
        id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord, RemoteError> {
        let path = format!("{USERS_PATH}/{id}");

        send(
            self.client
                .put(self.url(&path))
                .json(patch)
                .bearer_auth(token),
        )
        .await
    }

    async fn delete_user(&self, token: &str, id: &str) -> Result<(), RemoteError> {
        let path = format!("{USERS_PATH}/{id}");

        dispatch(self.client.delete(self.url(&path)).bearer_auth(token)).await?;
        Ok(())
    }

    async fn meetings(&self, token: &str) -> Result<Vec<Meeting>, RemoteError> {
        let list: MeetingList =
            send(self.client.get(self.url(MEETINGS_PATH)).bearer_auth(token)).await?;

        Ok(list.meetings)
    }

    async fn create_meeting(&self, token: &str, meeting: &Meeting) -> Result<Meeting, RemoteError> {
        let created: CreatedMeeting = send(
            self.client
                .post(self.url(MEETINGS_PATH))
                .json(meeting)
                .bearer_auth(token),
        )
        .await?;

        Ok(created.meeting)
    }
}
