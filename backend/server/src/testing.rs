use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use remote::{
    AccountStatus, Backend, Booking, BookingUpdate, Meeting, NewSlot, RemoteError, Role,
    SessionResponse, SignIn, SignInResponse, Slot, UserPatch, UserRecord, UserStatus,
};
use schedule::BookingStatus;
use serde_json::{Map, Value, json};

/// In-memory backend for gate and handler tests.
#[derive(Default)]
pub struct FakeBackend {
    user: Option<UserStatus>,
    bookings: Mutex<Vec<Booking>>,
    slots: Vec<Slot>,
    published: Mutex<Vec<NewSlot>>,
    users: Mutex<Vec<UserRecord>>,
    meetings: Mutex<Vec<Meeting>>,
    status_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_user(user: UserStatus) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
            ..self
        }
    }

    pub fn with_slots(self, slots: Vec<Slot>) -> Self {
        Self { slots, ..self }
    }

    pub fn with_users(self, users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
            ..self
        }
    }

    pub fn with_meetings(self, meetings: Vec<Meeting>) -> Self {
        Self {
            meetings: Mutex::new(meetings),
            ..self
        }
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn stored_bookings(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<NewSlot> {
        self.published.lock().unwrap().clone()
    }

    pub fn stored_users(&self) -> Vec<UserRecord> {
        self.users.lock().unwrap().clone()
    }

    pub fn stored_meetings(&self) -> Vec<Meeting> {
        self.meetings.lock().unwrap().clone()
    }
}

pub fn user(status: AccountStatus, roles: &[Role]) -> UserStatus {
    UserStatus {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        status,
        roles: roles.to_vec(),
    }
}

pub fn slot(date: &str, time: &str) -> Slot {
    Slot {
        id: None,
        date: date.to_string(),
        time: time.to_string(),
        extra: Map::new(),
    }
}

pub fn record(id: &str, name: &str, status: &str, roles: &[&str]) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        status: status.to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        extra: Map::new(),
    }
}

pub fn meeting(title: &str, start_time: &str) -> Meeting {
    Meeting {
        id: Some(title.to_lowercase()),
        title: title.to_string(),
        description: String::new(),
        start_time: start_time.to_string(),
        duration: 30,
        labels: Vec::new(),
        created_by: None,
        extra: Map::new(),
    }
}

pub fn booking(id: &str, status: &str, date: &str, time: &str) -> Booking {
    Booking {
        id: id.to_string(),
        status: status.to_string(),
        slot: slot(date, time),
        extra: Map::new(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn user_status(&self, _token: &str) -> Result<UserStatus, RemoteError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.user.clone().ok_or(RemoteError::Status(503))
    }

    async fn sign_in(&self, _credentials: &SignIn) -> Result<SignInResponse, RemoteError> {
        match self.user {
            Some(_) => Ok(SignInResponse {
                token: "fresh-token".to_string(),
                user_id: Some("u1".to_string()),
            }),
            None => Err(RemoteError::Status(401)),
        }
    }

    async fn bookings(&self, _token: &str, _user_id: &str) -> Result<Vec<Booking>, RemoteError> {
        Ok(self.stored_bookings())
    }

    async fn create_booking(&self, _token: &str, booking: &Value) -> Result<Booking, RemoteError> {
        let booking: Booking =
            serde_json::from_value(booking.clone()).map_err(|_| RemoteError::Status(400))?;
        self.bookings.lock().unwrap().push(booking.clone());

        Ok(booking)
    }

    async fn update_booking(
        &self,
        _token: &str,
        id: &str,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|booking| booking.id == id)
            .ok_or(RemoteError::Status(404))?;

        booking.status = update.status.to_string();
        if let Some(slot) = &update.slot {
            booking.slot = slot.clone();
        }

        Ok(booking.clone())
    }

    async fn open_slots(&self, _token: &str, _mentor_id: &str) -> Result<Vec<Slot>, RemoteError> {
        Ok(self.slots.clone())
    }

    async fn create_slots(
        &self,
        _token: &str,
        _mentor_id: &str,
        slots: &[NewSlot],
    ) -> Result<Value, RemoteError> {
        self.published.lock().unwrap().extend_from_slice(slots);

        Ok(json!({ "created": slots.len() }))
    }

    async fn respond_to_booking(
        &self,
        _token: &str,
        id: &str,
        response: SessionResponse,
    ) -> Result<Booking, RemoteError> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|booking| booking.id == id)
            .ok_or(RemoteError::Status(404))?;

        let status = match (booking.status.parse(), response) {
            (Ok(BookingStatus::CancellationRequested), SessionResponse::Accept) => {
                BookingStatus::Cancelled
            }
            (Ok(BookingStatus::RescheduleRequested), SessionResponse::Accept) => {
                BookingStatus::Rescheduled
            }
            (Ok(_), SessionResponse::Decline) => BookingStatus::Booked,
            _ => return Err(RemoteError::Status(409)),
        };
        booking.status = status.to_string();

        Ok(booking.clone())
    }

    async fn users(&self, _token: &str) -> Result<Vec<UserRecord>, RemoteError> {
        Ok(self.stored_users())
    }

    async fn update_user(
        &self,
        _token: &str,
        id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord, RemoteError> {
        let mut users = self.users.lock().unwrap();
        let record = users
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RemoteError::Status(404))?;

        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(email) = &patch.email {
            record.email = email.clone();
        }
        if let Some(status) = &patch.status {
            record.status = status.clone();
        }
        if let Some(roles) = &patch.roles {
            record.roles = roles.iter().map(|role| role.to_string()).collect();
        }

        Ok(record.clone())
    }

    async fn delete_user(&self, _token: &str, id: &str) -> Result<(), RemoteError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|record| record.id != id);

        if users.len() == before {
            return Err(RemoteError::Status(404));
        }

        Ok(())
    }

    async fn meetings(&self, _token: &str) -> Result<Vec<Meeting>, RemoteError> {
        Ok(self.stored_meetings())
    }

    async fn create_meeting(
        &self,
        _token: &str,
        meeting: &Meeting,
    ) -> Result<Meeting, RemoteError> {
        let created = Meeting {
            id: Some(format!("meeting-{}", self.stored_meetings().len() + 1)),
            ..meeting.clone()
        };
        self.meetings.lock().unwrap().push(created.clone());

        Ok(created)
    }
}
