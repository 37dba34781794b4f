use std::{fmt, str::FromStr};

use schedule::BookingStatus;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Platform roles. UPPERCASE is canonical; upstream casing is normalised on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Role {
    Admin,
    Mentor,
    Student,
    InstructionalAssociate,
    Leadership,
    ExperienceChampion,
    Teacher,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Mentor,
        Role::Student,
        Role::InstructionalAssociate,
        Role::Leadership,
        Role::ExperienceChampion,
        Role::Teacher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Mentor => "MENTOR",
            Role::Student => "STUDENT",
            Role::InstructionalAssociate => "IA",
            Role::Leadership => "LEADERSHIP",
            Role::ExperienceChampion => "EC",
            Role::Teacher => "TEACHER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown role `{s}`"))
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Pending,
    Active,
    /// Anything the backend reports besides pending or active.
    Disabled,
}

impl From<&str> for AccountStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => AccountStatus::Pending,
            "ACTIVE" => AccountStatus::Active,
            _ => AccountStatus::Disabled,
        }
    }
}

#[derive(Deserialize)]
struct RawUserStatus {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Answer of the backend's user status endpoint.
///
/// The backend sends either `roles: [...]` or a single `role`; both end up in `roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserStatus")]
pub struct UserStatus {
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    pub roles: Vec<Role>,
}

impl From<RawUserStatus> for UserStatus {
    fn from(raw: RawUserStatus) -> Self {
        let mut roles = Vec::new();

        for name in raw.roles.iter().chain(raw.role.iter()) {
            match name.parse::<Role>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(e) => warn!("Ignoring role for {}: {e}", raw.email),
            }
        }

        Self {
            status: AccountStatus::from(raw.status.as_str()),
            name: raw.name,
            email: raw.email,
            roles,
        }
    }
}

impl UserStatus {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    #[serde(default, alias = "_id")]
    pub user_id: Option<String>,
}

/// Mentor availability. Fields we do not use are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    /// Kept raw so one bad record does not fail the whole listing.
    pub status: String,
    pub slot: Slot,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Slot a mentor publishes from the availability form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlot {
    pub day: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub mentor_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingUpdate {
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
}

/// Mentor's answer to a cancellation or reschedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionResponse {
    Accept,
    Decline,
}

/// Account states an admin may set. Only `ACTIVE` lets a user past the gate.
pub const ACCOUNT_STATES: [&str; 5] = ["PENDING", "ACTIVE", "VERIFIED", "REJECTED", "BANNED"];

/// User as the admin listing returns it. Status and roles stay raw so the
/// admin sees exactly what the backend holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn account_status(&self) -> AccountStatus {
        AccountStatus::from(self.status.as_str())
    }

    /// Case-insensitive search over name, email, status and roles.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();

        [&self.name, &self.email, &self.status]
            .into_iter()
            .chain(&self.roles)
            .any(|field| field.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.status.is_none() && self.roles.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
