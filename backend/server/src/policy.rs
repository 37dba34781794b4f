//! # Route Policy
//!
//! Static access table consulted by the gate.
//!
//! ## Public
//! - exact: `/`, `/auth`, `/select-role`
//! - prefixes: `/_next`, `/images`, `/favicon.ico`, `/static`, `/api`
//!
//! `/api` routes check their own credentials.
//!
//! ## Per role
//! | role | prefixes | default |
//! |---|---|---|
//! | ADMIN | `/admin/manage-users`, `/admin/meetings`, `/admin/settings`, `/admin/session-policy` | `/admin/manage-users` |
//! | MENTOR | `/mentor/schedule`, `/mentor/manage-slots` | `/mentor/schedule` |
//! | STUDENT | `/student/slot-booking` | `/student/slot-booking` |
//!
//! Roles without an entry can sign in but reach no page, so they land on `/`.
use std::collections::HashMap;

use remote::{AccountStatus, Role, UserStatus};

pub const ROOT: &str = "/";
pub const SIGN_IN_PAGE: &str = "/auth";
pub const SELECT_ROLE: &str = "/select-role";
pub const PENDING_APPROVAL: &str = "/pending-approval";

const PUBLIC_PATHS: [&str; 3] = [ROOT, SIGN_IN_PAGE, SELECT_ROLE];
const PUBLIC_PREFIXES: [&str; 5] = ["/_next", "/images", "/favicon.ico", "/static", "/api"];

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub fn is_pending_page(path: &str) -> bool {
    path == PENDING_APPROVAL
        || path
            .strip_prefix(PENDING_APPROVAL)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone)]
pub struct RoleRoutes {
    pub prefixes: Vec<String>,
    pub default: String,
}

impl RoleRoutes {
    fn new(prefixes: &[&str], default: &str) -> Self {
        Self {
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
            default: default.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    roles: HashMap<Role, RoleRoutes>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let roles = HashMap::from([
            (
                Role::Admin,
                RoleRoutes::new(
                    &[
                        "/admin/manage-users",
                        "/admin/meetings",
                        "/admin/settings",
                        "/admin/session-policy",
                    ],
                    "/admin/manage-users",
                ),
            ),
            (
                Role::Mentor,
                RoleRoutes::new(
                    &["/mentor/schedule", "/mentor/manage-slots"],
                    "/mentor/schedule",
                ),
            ),
            (
                Role::Student,
                RoleRoutes::new(&["/student/slot-booking"], "/student/slot-booking"),
            ),
        ]);

        Self { roles }
    }
}

impl RouteTable {
    pub fn new(roles: HashMap<Role, RoleRoutes>) -> Self {
        Self { roles }
    }

    pub fn allows(&self, role: Role, path: &str) -> bool {
        self.roles.get(&role).is_some_and(|routes| {
            routes
                .prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
        })
    }

    pub fn default_path(&self, role: Role) -> &str {
        self.roles
            .get(&role)
            .map_or(ROOT, |routes| routes.default.as_str())
    }

    /// Where a freshly signed in user should go.
    pub fn landing_path(&self, user: &UserStatus) -> &str {
        match (user.status, user.roles.as_slice()) {
            (AccountStatus::Pending, _) => PENDING_APPROVAL,
            (AccountStatus::Active, [role]) => self.default_path(*role),
            (AccountStatus::Active, [_, _, ..]) => SELECT_ROLE,
            _ => ROOT,
        }
    }
}
