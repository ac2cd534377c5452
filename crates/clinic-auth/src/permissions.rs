//! The authenticated principal
//!
//! Access is role based: administrators manage everything, doctors see the
//! appointments booked against their own profile.

use clinic_models::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(id, email, Role::Admin)
    }

    pub fn doctor(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(id, email, Role::Doctor)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
