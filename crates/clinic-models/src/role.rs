//! User roles
//!
//! Roles gate what an authenticated user may see. Older tokens carry the
//! role as an integer (0 admin, 1 doctor); both forms are accepted on input.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every appointment
    Admin,
    /// Sees appointments booked with their own profile
    Doctor,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Doctor => f.write_str("doctor"),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(0) => Ok(Role::Admin),
            Raw::Code(1) => Ok(Role::Doctor),
            Raw::Code(other) => Err(de::Error::custom(format!("unknown role code {}", other))),
            Raw::Name(name) => match name.to_ascii_lowercase().as_str() {
                "admin" => Ok(Role::Admin),
                "doctor" => Ok(Role::Doctor),
                _ => Err(de::Error::custom(format!("unknown role '{}'", name))),
            },
        }
    }
}
