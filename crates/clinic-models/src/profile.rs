//! Doctor profile model
//!
//! A profile describes one doctor and the chambers (locations) where they
//! consult. Blog authorship and appointment scoping both resolve a profile
//! through its email address.

use chrono::{DateTime, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachment::Attachment;

/// One consultation location with its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chamber {
    pub location: String,
    /// Phone number for serial booking at this location
    pub appointment_number: String,
    /// Weekdays with consultations, 0 = Sunday
    pub consultation_days: Vec<u8>,
    pub consultation_time: String,
}

impl Chamber {
    pub fn consults_on(&self, weekday: u8) -> bool {
        self.consultation_days.contains(&weekday)
    }
}

/// Doctor profile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,

    #[serde(default)]
    pub profile_photo: Vec<Attachment>,

    pub name: String,
    pub designation: String,
    pub email: String,
    pub phone: String,
    pub whats_app: String,
    pub details_info: String,

    #[serde(alias = "locations")]
    pub chambers: Vec<Chamber>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build a profile from validated input
    pub fn from_input(input: NewProfile, chambers: Vec<Chamber>, photo: Vec<Attachment>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            profile_photo: photo,
            name: input.name.unwrap_or_default().trim().to_string(),
            designation: input.designation.unwrap_or_default().trim().to_string(),
            email: input.email.unwrap_or_default().trim().to_string(),
            phone: input.phone.unwrap_or_default().trim().to_string(),
            whats_app: input.whats_app.unwrap_or_default().trim().to_string(),
            details_info: input.details_info.unwrap_or_default().trim().to_string(),
            chambers,
            created_at: now,
            updated_at: now,
        }
    }

    /// Doctor has a chamber consulting on the given weekday (0 = Sunday)
    pub fn available_on(&self, weekday: u8) -> bool {
        self.chambers.iter().any(|c| c.consults_on(weekday))
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.profile_photo.first().map(|p| p.url.as_str())
    }
}

impl Document for Profile {
    const COLLECTION: &'static str = "profiles";
    const TYPE_NAME: &'static str = "Profile";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Raw chamber entry from a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChamberInput {
    pub location: Option<String>,
    pub appointment_number: Option<String>,
    #[serde(default)]
    pub consultation_days: Vec<u8>,
    pub consultation_time: Option<String>,
}

impl ChamberInput {
    /// Convert an entry that already passed validation
    pub fn into_chamber(self) -> Chamber {
        let mut days = self.consultation_days;
        days.sort_unstable();
        days.dedup();
        Chamber {
            location: self.location.unwrap_or_default().trim().to_string(),
            appointment_number: self.appointment_number.unwrap_or_default().trim().to_string(),
            consultation_days: days,
            consultation_time: self.consultation_time.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Profile creation input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whats_app: Option<String>,
    pub details_info: Option<String>,
    #[serde(default, alias = "locations")]
    pub chambers: Vec<ChamberInput>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "locations")]
    pub chambers: Option<Vec<ChamberInput>>,
}

impl ProfileChanges {
    /// Apply validated changes
    pub fn apply_to(self, profile: &mut Profile) {
        let set = |target: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        };
        set(&mut profile.name, self.name);
        set(&mut profile.designation, self.designation);
        set(&mut profile.email, self.email);
        set(&mut profile.phone, self.phone);
        set(&mut profile.whats_app, self.whats_app);
        set(&mut profile.details_info, self.details_info);
        if let Some(chambers) = self.chambers {
            profile.chambers = chambers.into_iter().map(ChamberInput::into_chamber).collect();
        }
    }
}
