//! Appointment model

use chrono::{DateTime, NaiveDate, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment request placed by a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,

    /// Booked doctor profile
    pub doctor_info: DocumentId,
    pub appointment_date: NaiveDate,

    pub name: String,
    pub phone: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        doctor_info: DocumentId,
        appointment_date: NaiveDate,
        name: String,
        phone: String,
        email: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_info,
            appointment_date,
            name,
            phone,
            email,
            selected_location: None,
            message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Appointment {
    const COLLECTION: &'static str = "appointments";
    const TYPE_NAME: &'static str = "Appointment";

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

/// Booking input as submitted by the public form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub doctor_info: Option<String>,
    #[serde(alias = "preferredDate")]
    pub appointment_date: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub selected_location: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_date_alias() {
        let json = r#"{"doctorInfo":"x","preferredDate":"2024-05-01","name":"A"}"#;
        let input: NewAppointment = serde_json::from_str(json).unwrap();
        assert_eq!(input.appointment_date.as_deref(), Some("2024-05-01"));
    }
}
