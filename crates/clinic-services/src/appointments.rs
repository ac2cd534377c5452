//! Appointment booking and listing

use std::sync::Arc;

use clinic_auth::CurrentUser;
use clinic_contracts::appointments::{
    parse_appointment_date, parse_document_id, BookAppointmentContract,
};
use clinic_core::error::ClinicError;
use clinic_core::result::ClinicResult;
use clinic_db::DocumentStore;
use clinic_models::{Appointment, NewAppointment, Profile};
use clinic_notifications::AppointmentMailer;
use tracing::{debug, info, instrument, warn};

use crate::base::{present, validate};

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn DocumentStore<Appointment>>,
    profiles: Arc<dyn DocumentStore<Profile>>,
    mailer: Arc<AppointmentMailer>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn DocumentStore<Appointment>>,
        profiles: Arc<dyn DocumentStore<Profile>>,
        mailer: Arc<AppointmentMailer>,
    ) -> Self {
        Self {
            appointments,
            profiles,
            mailer,
        }
    }

    /// Book an appointment with an existing doctor, then mail a confirmation.
    ///
    /// The confirmation is best effort: a delivery failure is logged and the
    /// booking stands.
    #[instrument(skip_all, fields(doctor = ?input.doctor_info))]
    pub async fn book(&self, input: NewAppointment) -> ClinicResult<Appointment> {
        validate(&BookAppointmentContract, &input)?;

        let doctor_raw = input.doctor_info.as_deref().unwrap_or_default();
        let doctor = match parse_document_id(doctor_raw) {
            Some(id) => self.profiles.find_by_id(id).await?,
            None => None,
        }
        .ok_or_else(|| ClinicError::missing_reference("Doctor not found"))?;

        let date = input
            .appointment_date
            .as_deref()
            .and_then(parse_appointment_date)
            .ok_or_else(|| {
                ClinicError::invalid("appointmentDate", "Appointment date is not a valid date")
            })?;

        let mut appointment = Appointment::new(
            doctor.id,
            date,
            input.name.unwrap_or_default().trim().to_string(),
            input.phone.unwrap_or_default().trim().to_string(),
            input.email.unwrap_or_default().trim().to_string(),
        );
        appointment.selected_location = present(input.selected_location);
        appointment.message = present(input.message);

        self.appointments.insert(&appointment).await?;
        info!(appointment_id = %appointment.id, doctor_id = %doctor.id, "Appointment booked");

        if let Err(e) = self.mailer.send_confirmation(&appointment, &doctor).await {
            warn!(appointment_id = %appointment.id, error = %e, "Confirmation email not sent");
        }

        Ok(appointment)
    }

    /// Administrators see every appointment; doctors see those booked
    /// against the profile carrying their email.
    #[instrument(skip_all, fields(user = %user.id, role = %user.role))]
    pub async fn list_for(&self, user: &CurrentUser) -> ClinicResult<Vec<Appointment>> {
        if user.is_admin() {
            return Ok(self.appointments.find_all().await?);
        }

        let own_profiles = self.profiles.find_where("email", user.email.trim()).await?;
        if own_profiles.is_empty() {
            debug!("No profile linked to this user");
        }

        let mut appointments = Vec::new();
        for profile in own_profiles {
            appointments.extend(
                self.appointments
                    .find_where("doctorInfo", &profile.id.to_string())
                    .await?,
            );
        }
        Ok(appointments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{booking, profile_input, Harness};
    use clinic_notifications::MemoryEmailSender;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_book_sends_confirmation() {
        let h = Harness::new();
        let doctor = h
            .services
            .profiles
            .create(profile_input("dr.a@example.com"), None)
            .await
            .unwrap();

        let appointment = h.services.appointments.book(booking(doctor.id)).await.unwrap();
        assert_eq!(appointment.doctor_info, doctor.id);
        assert_eq!(appointment.selected_location.as_deref(), Some("Dhanmondi"));
        assert_eq!(h.mail.sent().len(), 1);
        assert_eq!(h.mail.sent()[0].cc[0].email, "dr.a@example.com");
    }

    #[tokio::test]
    async fn test_unknown_doctor_is_not_found_and_nothing_written() {
        let h = Harness::new();
        let err = h
            .services
            .appointments
            .book(booking(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(h.stores.appointments.count().await.unwrap(), 0);
        assert!(h.mail.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_booking() {
        let h = Harness::with_mail(MemoryEmailSender::failing());
        let doctor = h
            .services
            .profiles
            .create(profile_input("dr.a@example.com"), None)
            .await
            .unwrap();

        assert!(h.services.appointments.book(booking(doctor.id)).await.is_ok());
        assert_eq!(h.stores.appointments.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_listing_is_role_gated() {
        let h = Harness::new();
        let a = h
            .services
            .profiles
            .create(profile_input("dr.a@example.com"), None)
            .await
            .unwrap();
        let b = h
            .services
            .profiles
            .create(profile_input("dr.b@example.com"), None)
            .await
            .unwrap();
        h.services.appointments.book(booking(a.id)).await.unwrap();
        h.services.appointments.book(booking(b.id)).await.unwrap();
        h.services.appointments.book(booking(b.id)).await.unwrap();

        let admin = CurrentUser::admin("1", "admin@example.com");
        let doctor = CurrentUser::doctor("2", "DR.B@example.com");
        let stranger = CurrentUser::doctor("3", "nobody@example.com");

        assert_eq!(h.services.appointments.list_for(&admin).await.unwrap().len(), 3);
        assert_eq!(h.services.appointments.list_for(&doctor).await.unwrap().len(), 2);
        assert!(h.services.appointments.list_for(&stranger).await.unwrap().is_empty());
    }
}
