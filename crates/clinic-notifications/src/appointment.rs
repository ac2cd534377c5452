//! Appointment confirmation mail
//!
//! Goes to the patient, with the booked doctor in CC.

use std::sync::Arc;

use clinic_core::config::EmailConfig;
use clinic_models::{Appointment, Profile};
use tracing::{info, instrument};

use crate::email::{EmailAddress, EmailMessage, EmailResult, EmailSender};

pub struct AppointmentMailer {
    sender: Arc<dyn EmailSender>,
    from: EmailAddress,
    clinic_name: String,
}

impl AppointmentMailer {
    pub fn new(sender: Arc<dyn EmailSender>, config: &EmailConfig, clinic_name: &str) -> Self {
        Self {
            sender,
            from: EmailAddress::new(config.from_address.clone()).with_name(config.from_name.clone()),
            clinic_name: clinic_name.to_string(),
        }
    }

    pub fn render(&self, appointment: &Appointment, doctor: &Profile) -> EmailMessage {
        let date = appointment.appointment_date.format("%A, %d %B %Y").to_string();
        let subject = format!(
            "[{}] Appointment request with {} on {}",
            self.clinic_name, doctor.name, date
        );

        let mut text = format!(
            "Dear {},\n\nWe have received your appointment request.\n\n\
             Doctor: {} ({})\nDate: {}\n",
            appointment.name, doctor.name, doctor.designation, date
        );
        if let Some(location) = &appointment.selected_location {
            text.push_str(&format!("Location: {}\n", location));
        }
        text.push_str(&format!("Phone: {}\n", appointment.phone));
        if let Some(message) = &appointment.message {
            text.push_str(&format!("\nYour message:\n{}\n", message));
        }
        text.push_str(&format!(
            "\nThe chamber will contact you to confirm the time.\n\n{}\n",
            self.clinic_name
        ));

        let mut html = format!(
            "<p>Dear {},</p><p>We have received your appointment request.</p><table>\
             <tr><td>Doctor</td><td>{} ({})</td></tr><tr><td>Date</td><td>{}</td></tr>",
            escape(&appointment.name),
            escape(&doctor.name),
            escape(&doctor.designation),
            date
        );
        if let Some(location) = &appointment.selected_location {
            html.push_str(&format!("<tr><td>Location</td><td>{}</td></tr>", escape(location)));
        }
        html.push_str(&format!(
            "<tr><td>Phone</td><td>{}</td></tr></table>",
            escape(&appointment.phone)
        ));
        if let Some(message) = &appointment.message {
            html.push_str(&format!("<blockquote>{}</blockquote>", escape(message)));
        }
        html.push_str(&format!(
            "<p>The chamber will contact you to confirm the time.</p><p>{}</p>",
            escape(&self.clinic_name)
        ));

        EmailMessage::new(
            self.from.clone(),
            vec![EmailAddress::new(appointment.email.clone()).with_name(appointment.name.clone())],
            subject,
            text,
        )
        .cc(vec![EmailAddress::new(doctor.email.clone()).with_name(doctor.name.clone())])
        .with_html(html)
    }

    #[instrument(skip_all, fields(appointment = %appointment.id))]
    pub async fn send_confirmation(
        &self,
        appointment: &Appointment,
        doctor: &Profile,
    ) -> EmailResult<String> {
        let message = self.render(appointment, doctor);
        let id = self.sender.send(&message).await?;
        info!(message_id = %id, "Appointment confirmation sent");
        Ok(id)
    }
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
