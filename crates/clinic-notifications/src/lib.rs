//! # clinic-notifications
//!
//! Outgoing email for the clinic backend.
//!
//! ## Features
//!
//! - [`EmailSender`] abstraction with log and in-memory senders
//! - Appointment confirmation rendering

pub mod appointment;
pub mod email;

pub use appointment::AppointmentMailer;
pub use email::{
    sender_for, EmailAddress, EmailError, EmailMessage, EmailResult, EmailSender, LogEmailSender,
    MemoryEmailSender,
};
