// =====================================================================================
// NOTIFICATION CELL - TRANSACTIONAL EMAIL DELIVERY
// =====================================================================================
//
// This cell wraps the hospital's transactional mail provider behind a small
// client so the other cells can send booking and status emails without
// knowing anything about the provider's HTTP surface.
//
// =====================================================================================

pub mod models;
pub mod services;

pub use models::{EmailMessage, MailError, MailSendResponse};
pub use services::mailer::MailerClient;
