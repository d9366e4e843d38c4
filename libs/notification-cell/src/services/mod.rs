// libs/notification-cell/src/services/mod.rs

pub mod mailer;

pub use mailer::MailerClient;
