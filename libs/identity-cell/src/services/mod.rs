// libs/identity-cell/src/services/mod.rs

pub mod avatar;
pub mod directory;
pub mod password;
pub mod registration;

pub use avatar::ImageHostClient;
pub use directory::DirectoryService;
pub use registration::RegistrationService;
