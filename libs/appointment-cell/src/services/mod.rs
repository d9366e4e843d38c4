// libs/appointment-cell/src/services/mod.rs

pub mod lifecycle;
pub mod matching;
pub mod templates;

pub use lifecycle::AppointmentLifecycleService;
pub use matching::DoctorMatchingService;
