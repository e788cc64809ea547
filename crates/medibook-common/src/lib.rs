pub mod models;

// Re-export commonly used items
pub use models::appointment::{AppointmentStatus, DoctorSnapshot, PatientSnapshot, Role};
pub use models::auth::Claims;
pub use models::notification::{drain_into_seen, Notification};
