pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::appointment::{AppointmentRepo, AppointmentRow, NewAppointment};
pub use repos::doctor::{DoctorRepo, DoctorRow, NewDoctor};
pub use repos::user::{UserRepo, UserRow};
