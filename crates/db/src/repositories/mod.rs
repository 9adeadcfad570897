pub mod assignment;
pub mod session;
pub mod time_slot;
pub mod tutor;
