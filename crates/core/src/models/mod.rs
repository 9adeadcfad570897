pub mod assignment;
pub mod recurrence;
pub mod session;
pub mod time_slot;
