pub mod assignments;
pub mod health;
pub mod sessions;
pub mod time_slots;
