//! # ClassRota Core
//!
//! Domain models and the tutor rotation engine for recurring class time slots.
//!
//! The engine turns a weekly [`TimeSlotTemplate`](models::time_slot::TimeSlotTemplate)
//! and the tutor assignments attached to it into dated sessions:
//!
//! - **recurrence**: the four rotation policies as one tagged value
//! - **rotation**: picks the tutor owning a given occurrence
//! - **conflict**: checks a tutor's other commitments for overlap
//! - **materializer**: writes sessions for a forward horizon, idempotently
//! - **preview**: the read-only twin of the materializer
//!
//! Storage is reached only through the traits in [`store`], so the engine can
//! run against PostgreSQL, the in-memory store in [`memory`], or the mocks in
//! [`mock`].

pub mod engine;
pub mod errors;
pub mod memory;
pub mod mock;
pub mod models;
pub mod store;
