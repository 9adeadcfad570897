pub mod calendar;
pub mod conflict;
pub mod materializer;
pub mod preview;
pub mod rotation;
