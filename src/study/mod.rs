//! Study mode: one card at a time, with wrap-around navigation.

pub mod session;

pub use session::{StudySession, StudySummary};
