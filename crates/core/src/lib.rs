//! Business logic for civimod: sessions, sanctions, reports, and the
//! moderation workflow.

pub mod services;

pub use services::*;
