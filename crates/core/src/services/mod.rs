//! Business logic services.

#![allow(missing_docs)]

pub mod moderation;
pub mod notifier;
pub mod report;
pub mod sanction;
pub mod session;

pub use moderation::{ModerationAction, ModerationOutcome, ModerationService, QueueEntry};
pub use notifier::{LogNotifier, ModerationEvent, Notifier};
pub use report::{ReportAttachment, ReportService, SubmitOutcome, SubmitReportInput};
pub use sanction::{BanInput, SanctionService, ban_active};
pub use session::{SessionCheck, SessionService, hash_password, verify_password};
