//! Database repositories.

mod content;
mod report;
mod session;
mod user;

pub use content::ContentRepository;
pub use report::ReportRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
