//! Database entities.

pub mod admin_session;
pub mod content;
pub mod report;
pub mod user;

pub use admin_session::Entity as AdminSession;
pub use content::Entity as Content;
pub use report::Entity as Report;
pub use user::Entity as User;
