pub mod audit_event;
pub mod refresh_token;
pub mod submission;
pub mod tenant;
pub mod user;

pub use audit_event::AuditEvent;
pub use submission::{ReviewComment, Submission};
pub use refresh_token::RefreshToken;
pub use tenant::{Tenant, TenantKind};
pub use user::User;
