//! Submission approval workflow: who may do what, from which status, and how
//! a permitted action is carried out.
//!
//! The tables ([`PermissionTable`], [`TransitionTable`], [`WorkflowPolicy`])
//! are plain data built at startup. [`ActionExecutor`] is the only piece with
//! side effects, and it reaches the outside world through the
//! [`SubmissionBackend`] and [`NotificationSink`] traits.

pub mod backend;
pub mod executor;
pub mod notify;
pub mod permissions;
pub mod policy;
pub mod presentation;
pub mod store;
pub mod transitions;
pub mod types;
pub mod visibility;

pub use backend::{BackendError, NewComment, StatusUpdate, SubmissionBackend};
pub use executor::{ActionContext, ActionData, ActionExecutor, ActionOutcome, WorkflowErrorKind};
pub use notify::{Notice, NoticeBuffer, NoticeLevel, NotificationSink};
pub use permissions::PermissionTable;
pub use policy::{PolicyError, Rule, WorkflowPolicy};
pub use store::PgSubmissionStore;
pub use transitions::TransitionTable;
pub use types::{Action, AuditStamp, CommentKind, ParseError, Role, SubmissionStatus};
