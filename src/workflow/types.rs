use std::fmt;

use serde::{Deserialize, Serialize};

/// Returned when a status, role, action, comment kind or tenant kind string
/// does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseError {}

/// Fold casing and separators so `"submitted-to-state"`, `"Submitted To State"`
/// and `"SUBMITTED_TO_STATE"` all compare equal.
pub(crate) fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// `Display`, `FromStr` and `TryFrom<String>` for a closed enum with `ALL`
/// and `as_str`, parsing through [`normalize`].
macro_rules! string_enum {
    ($ty:ident, $kind:literal) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::workflow::types::ParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::workflow::types::ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = $crate::workflow::types::normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::workflow::types::normalize(v.as_str()) == key)
                    .ok_or_else(|| $crate::workflow::types::ParseError::new($kind, s))
            }
        }
    };
}

pub(crate) use string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum SubmissionStatus {
    Draft,
    SubmittedToState,
    SubmittedToMospiReviewer,
    SubmittedToMospiApprover,
    Approved,
    ReturnedFromMospi,
    RejectedFinal,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 7] = [
        SubmissionStatus::Draft,
        SubmissionStatus::SubmittedToState,
        SubmissionStatus::SubmittedToMospiReviewer,
        SubmissionStatus::SubmittedToMospiApprover,
        SubmissionStatus::Approved,
        SubmissionStatus::ReturnedFromMospi,
        SubmissionStatus::RejectedFinal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "DRAFT",
            SubmissionStatus::SubmittedToState => "SUBMITTED_TO_STATE",
            SubmissionStatus::SubmittedToMospiReviewer => "SUBMITTED_TO_MOSPI_REVIEWER",
            SubmissionStatus::SubmittedToMospiApprover => "SUBMITTED_TO_MOSPI_APPROVER",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::ReturnedFromMospi => "RETURNED_FROM_MOSPI",
            SubmissionStatus::RejectedFinal => "REJECTED_FINAL",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::RejectedFinal)
    }

    /// The role expected to act next. Terminal statuses have no owner.
    pub fn owner_role(&self) -> Option<Role> {
        match self {
            SubmissionStatus::Draft | SubmissionStatus::ReturnedFromMospi => {
                Some(Role::NodalOfficer)
            }
            SubmissionStatus::SubmittedToState => Some(Role::StateApprover),
            SubmissionStatus::SubmittedToMospiReviewer => Some(Role::MospiReviewer),
            SubmissionStatus::SubmittedToMospiApprover => Some(Role::MospiApprover),
            SubmissionStatus::Approved | SubmissionStatus::RejectedFinal => None,
        }
    }

    /// Timestamp column stamped when a submission enters this status.
    pub fn audit_stamp(&self) -> Option<AuditStamp> {
        match self {
            SubmissionStatus::Draft => None,
            SubmissionStatus::SubmittedToState => Some(AuditStamp::Submitted),
            SubmissionStatus::SubmittedToMospiReviewer => Some(AuditStamp::Forwarded),
            SubmissionStatus::SubmittedToMospiApprover
            | SubmissionStatus::ReturnedFromMospi
            | SubmissionStatus::RejectedFinal => Some(AuditStamp::Reviewed),
            SubmissionStatus::Approved => Some(AuditStamp::Approved),
        }
    }
}

string_enum!(SubmissionStatus, "status");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStamp {
    Submitted,
    Forwarded,
    Reviewed,
    Approved,
}

impl AuditStamp {
    pub fn column(&self) -> &'static str {
        match self {
            AuditStamp::Submitted => "submitted_at",
            AuditStamp::Forwarded => "forwarded_at",
            AuditStamp::Reviewed => "reviewed_at",
            AuditStamp::Approved => "approved_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Role {
    NodalOfficer,
    StateApprover,
    MospiReviewer,
    MospiApprover,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::NodalOfficer,
        Role::StateApprover,
        Role::MospiReviewer,
        Role::MospiApprover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::NodalOfficer => "NODAL_OFFICER",
            Role::StateApprover => "STATE_APPROVER",
            Role::MospiReviewer => "MOSPI_REVIEWER",
            Role::MospiApprover => "MOSPI_APPROVER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::NodalOfficer => "Nodal Officer",
            Role::StateApprover => "State Approver",
            Role::MospiReviewer => "MoSPI Reviewer",
            Role::MospiApprover => "MoSPI Approver",
        }
    }

    /// Ministry roles work across every jurisdiction; the others are confined to their own.
    pub fn is_ministry(&self) -> bool {
        matches!(self, Role::MospiReviewer | Role::MospiApprover)
    }
}

string_enum!(Role, "role");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Action {
    Create,
    Edit,
    SubmitToState,
    ForwardToMinistry,
    StateReject,
    FinalReject,
    Resubmit,
    Approve,
    AddComment,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Create,
        Action::Edit,
        Action::SubmitToState,
        Action::ForwardToMinistry,
        Action::StateReject,
        Action::FinalReject,
        Action::Resubmit,
        Action::Approve,
        Action::AddComment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Edit => "edit",
            Action::SubmitToState => "submit-to-state",
            Action::ForwardToMinistry => "forward-to-ministry",
            Action::StateReject => "state-reject",
            Action::FinalReject => "final-reject",
            Action::Resubmit => "resubmit",
            Action::Approve => "approve",
            Action::AddComment => "add-comment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Create => "Create",
            Action::Edit => "Edit",
            Action::SubmitToState => "Submit to State",
            Action::ForwardToMinistry => "Forward",
            Action::StateReject => "Return for Revision",
            Action::FinalReject => "Reject",
            Action::Resubmit => "Resubmit",
            Action::Approve => "Approve",
            Action::AddComment => "Add Comment",
        }
    }

    /// Whether a successful run of this action moves the submission to a new status.
    pub fn changes_status(&self) -> bool {
        matches!(
            self,
            Action::SubmitToState
                | Action::ForwardToMinistry
                | Action::StateReject
                | Action::FinalReject
                | Action::Resubmit
                | Action::Approve
        )
    }

    pub fn requires_comment(&self) -> bool {
        matches!(
            self,
            Action::StateReject | Action::FinalReject | Action::AddComment
        )
    }

    /// Kind recorded for the comment attached to this action.
    pub fn comment_kind(&self) -> CommentKind {
        match self {
            Action::StateReject | Action::FinalReject => CommentKind::Rejection,
            Action::Approve => CommentKind::Approval,
            _ => CommentKind::Comment,
        }
    }
}

string_enum!(Action, "action");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CommentKind {
    #[default]
    Comment,
    Rejection,
    Approval,
}

impl CommentKind {
    pub const ALL: [CommentKind; 3] = [
        CommentKind::Comment,
        CommentKind::Rejection,
        CommentKind::Approval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentKind::Comment => "comment",
            CommentKind::Rejection => "rejection",
            CommentKind::Approval => "approval",
        }
    }
}

string_enum!(CommentKind, "comment kind");
