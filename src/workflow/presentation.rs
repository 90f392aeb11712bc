use serde::Serialize;

use super::types::{Role, SubmissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

pub const UNKNOWN: StatusDisplay = StatusDisplay {
    label: "Unknown",
    severity: Severity::Neutral,
    description: "This submission is in an unrecognized state.",
};

pub fn describe(status: SubmissionStatus) -> StatusDisplay {
    match status {
        SubmissionStatus::Draft => StatusDisplay {
            label: "Draft",
            severity: Severity::Neutral,
            description: "Being prepared by the nodal officer and not yet sent for review.",
        },
        SubmissionStatus::SubmittedToState => StatusDisplay {
            label: "Pending State Approval",
            severity: Severity::Info,
            description: "Awaiting review by the state approver.",
        },
        SubmissionStatus::SubmittedToMospiReviewer => StatusDisplay {
            label: "Under MoSPI Review",
            severity: Severity::Warning,
            description: "Forwarded to the ministry and awaiting the MoSPI reviewer.",
        },
        SubmissionStatus::SubmittedToMospiApprover => StatusDisplay {
            label: "Pending MoSPI Approval",
            severity: Severity::Warning,
            description: "Reviewed by the ministry and awaiting final approval.",
        },
        SubmissionStatus::Approved => StatusDisplay {
            label: "Approved",
            severity: Severity::Success,
            description: "Accepted by the ministry. No further changes are possible.",
        },
        SubmissionStatus::ReturnedFromMospi => StatusDisplay {
            label: "Returned for Revision",
            severity: Severity::Danger,
            description: "Sent back to the nodal officer with comments for revision.",
        },
        SubmissionStatus::RejectedFinal => StatusDisplay {
            label: "Rejected",
            severity: Severity::Danger,
            description: "Rejected by the ministry. No further changes are possible.",
        },
    }
}

/// Rough position along the approval pipeline, 0 to 100.
pub fn progress(status: SubmissionStatus) -> u8 {
    match status {
        SubmissionStatus::Draft => 10,
        SubmissionStatus::ReturnedFromMospi => 25,
        SubmissionStatus::SubmittedToState => 40,
        SubmissionStatus::SubmittedToMospiReviewer => 60,
        SubmissionStatus::SubmittedToMospiApprover => 80,
        SubmissionStatus::Approved | SubmissionStatus::RejectedFinal => 100,
    }
}

/// Like [`describe`] for an untyped status string; falls back to [`UNKNOWN`].
pub fn describe_raw(raw: &str) -> StatusDisplay {
    raw.parse().map(describe).unwrap_or(UNKNOWN)
}

pub fn progress_raw(raw: &str) -> u8 {
    raw.parse().map(progress).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub status: SubmissionStatus,
    #[serde(flatten)]
    pub display: StatusDisplay,
    pub progress: u8,
    pub terminal: bool,
    pub owner_role: Option<Role>,
}

pub fn summary(status: SubmissionStatus) -> StatusSummary {
    StatusSummary {
        status,
        display: describe(status),
        progress: progress(status),
        terminal: status.is_terminal(),
        owner_role: status.owner_role(),
    }
}
