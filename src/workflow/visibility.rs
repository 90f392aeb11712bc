use super::types::{Role, SubmissionStatus};

/// Statuses a role sees when listing submissions.
pub fn visible_statuses(role: Role) -> &'static [SubmissionStatus] {
    use SubmissionStatus::*;

    match role {
        Role::NodalOfficer => &SubmissionStatus::ALL,
        Role::StateApprover => &[
            SubmittedToState,
            SubmittedToMospiReviewer,
            SubmittedToMospiApprover,
            Approved,
            ReturnedFromMospi,
            RejectedFinal,
        ],
        Role::MospiReviewer => &[
            SubmittedToMospiReviewer,
            SubmittedToMospiApprover,
            Approved,
            ReturnedFromMospi,
            RejectedFinal,
        ],
        Role::MospiApprover => &[
            SubmittedToMospiApprover,
            Approved,
            ReturnedFromMospi,
            RejectedFinal,
        ],
    }
}
