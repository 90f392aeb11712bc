use std::collections::{BTreeMap, BTreeSet};

use super::types::SubmissionStatus;

static NO_STATES: BTreeSet<SubmissionStatus> = BTreeSet::new();

/// Directed graph of legal status changes.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    edges: BTreeMap<SubmissionStatus, BTreeSet<SubmissionStatus>>,
}

impl TransitionTable {
    pub fn new<I, T>(edges: I) -> Self
    where
        I: IntoIterator<Item = (SubmissionStatus, T)>,
        T: IntoIterator<Item = SubmissionStatus>,
    {
        Self {
            edges: edges
                .into_iter()
                .map(|(from, to)| (from, to.into_iter().collect()))
                .collect(),
        }
    }

    pub fn standard() -> Self {
        use SubmissionStatus::*;

        Self::new([
            (Draft, vec![SubmittedToState]),
            (
                SubmittedToState,
                vec![SubmittedToMospiReviewer, ReturnedFromMospi],
            ),
            (
                SubmittedToMospiReviewer,
                vec![SubmittedToMospiApprover, ReturnedFromMospi, RejectedFinal],
            ),
            (
                SubmittedToMospiApprover,
                vec![Approved, ReturnedFromMospi, RejectedFinal],
            ),
            (ReturnedFromMospi, vec![SubmittedToState]),
        ])
    }

    /// Terminal statuses, and any status without outgoing edges, map to the empty set.
    pub fn next_states(&self, status: SubmissionStatus) -> &BTreeSet<SubmissionStatus> {
        self.edges.get(&status).unwrap_or(&NO_STATES)
    }

    pub fn allows(&self, from: SubmissionStatus, to: SubmissionStatus) -> bool {
        self.next_states(from).contains(&to)
    }
}
