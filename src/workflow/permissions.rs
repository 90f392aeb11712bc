use std::collections::{BTreeSet, HashMap};

use super::types::{Action, Role};

static NO_ACTIONS: BTreeSet<Action> = BTreeSet::new();

/// Which actions each role may ever attempt, independent of submission status.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    grants: HashMap<Role, BTreeSet<Action>>,
}

impl PermissionTable {
    pub fn new<I, A>(grants: I) -> Self
    where
        I: IntoIterator<Item = (Role, A)>,
        A: IntoIterator<Item = Action>,
    {
        Self {
            grants: grants
                .into_iter()
                .map(|(role, actions)| (role, actions.into_iter().collect()))
                .collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new([
            (
                Role::NodalOfficer,
                vec![
                    Action::Create,
                    Action::Edit,
                    Action::SubmitToState,
                    Action::Resubmit,
                    Action::AddComment,
                ],
            ),
            (
                Role::StateApprover,
                vec![
                    Action::ForwardToMinistry,
                    Action::StateReject,
                    Action::AddComment,
                ],
            ),
            (
                Role::MospiReviewer,
                vec![
                    Action::ForwardToMinistry,
                    Action::StateReject,
                    Action::FinalReject,
                    Action::AddComment,
                ],
            ),
            (
                Role::MospiApprover,
                vec![
                    Action::Approve,
                    Action::StateReject,
                    Action::FinalReject,
                    Action::AddComment,
                ],
            ),
        ])
    }

    /// Roles missing from the table get the empty set.
    pub fn allowed_actions(&self, role: Role) -> &BTreeSet<Action> {
        self.grants.get(&role).unwrap_or(&NO_ACTIONS)
    }

    pub fn permits(&self, role: Role, action: Action) -> bool {
        self.allowed_actions(role).contains(&action)
    }
}
