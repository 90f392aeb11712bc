use std::collections::BTreeSet;
use std::fmt;

use crate::models::Submission;

use super::permissions::PermissionTable;
use super::transitions::TransitionTable;
use super::types::{Action, Role, SubmissionStatus};

/// One row of the authorization table: `role` may run `action` while the
/// submission sits in `from`, moving it to `to` when the action changes status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub action: Action,
    pub role: Role,
    pub from: SubmissionStatus,
    pub to: Option<SubmissionStatus>,
    /// Also require `submission.current_owner_role == role`.
    pub requires_owner: bool,
}

impl Rule {
    const fn step(
        action: Action,
        role: Role,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Self {
        Self {
            action,
            role,
            from,
            to: Some(to),
            requires_owner: false,
        }
    }

    const fn stay(action: Action, role: Role, from: SubmissionStatus) -> Self {
        Self {
            action,
            role,
            from,
            to: None,
            requires_owner: false,
        }
    }

    const fn owned(mut self) -> Self {
        self.requires_owner = true;
        self
    }

    fn matches(&self, action: Action, role: Role, submission: &Submission) -> bool {
        self.action == action
            && self.role == role
            && self.from == submission.status
            && (!self.requires_owner || submission.current_owner_role == Some(role))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A rule moves between two statuses the transition table does not connect.
    IllegalTransition(Rule),
    /// A rule grants an action its role does not hold.
    ActionNotGranted(Rule),
    /// Status-changing actions need a target; non-changing ones must not have one.
    TargetMismatch(Rule),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::IllegalTransition(rule) => write!(
                f,
                "Rule {} for {} moves {} to {:?}, which the transition table forbids",
                rule.action, rule.role, rule.from, rule.to
            ),
            PolicyError::ActionNotGranted(rule) => write!(
                f,
                "Rule grants {} to {}, which the permission table does not allow",
                rule.action, rule.role
            ),
            PolicyError::TargetMismatch(rule) => write!(
                f,
                "Rule {} for {} at {} has an inconsistent target {:?}",
                rule.action, rule.role, rule.from, rule.to
            ),
        }
    }
}

impl std::error::Error for PolicyError {}

/// Immutable permission data for the submission workflow. Built once at
/// startup and shared; every query is a pure lookup.
#[derive(Debug, Clone)]
pub struct WorkflowPolicy {
    permissions: PermissionTable,
    transitions: TransitionTable,
    rules: Vec<Rule>,
}

impl WorkflowPolicy {
    pub fn new(
        permissions: PermissionTable,
        transitions: TransitionTable,
        rules: Vec<Rule>,
    ) -> Result<Self, PolicyError> {
        for rule in &rules {
            if !permissions.permits(rule.role, rule.action) {
                return Err(PolicyError::ActionNotGranted(*rule));
            }
            match rule.to {
                Some(to) if rule.action.changes_status() => {
                    if !transitions.allows(rule.from, to) {
                        return Err(PolicyError::IllegalTransition(*rule));
                    }
                }
                None if !rule.action.changes_status() => {}
                _ => return Err(PolicyError::TargetMismatch(*rule)),
            }
        }

        Ok(Self {
            permissions,
            transitions,
            rules,
        })
    }

    pub fn standard() -> Self {
        Self::new(
            PermissionTable::standard(),
            TransitionTable::standard(),
            standard_rules(),
        )
        .expect("standard workflow tables are consistent")
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn allowed_actions(&self, role: Role) -> &BTreeSet<Action> {
        self.permissions.allowed_actions(role)
    }

    pub fn next_states(&self, status: SubmissionStatus) -> &BTreeSet<SubmissionStatus> {
        self.transitions.next_states(status)
    }

    /// The rule that authorizes `role` to run `action` on `submission`, if any.
    pub fn resolve(&self, action: Action, role: Role, submission: &Submission) -> Option<&Rule> {
        if !self.permissions.permits(role, action) {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(action, role, submission))
    }

    pub fn authorize(&self, action: Action, role: Role, submission: &Submission) -> bool {
        self.resolve(action, role, submission).is_some()
    }

    /// Every action `role` could run on `submission` right now, in declaration order.
    pub fn available_actions(&self, role: Role, submission: &Submission) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.authorize(*action, role, submission))
            .collect()
    }
}

fn standard_rules() -> Vec<Rule> {
    use Action::*;
    use Role::*;
    use SubmissionStatus::*;

    let mut rules = vec![
        Rule::stay(Create, NodalOfficer, Draft),
        Rule::stay(Edit, NodalOfficer, Draft),
        Rule::step(SubmitToState, NodalOfficer, Draft, SubmittedToState),
        Rule::step(Resubmit, NodalOfficer, ReturnedFromMospi, SubmittedToState),
        Rule::step(
            ForwardToMinistry,
            StateApprover,
            SubmittedToState,
            SubmittedToMospiReviewer,
        )
        .owned(),
        Rule::step(
            ForwardToMinistry,
            MospiReviewer,
            SubmittedToMospiReviewer,
            SubmittedToMospiApprover,
        )
        .owned(),
        Rule::step(StateReject, StateApprover, SubmittedToState, ReturnedFromMospi).owned(),
        Rule::step(StateReject, MospiReviewer, SubmittedToMospiReviewer, ReturnedFromMospi).owned(),
        Rule::step(StateReject, MospiApprover, SubmittedToMospiApprover, ReturnedFromMospi).owned(),
        Rule::step(FinalReject, MospiReviewer, SubmittedToMospiReviewer, RejectedFinal).owned(),
        Rule::step(FinalReject, MospiApprover, SubmittedToMospiApprover, RejectedFinal).owned(),
        Rule::step(Approve, MospiApprover, SubmittedToMospiApprover, Approved).owned(),
    ];

    // Comments are open to every role once a submission has left drafting.
    for role in Role::ALL {
        for status in SubmissionStatus::ALL {
            if status != Draft {
                rules.push(Rule::stay(AddComment, role, status));
            }
        }
    }

    rules
}
