//! Role assignment dialog: pick a role subset and a merge/replace strategy
//! for a batch of users.

use crate::compose::CompositionRoot;
use crate::domain::entities::{MetadataKind, NamedRef, UpdateStrategy, User};
use crate::notify::NotificationSink;

use super::{matches_filter, ErrorPolicy, SaveOutcome};

#[derive(Debug, Clone)]
pub enum RoleAssignmentState {
    /// Candidate roles and target users load independently; either may
    /// land first.
    Loading {
        roles: Option<Vec<NamedRef>>,
        users: Option<Vec<User>>,
    },
    Ready(RoleSelection),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RoleSelection {
    pub users: Vec<User>,
    pub roles: Vec<NamedRef>,
    pub selected: Vec<String>,
    pub strategy: UpdateStrategy,
    /// With a single target user, merge is meaningless and the strategy is
    /// pinned to replace.
    pub strategy_locked: bool,
    pub filter: String,
}

impl RoleSelection {
    pub fn selected_roles(&self) -> Vec<NamedRef> {
        self.roles
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .cloned()
            .collect()
    }

    pub fn visible_roles(&self) -> Vec<&NamedRef> {
        self.roles
            .iter()
            .filter(|r| matches_filter(&r.name, &self.filter))
            .collect()
    }

    pub fn usernames(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.username.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub enum RoleAssignmentEvent {
    RolesLoaded(Vec<NamedRef>),
    UsersLoaded(Vec<User>),
    LoadFailed(String),
    SelectionChanged(Vec<String>),
    StrategyChanged(UpdateStrategy),
    FilterChanged(String),
}

pub struct RoleAssignmentFlow {
    state: RoleAssignmentState,
    pub error_policy: ErrorPolicy,
}

impl Default for RoleAssignmentFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleAssignmentFlow {
    pub fn new() -> Self {
        RoleAssignmentFlow {
            state: RoleAssignmentState::Loading { roles: None, users: None },
            error_policy: ErrorPolicy::StayOpen,
        }
    }

    pub fn state(&self) -> &RoleAssignmentState {
        &self.state
    }

    pub fn selection(&self) -> Option<&RoleSelection> {
        match &self.state {
            RoleAssignmentState::Ready(sel) => Some(sel),
            _ => None,
        }
    }

    /// Pure transition function. Selection edits are clamped to the loaded
    /// candidate set; strategy edits are ignored while locked.
    pub fn apply(&mut self, event: RoleAssignmentEvent) {
        match event {
            RoleAssignmentEvent::RolesLoaded(r) => {
                if let RoleAssignmentState::Loading { roles, .. } = &mut self.state {
                    *roles = Some(r);
                }
                self.try_ready();
            }
            RoleAssignmentEvent::UsersLoaded(u) => {
                if let RoleAssignmentState::Loading { users, .. } = &mut self.state {
                    *users = Some(u);
                }
                self.try_ready();
            }
            RoleAssignmentEvent::LoadFailed(msg) => {
                if let RoleAssignmentState::Loading { .. } = self.state {
                    self.state = RoleAssignmentState::Failed(msg);
                }
            }
            RoleAssignmentEvent::SelectionChanged(ids) => {
                if let RoleAssignmentState::Ready(sel) = &mut self.state {
                    let mut kept: Vec<String> = Vec::new();
                    for id in ids {
                        if sel.roles.iter().any(|r| r.id == id) && !kept.contains(&id) {
                            kept.push(id);
                        }
                    }
                    sel.selected = kept;
                }
            }
            RoleAssignmentEvent::StrategyChanged(strategy) => {
                if let RoleAssignmentState::Ready(sel) = &mut self.state {
                    if !sel.strategy_locked {
                        sel.strategy = strategy;
                    }
                }
            }
            RoleAssignmentEvent::FilterChanged(filter) => {
                if let RoleAssignmentState::Ready(sel) = &mut self.state {
                    sel.filter = filter;
                }
            }
        }
    }

    fn try_ready(&mut self) {
        let (roles, users) = match &self.state {
            RoleAssignmentState::Loading { roles: Some(r), users: Some(u) } => {
                (r.clone(), u.clone())
            }
            _ => return,
        };

        // Seed the selection with the roles every target user already
        // holds, restricted to the candidate set.
        let selected: Vec<String> = roles
            .iter()
            .map(|r| r.id.clone())
            .filter(|id| users.iter().all(|u| u.user_roles.iter().any(|ur| &ur.id == id)))
            .collect();

        let strategy = UpdateStrategy::default_for(users.len());
        let strategy_locked = users.len() <= 1;
        self.state = RoleAssignmentState::Ready(RoleSelection {
            users,
            roles,
            selected,
            strategy,
            strategy_locked,
            filter: String::new(),
        });
    }
}

/// Issue the two loads concurrently and feed the results in as events.
/// The reducer tolerates either completion order.
pub async fn load(root: &CompositionRoot, ids: &[String]) -> RoleAssignmentFlow {
    let mut flow = RoleAssignmentFlow::new();

    let (roles, users) = tokio::join!(
        root.metadata.list(MetadataKind::UserRoles),
        root.users.get_many(ids),
    );

    match roles {
        Ok(roles) => flow.apply(RoleAssignmentEvent::RolesLoaded(roles)),
        Err(e) => flow.apply(RoleAssignmentEvent::LoadFailed(format!("Error loading roles: {e}"))),
    }
    match users {
        Ok(users) => flow.apply(RoleAssignmentEvent::UsersLoaded(users)),
        Err(e) => flow.apply(RoleAssignmentEvent::LoadFailed(format!("Error loading users: {e}"))),
    }

    flow
}

/// Submit the current selection. Failures leave the flow open for another
/// attempt (`ErrorPolicy::StayOpen`).
pub async fn save(
    root: &CompositionRoot,
    flow: &RoleAssignmentFlow,
    sink: &dyn NotificationSink,
) -> SaveOutcome {
    let Some(sel) = flow.selection() else {
        return SaveOutcome::Blocked;
    };
    if sel.users.is_empty() {
        return SaveOutcome::Blocked;
    }

    match root
        .users
        .update_roles(&sel.users, &sel.selected_roles(), sel.strategy)
        .await
    {
        Ok(()) => {
            sink.success("User roles assigned.");
            SaveOutcome::Saved
        }
        Err(e) => {
            sink.error(&format!("Error assigning user roles: {e}"));
            SaveOutcome::Failed
        }
    }
}
