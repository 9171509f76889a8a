//! Copy-in-user dialog: copy the source users' role and/or group
//! memberships into a selected set of other users.

use crate::compose::CompositionRoot;
use crate::domain::entities::{NamedRef, UpdateStrategy, User};
use crate::notify::NotificationSink;

use super::{matches_filter, ErrorPolicy, SaveOutcome};

#[derive(Debug, Clone)]
pub enum CopyInUserState {
    Loading {
        sources: Option<Vec<User>>,
        all_users: Option<Vec<User>>,
    },
    Ready(CopySelection),
    /// The dialog is gone; a load failure carries its message here so the
    /// driver can emit exactly one notification before closing.
    Closed(Option<String>),
}

#[derive(Debug, Clone)]
pub struct CopySelection {
    pub sources: Vec<User>,
    /// Every other user on the instance, sorted by name.
    pub candidates: Vec<NamedRef>,
    pub selected: Vec<String>,
    pub filter: String,
    pub copy_user_groups: bool,
    pub copy_user_roles: bool,
    pub strategy: UpdateStrategy,
}

impl CopySelection {
    pub fn visible_candidates(&self) -> Vec<&NamedRef> {
        self.candidates
            .iter()
            .filter(|c| matches_filter(&c.name, &self.filter))
            .collect()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|u| u.username.as_str()).collect()
    }

    /// Strategy control only makes sense with several sources; with one,
    /// the strategy is pinned to replace.
    pub fn strategy_locked(&self) -> bool {
        self.sources.len() <= 1
    }
}

#[derive(Debug, Clone)]
pub enum CopyInUserEvent {
    SourcesLoaded(Vec<User>),
    AllUsersLoaded(Vec<User>),
    LoadFailed(String),
    SelectionChanged(Vec<String>),
    FilterChanged(String),
    CopyGroupsToggled(bool),
    CopyRolesToggled(bool),
    StrategyChanged(UpdateStrategy),
}

pub struct CopyInUserFlow {
    state: CopyInUserState,
    pub error_policy: ErrorPolicy,
}

impl Default for CopyInUserFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyInUserFlow {
    pub fn new() -> Self {
        CopyInUserFlow {
            state: CopyInUserState::Loading { sources: None, all_users: None },
            error_policy: ErrorPolicy::Close,
        }
    }

    pub fn state(&self) -> &CopyInUserState {
        &self.state
    }

    pub fn selection(&self) -> Option<&CopySelection> {
        match &self.state {
            CopyInUserState::Ready(sel) => Some(sel),
            _ => None,
        }
    }

    pub fn apply(&mut self, event: CopyInUserEvent) {
        match event {
            CopyInUserEvent::SourcesLoaded(users) => {
                if let CopyInUserState::Loading { sources, .. } = &mut self.state {
                    *sources = Some(users);
                }
                self.try_ready();
            }
            CopyInUserEvent::AllUsersLoaded(users) => {
                if let CopyInUserState::Loading { all_users, .. } = &mut self.state {
                    *all_users = Some(users);
                }
                self.try_ready();
            }
            CopyInUserEvent::LoadFailed(msg) => {
                if let CopyInUserState::Loading { .. } = self.state {
                    self.state = CopyInUserState::Closed(Some(msg));
                }
            }
            CopyInUserEvent::SelectionChanged(ids) => {
                if let CopyInUserState::Ready(sel) = &mut self.state {
                    let mut kept: Vec<String> = Vec::new();
                    for id in ids {
                        if sel.candidates.iter().any(|c| c.id == id) && !kept.contains(&id) {
                            kept.push(id);
                        }
                    }
                    sel.selected = kept;
                }
            }
            CopyInUserEvent::FilterChanged(filter) => {
                if let CopyInUserState::Ready(sel) = &mut self.state {
                    sel.filter = filter;
                }
            }
            CopyInUserEvent::CopyGroupsToggled(on) => {
                if let CopyInUserState::Ready(sel) = &mut self.state {
                    sel.copy_user_groups = on;
                }
            }
            CopyInUserEvent::CopyRolesToggled(on) => {
                if let CopyInUserState::Ready(sel) = &mut self.state {
                    sel.copy_user_roles = on;
                }
            }
            CopyInUserEvent::StrategyChanged(strategy) => {
                if let CopyInUserState::Ready(sel) = &mut self.state {
                    if !sel.strategy_locked() {
                        sel.strategy = strategy;
                    }
                }
            }
        }
    }

    /// Drop the dialog without side effects.
    pub fn close(&mut self) {
        self.state = CopyInUserState::Closed(None);
    }

    fn try_ready(&mut self) {
        let (sources, all_users) = match &self.state {
            CopyInUserState::Loading { sources: Some(s), all_users: Some(a) } => {
                (s.clone(), a.clone())
            }
            _ => return,
        };

        let mut candidates: Vec<NamedRef> = all_users
            .iter()
            .filter(|u| !sources.iter().any(|s| s.id == u.id))
            .map(|u| NamedRef::new(&u.id, &u.name))
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));

        let strategy = UpdateStrategy::default_for(sources.len());
        self.state = CopyInUserState::Ready(CopySelection {
            sources,
            candidates,
            selected: Vec::new(),
            filter: String::new(),
            copy_user_groups: false,
            copy_user_roles: false,
            strategy,
        });
    }
}

/// Load the source users and the candidate list concurrently. A failure of
/// either load closes the flow, carrying the message for the driver's
/// single error notification.
pub async fn load(root: &CompositionRoot, source_ids: &[String]) -> CopyInUserFlow {
    let mut flow = CopyInUserFlow::new();

    let (sources, all_users) = tokio::join!(root.users.get_many(source_ids), async {
        let ids = root.users.list_all_ids().await?;
        root.users.get_many(&ids).await
    });

    match sources {
        Ok(users) => flow.apply(CopyInUserEvent::SourcesLoaded(users)),
        Err(e) => flow.apply(CopyInUserEvent::LoadFailed(format!("Error loading data: {e}"))),
    }
    match all_users {
        Ok(users) => flow.apply(CopyInUserEvent::AllUsersLoaded(users)),
        Err(e) => flow.apply(CopyInUserEvent::LoadFailed(format!("Error loading data: {e}"))),
    }

    flow
}

/// Submit the copy. Blocked locally unless at least one sub-resource
/// toggle is on; any repository failure closes the dialog
/// (`ErrorPolicy::Close`).
pub async fn save(
    root: &CompositionRoot,
    flow: &mut CopyInUserFlow,
    sink: &dyn NotificationSink,
) -> SaveOutcome {
    let Some(sel) = flow.selection() else {
        return SaveOutcome::Blocked;
    };

    if !sel.copy_user_groups && !sel.copy_user_roles {
        sink.error("You must select a toggle option");
        return SaveOutcome::Blocked;
    }

    let outcome = match root
        .users
        .copy_in_user(
            &sel.sources,
            &sel.selected,
            sel.copy_user_groups,
            sel.copy_user_roles,
            sel.strategy,
        )
        .await
    {
        Ok(()) => {
            sink.success("User settings copied.");
            SaveOutcome::Saved
        }
        Err(e) => {
            sink.error(&format!("Error copying user settings: {e}"));
            SaveOutcome::Failed
        }
    };

    if outcome.closes(flow.error_policy) {
        flow.close();
    }
    outcome
}
