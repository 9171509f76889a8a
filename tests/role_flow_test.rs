//! Role assignment flow: load seeding, strategy rules, reducer invariants
//! and the stay-open error policy.

mod common;

use common::*;
use useradm::domain::entities::UpdateStrategy;
use useradm::domain::repository::RepositoryError;
use useradm::flows::role_assignment::{
    self, RoleAssignmentEvent, RoleAssignmentFlow, RoleAssignmentState,
};
use useradm::flows::{ErrorPolicy, SaveOutcome};
use useradm::notify::RecordingSink;

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[tokio::test]
async fn initial_selection_is_intersection_of_user_roles() {
    let env = setup_env(
        vec![
            user("a", "alice", &[role("r1"), role("r2")]),
            user("b", "bob", &[role("r2"), role("r3")]),
        ],
        vec![role("r1"), role("r2"), role("r3")],
    );

    let flow = role_assignment::load(&env.root, &ids(&["a", "b"])).await;
    let sel = flow.selection().expect("flow should be ready");

    assert_eq!(sel.selected, vec!["r2".to_string()]);
}

#[tokio::test]
async fn single_target_forces_replace_and_locks_strategy() {
    let env = setup_env(
        vec![user("a", "alice", &[role("r1")])],
        vec![role("r1"), role("r2")],
    );

    let mut flow = role_assignment::load(&env.root, &ids(&["a"])).await;
    let sel = flow.selection().expect("flow should be ready");
    assert_eq!(sel.strategy, UpdateStrategy::Replace);
    assert!(sel.strategy_locked);

    // A merge request is ignored while locked.
    flow.apply(RoleAssignmentEvent::StrategyChanged(UpdateStrategy::Merge));
    assert_eq!(flow.selection().unwrap().strategy, UpdateStrategy::Replace);
}

#[tokio::test]
async fn multiple_targets_default_to_merge() {
    let env = setup_env(
        vec![
            user("a", "alice", &[role("r1")]),
            user("b", "bob", &[role("r1")]),
        ],
        vec![role("r1")],
    );

    let mut flow = role_assignment::load(&env.root, &ids(&["a", "b"])).await;
    let sel = flow.selection().expect("flow should be ready");
    assert_eq!(sel.strategy, UpdateStrategy::Merge);
    assert!(!sel.strategy_locked);

    flow.apply(RoleAssignmentEvent::StrategyChanged(UpdateStrategy::Replace));
    assert_eq!(flow.selection().unwrap().strategy, UpdateStrategy::Replace);
}

#[test]
fn selection_is_clamped_to_candidate_set() {
    let mut flow = RoleAssignmentFlow::new();
    flow.apply(RoleAssignmentEvent::RolesLoaded(vec![role("r1"), role("r2")]));
    flow.apply(RoleAssignmentEvent::UsersLoaded(vec![user("a", "alice", &[])]));

    flow.apply(RoleAssignmentEvent::SelectionChanged(ids(&[
        "r1", "bogus", "r1", "r2",
    ])));

    let sel = flow.selection().expect("flow should be ready");
    assert_eq!(sorted(sel.selected.clone()), ids(&["r1", "r2"]));
}

#[test]
fn loads_may_complete_in_either_order() {
    let roles = vec![role("r1"), role("r2")];
    let users = vec![user("a", "alice", &[role("r1")])];

    let mut first = RoleAssignmentFlow::new();
    first.apply(RoleAssignmentEvent::RolesLoaded(roles.clone()));
    first.apply(RoleAssignmentEvent::UsersLoaded(users.clone()));

    let mut second = RoleAssignmentFlow::new();
    second.apply(RoleAssignmentEvent::UsersLoaded(users));
    second.apply(RoleAssignmentEvent::RolesLoaded(roles));

    let a = first.selection().expect("ready");
    let b = second.selection().expect("ready");
    assert_eq!(a.selected, b.selected);
    assert_eq!(a.strategy, b.strategy);
}

#[tokio::test]
async fn load_failure_keeps_dialog_open() {
    let env = setup_env(
        vec![user("a", "alice", &[])],
        vec![role("r1")],
    );
    env.metadata
        .fail_with(RepositoryError::Network("connection refused".to_string()));

    let flow = role_assignment::load(&env.root, &ids(&["a"])).await;

    assert_eq!(flow.error_policy, ErrorPolicy::StayOpen);
    match flow.state() {
        RoleAssignmentState::Failed(msg) => {
            assert!(msg.contains("Error loading roles"), "got: {msg}")
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn save_applies_selection_and_notifies_success() {
    let env = setup_env(
        vec![
            user("a", "alice", &[role("r1"), role("r2")]),
            user("b", "bob", &[role("r2"), role("r3")]),
        ],
        vec![role("r1"), role("r2"), role("r3")],
    );

    let mut flow = role_assignment::load(&env.root, &ids(&["a", "b"])).await;
    flow.apply(RoleAssignmentEvent::SelectionChanged(ids(&["r1", "r3"])));

    let sink = RecordingSink::new();
    let outcome = role_assignment::save(&env.root, &flow, &sink).await;

    assert_eq!(outcome, SaveOutcome::Saved);
    assert_role_ids(&env.users.stored("a").unwrap(), &["r1", "r2", "r3"]);
    assert_role_ids(&env.users.stored("b").unwrap(), &["r1", "r2", "r3"]);
    assert_eq!(sink.entries().len(), 1);
    assert!(sink.errors().is_empty());
}

#[tokio::test]
async fn save_failure_stays_open_for_retry() {
    let env = setup_env(
        vec![user("a", "alice", &[role("r1")])],
        vec![role("r1"), role("r2")],
    );
    env.users
        .fail_saves_with(RepositoryError::Rejected("import conflict".to_string()));

    let flow = role_assignment::load(&env.root, &ids(&["a"])).await;
    let sink = RecordingSink::new();
    let outcome = role_assignment::save(&env.root, &flow, &sink).await;

    assert_eq!(outcome, SaveOutcome::Failed);
    assert!(!outcome.closes(flow.error_policy), "role dialog must stay open");
    assert_eq!(sink.errors().len(), 1);
    // Flow is still ready for resubmission.
    assert!(flow.selection().is_some());
}

#[test]
fn filter_narrows_visible_roles_only() {
    let mut flow = RoleAssignmentFlow::new();
    flow.apply(RoleAssignmentEvent::RolesLoaded(vec![
        named("r1", "Data entry"),
        named("r2", "Data viewer"),
        named("r3", "Superuser"),
    ]));
    flow.apply(RoleAssignmentEvent::UsersLoaded(vec![user("a", "alice", &[])]));
    flow.apply(RoleAssignmentEvent::FilterChanged("data".to_string()));

    let sel = flow.selection().expect("ready");
    let visible: Vec<&str> = sel.visible_roles().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(visible, vec!["Data entry", "Data viewer"]);
    // Candidates themselves are untouched.
    assert_eq!(sel.roles.len(), 3);
}
