use std::sync::Arc;

use crate::domain::entities::{ListFilter, NamedRef, UpdateStrategy, User, UserPage};
use crate::domain::repository::{RepoResult, UserRepository};

pub struct GetCurrentUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl GetCurrentUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self) -> RepoResult<User> {
        self.users.current().await
    }
}

pub struct GetUserByIdUseCase {
    users: Arc<dyn UserRepository>,
}

impl GetUserByIdUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, id: &str) -> RepoResult<User> {
        self.users.get_by_id(id).await
    }
}

pub struct GetUsersByIdsUseCase {
    users: Arc<dyn UserRepository>,
}

impl GetUsersByIdsUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, ids: &[String]) -> RepoResult<Vec<User>> {
        self.users.get_many(ids).await
    }
}

pub struct ListUsersUseCase {
    users: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, filter: &ListFilter) -> RepoResult<UserPage> {
        self.users.list(&filter.normalized()).await
    }
}

pub struct ListAllUserIdsUseCase {
    users: Arc<dyn UserRepository>,
}

impl ListAllUserIdsUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self) -> RepoResult<Vec<String>> {
        self.users.list_all_ids().await
    }
}

pub struct SaveUsersUseCase {
    users: Arc<dyn UserRepository>,
}

impl SaveUsersUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, users: &[User]) -> RepoResult<()> {
        self.users.save(users).await
    }
}

/// Enable or disable a batch of users: clones each input with `disabled`
/// overwritten, then delegates to the batch save.
pub struct SaveUserStatusUseCase {
    users: Arc<dyn UserRepository>,
}

impl SaveUserStatusUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, users: &[User], disabled: bool) -> RepoResult<()> {
        let updated: Vec<User> = users.iter().map(|u| u.with_disabled(disabled)).collect();
        self.users.save(&updated).await
    }
}

/// Assign a role selection to a batch of users under a merge/replace
/// strategy and save the resulting user objects.
pub struct UpdateRolesUseCase {
    users: Arc<dyn UserRepository>,
}

impl UpdateRolesUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(
        &self,
        users: &[User],
        roles: &[NamedRef],
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        let updated: Vec<User> = users
            .iter()
            .map(|u| u.with_roles(strategy.apply(&u.user_roles, roles)))
            .collect();
        self.users.save(&updated).await
    }
}

/// Sibling of `UpdateRolesUseCase` for group memberships.
pub struct UpdateGroupsUseCase {
    users: Arc<dyn UserRepository>,
}

impl UpdateGroupsUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(
        &self,
        users: &[User],
        groups: &[NamedRef],
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        let updated: Vec<User> = users
            .iter()
            .map(|u| u.with_groups(strategy.apply(&u.user_groups, groups)))
            .collect();
        self.users.save(&updated).await
    }
}

/// Copy the source users' role and/or group memberships into a set of
/// target users. With several sources their reference sets are combined
/// (deduplicated by id) before the strategy is applied. The toggle
/// precondition (at least one of `copy_roles` / `copy_groups`) is enforced
/// by the flow before this runs; with both toggles off the targets would
/// be saved unchanged.
pub struct CopyInUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl CopyInUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn execute(
        &self,
        sources: &[User],
        target_ids: &[String],
        copy_groups: bool,
        copy_roles: bool,
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        let roles = combined(sources, |u| u.user_roles.as_slice());
        let groups = combined(sources, |u| u.user_groups.as_slice());

        let targets = self.users.get_many(target_ids).await?;
        let updated: Vec<User> = targets
            .iter()
            .map(|t| {
                let mut u = t.clone();
                if copy_roles {
                    u.user_roles = strategy.apply(&t.user_roles, &roles);
                }
                if copy_groups {
                    u.user_groups = strategy.apply(&t.user_groups, &groups);
                }
                u
            })
            .collect();
        self.users.save(&updated).await
    }
}

/// Union of one reference set across users, deduplicated by id.
fn combined<'a>(users: &'a [User], field: impl Fn(&'a User) -> &'a [NamedRef]) -> Vec<NamedRef> {
    let mut out: Vec<NamedRef> = Vec::new();
    for user in users {
        for r in field(user) {
            if !out.iter().any(|e| e.id == r.id) {
                out.push(r.clone());
            }
        }
    }
    out
}
