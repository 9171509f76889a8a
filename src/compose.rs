//! Composition root: the single place repositories are constructed and
//! use cases are bound to them. The root holds no business logic and no
//! cache; build a fresh one whenever the target instance changes.

use std::sync::Arc;

use crate::data::{ApiInstanceRepository, ApiMetadataRepository, ApiUserRepository, D2ApiClient};
use crate::domain::entities::{
    Instance, ListFilter, Locale, MetadataKind, NamedRef, UpdateStrategy, User, UserPage,
};
use crate::domain::repository::{
    InstanceRepository, MetadataRepository, RepoResult, UserRepository,
};
use crate::domain::usecases::*;

pub struct CompositionRoot {
    pub instance: InstanceOps,
    pub users: UserOps,
    pub metadata: MetadataOps,
}

impl CompositionRoot {
    /// Build the API-backed root for a remote instance. Configures the HTTP
    /// client eagerly but performs no network call.
    pub fn new(instance: &Instance) -> Self {
        let client = D2ApiClient::new(instance);
        Self::from_repositories(
            Arc::new(ApiUserRepository::new(client.clone())),
            Arc::new(ApiMetadataRepository::new(client.clone())),
            Arc::new(ApiInstanceRepository::new(client)),
        )
    }

    /// Wire the root from arbitrary repository implementations. This is the
    /// seam tests use to substitute in-memory repositories.
    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        metadata: Arc<dyn MetadataRepository>,
        instance: Arc<dyn InstanceRepository>,
    ) -> Self {
        CompositionRoot {
            instance: InstanceOps {
                get_version: GetInstanceVersionUseCase::new(instance.clone()),
                get_locales: GetInstanceLocalesUseCase::new(instance),
            },
            users: UserOps {
                get_current: GetCurrentUserUseCase::new(users.clone()),
                list: ListUsersUseCase::new(users.clone()),
                list_all_ids: ListAllUserIdsUseCase::new(users.clone()),
                get: GetUserByIdUseCase::new(users.clone()),
                get_many: GetUsersByIdsUseCase::new(users.clone()),
                save: SaveUsersUseCase::new(users.clone()),
                save_status: SaveUserStatusUseCase::new(users.clone()),
                update_roles: UpdateRolesUseCase::new(users.clone()),
                update_groups: UpdateGroupsUseCase::new(users.clone()),
                copy_in_user: CopyInUserUseCase::new(users),
            },
            metadata: MetadataOps {
                list: ListMetadataUseCase::new(metadata),
            },
        }
    }
}

/// Instance-level operations. Each method delegates to exactly one use
/// case; calling it is equivalent to calling the use case directly.
pub struct InstanceOps {
    get_version: GetInstanceVersionUseCase,
    get_locales: GetInstanceLocalesUseCase,
}

impl InstanceOps {
    pub async fn get_version(&self) -> RepoResult<String> {
        self.get_version.execute().await
    }

    pub async fn get_locales(&self) -> RepoResult<Vec<Locale>> {
        self.get_locales.execute().await
    }
}

/// User operations.
pub struct UserOps {
    get_current: GetCurrentUserUseCase,
    list: ListUsersUseCase,
    list_all_ids: ListAllUserIdsUseCase,
    get: GetUserByIdUseCase,
    get_many: GetUsersByIdsUseCase,
    save: SaveUsersUseCase,
    save_status: SaveUserStatusUseCase,
    update_roles: UpdateRolesUseCase,
    update_groups: UpdateGroupsUseCase,
    copy_in_user: CopyInUserUseCase,
}

impl UserOps {
    pub async fn get_current(&self) -> RepoResult<User> {
        self.get_current.execute().await
    }

    pub async fn list(&self, filter: &ListFilter) -> RepoResult<UserPage> {
        self.list.execute(filter).await
    }

    pub async fn list_all_ids(&self) -> RepoResult<Vec<String>> {
        self.list_all_ids.execute().await
    }

    pub async fn get(&self, id: &str) -> RepoResult<User> {
        self.get.execute(id).await
    }

    pub async fn get_many(&self, ids: &[String]) -> RepoResult<Vec<User>> {
        self.get_many.execute(ids).await
    }

    pub async fn save(&self, users: &[User]) -> RepoResult<()> {
        self.save.execute(users).await
    }

    pub async fn save_status(&self, users: &[User], disabled: bool) -> RepoResult<()> {
        self.save_status.execute(users, disabled).await
    }

    pub async fn update_roles(
        &self,
        users: &[User],
        roles: &[NamedRef],
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        self.update_roles.execute(users, roles, strategy).await
    }

    pub async fn update_groups(
        &self,
        users: &[User],
        groups: &[NamedRef],
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        self.update_groups.execute(users, groups, strategy).await
    }

    pub async fn copy_in_user(
        &self,
        sources: &[User],
        target_ids: &[String],
        copy_groups: bool,
        copy_roles: bool,
        strategy: UpdateStrategy,
    ) -> RepoResult<()> {
        self.copy_in_user
            .execute(sources, target_ids, copy_groups, copy_roles, strategy)
            .await
    }
}

/// Metadata operations.
pub struct MetadataOps {
    list: ListMetadataUseCase,
}

impl MetadataOps {
    pub async fn list(&self, kind: MetadataKind) -> RepoResult<Vec<NamedRef>> {
        self.list.execute(kind).await
    }
}
