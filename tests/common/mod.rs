//! Shared test infrastructure: in-memory repositories, fixtures and a
//! composition root builder. The in-memory repositories honor the same
//! contract as the API-backed ones, with injectable failures for the
//! error-path tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use useradm::compose::CompositionRoot;
use useradm::domain::entities::{
    ListFilter, Locale, MetadataKind, NamedRef, User, UserPage,
};
use useradm::domain::repository::{
    InstanceRepository, MetadataRepository, RepoResult, RepositoryError, UserRepository,
};

pub fn named(id: &str, name: &str) -> NamedRef {
    NamedRef::new(id, name)
}

pub fn role(id: &str) -> NamedRef {
    NamedRef::new(id, &format!("Role {id}"))
}

pub fn group(id: &str) -> NamedRef {
    NamedRef::new(id, &format!("Group {id}"))
}

pub fn user(id: &str, username: &str, roles: &[NamedRef]) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        name: format!("User {username}"),
        disabled: false,
        user_roles: roles.to_vec(),
        user_groups: vec![],
        organisation_units: vec![],
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    save_calls: Mutex<usize>,
    fail_reads: Mutex<Option<RepositoryError>>,
    fail_saves: Mutex<Option<RepositoryError>>,
}

impl InMemoryUserRepository {
    pub fn seeded(users: Vec<User>) -> Arc<Self> {
        let repo = Self::default();
        *repo.users.lock().unwrap() = users;
        Arc::new(repo)
    }

    pub fn fail_reads_with(&self, err: RepositoryError) {
        *self.fail_reads.lock().unwrap() = Some(err);
    }

    pub fn fail_saves_with(&self, err: RepositoryError) {
        *self.fail_saves.lock().unwrap() = Some(err);
    }

    pub fn save_calls(&self) -> usize {
        *self.save_calls.lock().unwrap()
    }

    pub fn stored(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn check_reads(&self) -> RepoResult<()> {
        match self.fail_reads.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn current(&self) -> RepoResult<User> {
        self.check_reads()?;
        self.users
            .lock()
            .unwrap()
            .first()
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound("me".to_string()))
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<User> {
        self.check_reads()?;
        self.stored(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_many(&self, ids: &[String]) -> RepoResult<Vec<User>> {
        self.check_reads()?;
        Ok(ids.iter().filter_map(|id| self.stored(id)).collect())
    }

    async fn list(&self, filter: &ListFilter) -> RepoResult<UserPage> {
        self.check_reads()?;
        let mut users: Vec<User> = self.users.lock().unwrap().clone();
        if let Some(q) = &filter.query {
            let q = q.to_lowercase();
            users.retain(|u| {
                u.username.to_lowercase().contains(&q) || u.name.to_lowercase().contains(&q)
            });
        }
        users.sort_by(|a, b| a.username.cmp(&b.username));

        let total_count = users.len() as i64;
        let total_pages = (total_count + filter.page_size - 1) / filter.page_size;
        let start = ((filter.page - 1) * filter.page_size) as usize;
        let page_users: Vec<User> = users
            .into_iter()
            .skip(start)
            .take(filter.page_size as usize)
            .collect();

        Ok(UserPage {
            users: page_users,
            page: filter.page,
            page_size: filter.page_size,
            total_count,
            total_pages,
        })
    }

    async fn list_all_ids(&self) -> RepoResult<Vec<String>> {
        self.check_reads()?;
        Ok(self.users.lock().unwrap().iter().map(|u| u.id.clone()).collect())
    }

    async fn save(&self, users: &[User]) -> RepoResult<()> {
        if let Some(err) = self.fail_saves.lock().unwrap().clone() {
            return Err(err);
        }
        *self.save_calls.lock().unwrap() += 1;

        let mut stored = self.users.lock().unwrap();
        for user in users {
            match stored.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user.clone(),
                None => stored.push(user.clone()),
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMetadataRepository {
    roles: Mutex<Vec<NamedRef>>,
    groups: Mutex<Vec<NamedRef>>,
    fail: Mutex<Option<RepositoryError>>,
}

impl InMemoryMetadataRepository {
    pub fn seeded(roles: Vec<NamedRef>, groups: Vec<NamedRef>) -> Arc<Self> {
        let repo = Self::default();
        *repo.roles.lock().unwrap() = roles;
        *repo.groups.lock().unwrap() = groups;
        Arc::new(repo)
    }

    pub fn fail_with(&self, err: RepositoryError) {
        *self.fail.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl MetadataRepository for InMemoryMetadataRepository {
    async fn list(&self, kind: MetadataKind) -> RepoResult<Vec<NamedRef>> {
        if let Some(err) = self.fail.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(match kind {
            MetadataKind::UserRoles => self.roles.lock().unwrap().clone(),
            MetadataKind::UserGroups => self.groups.lock().unwrap().clone(),
            MetadataKind::OrganisationUnits => vec![],
        })
    }
}

pub struct InMemoryInstanceRepository {
    pub version: String,
    pub locales: Vec<Locale>,
}

impl Default for InMemoryInstanceRepository {
    fn default() -> Self {
        InMemoryInstanceRepository {
            version: "2.41.1".to_string(),
            locales: vec![
                Locale { locale: "en".to_string(), name: "English".to_string() },
                Locale { locale: "fr".to_string(), name: "French".to_string() },
            ],
        }
    }
}

#[async_trait]
impl InstanceRepository for InMemoryInstanceRepository {
    async fn version(&self) -> RepoResult<String> {
        Ok(self.version.clone())
    }

    async fn locales(&self) -> RepoResult<Vec<Locale>> {
        Ok(self.locales.clone())
    }
}

/// Everything a flow/use-case test needs: the root plus handles on the
/// repositories behind it.
pub struct TestEnv {
    pub users: Arc<InMemoryUserRepository>,
    pub metadata: Arc<InMemoryMetadataRepository>,
    pub instance: Arc<InMemoryInstanceRepository>,
    pub root: CompositionRoot,
}

pub fn setup_env(users: Vec<User>, roles: Vec<NamedRef>) -> TestEnv {
    let user_repo = InMemoryUserRepository::seeded(users);
    let metadata_repo = InMemoryMetadataRepository::seeded(roles, vec![]);
    let instance_repo = Arc::new(InMemoryInstanceRepository::default());

    let root = CompositionRoot::from_repositories(
        user_repo.clone(),
        metadata_repo.clone(),
        instance_repo.clone(),
    );

    TestEnv {
        users: user_repo,
        metadata: metadata_repo,
        instance: instance_repo,
        root,
    }
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Order-insensitive comparison of a reference set against expected ids.
pub fn assert_role_ids(user: &User, expected: &[&str]) {
    let mut actual: Vec<&str> = user.user_roles.iter().map(|r| r.id.as_str()).collect();
    actual.sort_unstable();
    let mut expected: Vec<&str> = expected.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected, "role set mismatch for {}", user.username);
}
