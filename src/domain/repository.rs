use std::fmt;

use async_trait::async_trait;

use super::entities::{ListFilter, Locale, MetadataKind, NamedRef, User, UserPage};

/// Failures surfaced by a repository call. Every variant carries a message
/// suitable for showing to the operator; there is no unrecoverable class.
#[derive(Debug, Clone)]
pub enum RepositoryError {
    /// Transport-level failure talking to the remote instance.
    Network(String),
    /// The requested object does not exist on the instance.
    NotFound(String),
    /// The instance accepted the request but rejected the payload.
    Rejected(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Network(msg) => write!(f, "Network error: {msg}"),
            RepositoryError::NotFound(msg) => write!(f, "Not found: {msg}"),
            RepositoryError::Rejected(msg) => write!(f, "Rejected by instance: {msg}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Users on the remote instance. Saves are always batch saves of whole
/// user objects; there is no partial update.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn current(&self) -> RepoResult<User>;
    async fn get_by_id(&self, id: &str) -> RepoResult<User>;
    async fn get_many(&self, ids: &[String]) -> RepoResult<Vec<User>>;
    async fn list(&self, filter: &ListFilter) -> RepoResult<UserPage>;
    async fn list_all_ids(&self) -> RepoResult<Vec<String>>;
    async fn save(&self, users: &[User]) -> RepoResult<()>;
}

/// Read-only access to named metadata collections.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn list(&self, kind: MetadataKind) -> RepoResult<Vec<NamedRef>>;
}

/// Instance-level information.
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    async fn version(&self) -> RepoResult<String>;
    async fn locales(&self) -> RepoResult<Vec<Locale>>;
}
