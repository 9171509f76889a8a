//! API-backed repository implementations. The remote instance's behavior
//! is an external collaborator; these adapters only translate shapes and
//! map transport failures into `RepositoryError`.

mod api_client;
mod instance_repo;
mod metadata_repo;
mod user_repo;

pub use api_client::D2ApiClient;
pub use instance_repo::ApiInstanceRepository;
pub use metadata_repo::ApiMetadataRepository;
pub use user_repo::ApiUserRepository;
