use async_trait::async_trait;

use crate::domain::entities::{MetadataKind, NamedRef};
use crate::domain::repository::{MetadataRepository, RepoResult, RepositoryError};

use super::api_client::D2ApiClient;

pub struct ApiMetadataRepository {
    client: D2ApiClient,
}

impl ApiMetadataRepository {
    pub fn new(client: D2ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataRepository for ApiMetadataRepository {
    async fn list(&self, kind: MetadataKind) -> RepoResult<Vec<NamedRef>> {
        let mut value = self
            .client
            .get_json(
                kind.key(),
                &[
                    ("paging", "false".to_string()),
                    ("fields", "id,name".to_string()),
                    ("order", "name:asc".to_string()),
                ],
            )
            .await?;

        // The object API keys the collection by its endpoint name.
        let objects = value[kind.key()].take();
        serde_json::from_value(objects)
            .map_err(|e| RepositoryError::Network(format!("Bad metadata payload: {e}")))
    }
}
