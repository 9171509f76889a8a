use async_trait::async_trait;

use crate::domain::entities::Locale;
use crate::domain::repository::{InstanceRepository, RepoResult, RepositoryError};

use super::api_client::D2ApiClient;

pub struct ApiInstanceRepository {
    client: D2ApiClient,
}

impl ApiInstanceRepository {
    pub fn new(client: D2ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InstanceRepository for ApiInstanceRepository {
    async fn version(&self) -> RepoResult<String> {
        let value = self.client.get_json("system/info", &[]).await?;
        value["version"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| RepositoryError::Network("system/info has no version".to_string()))
    }

    async fn locales(&self) -> RepoResult<Vec<Locale>> {
        let value = self.client.get_json("locales/ui", &[]).await?;
        serde_json::from_value(value)
            .map_err(|e| RepositoryError::Network(format!("Bad locales payload: {e}")))
    }
}
