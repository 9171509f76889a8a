use std::time::Duration;

use serde_json::Value;

use crate::domain::entities::Instance;
use crate::domain::repository::{RepoResult, RepositoryError};

/// Thin wrapper over the instance's object API: base-URL joining, basic
/// auth, JSON in/out, and status-code → `RepositoryError` mapping. All
/// repositories built from one composition root share one client.
#[derive(Clone)]
pub struct D2ApiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl D2ApiClient {
    pub fn new(instance: &Instance) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        D2ApiClient {
            http,
            base_url: instance.base_url.trim_end_matches('/').to_string(),
            username: instance.username.clone(),
            password: instance.password.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> RepoResult<Value> {
        let response = self
            .http
            .get(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .send()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;

        Self::parse(path, response).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> RepoResult<Value> {
        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;

        Self::parse(path, response).await
    }

    async fn parse(path: &str, response: reqwest::Response) -> RepoResult<Value> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(path.to_string()));
        }
        if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Rejected(format!("{status}: {detail}")));
        }
        if status.is_server_error() {
            return Err(RepositoryError::Network(status.to_string()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RepositoryError::Network(format!("Bad response body: {e}")))
    }
}
