use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::entities::{ListFilter, User, UserPage};
use crate::domain::repository::{RepoResult, RepositoryError, UserRepository};

use super::api_client::D2ApiClient;

/// Field set requested for every user read; matches the `User` entity.
const USER_FIELDS: &str =
    "id,name,username,disabled,userRoles[id,name],userGroups[id,name],organisationUnits[id,name]";

pub struct ApiUserRepository {
    client: D2ApiClient,
}

impl ApiUserRepository {
    pub fn new(client: D2ApiClient) -> Self {
        Self { client }
    }

    fn users_from(mut value: Value) -> RepoResult<Vec<User>> {
        let users = value["users"].take();
        serde_json::from_value(users)
            .map_err(|e| RepositoryError::Network(format!("Bad user list payload: {e}")))
    }
}

#[async_trait]
impl UserRepository for ApiUserRepository {
    async fn current(&self) -> RepoResult<User> {
        let value = self
            .client
            .get_json("me", &[("fields", USER_FIELDS.to_string())])
            .await?;
        serde_json::from_value(value)
            .map_err(|e| RepositoryError::Network(format!("Bad user payload: {e}")))
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<User> {
        let value = self
            .client
            .get_json(&format!("users/{id}"), &[("fields", USER_FIELDS.to_string())])
            .await?;
        serde_json::from_value(value)
            .map_err(|e| RepositoryError::Network(format!("Bad user payload: {e}")))
    }

    async fn get_many(&self, ids: &[String]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let value = self
            .client
            .get_json(
                "users",
                &[
                    ("paging", "false".to_string()),
                    ("fields", USER_FIELDS.to_string()),
                    ("filter", format!("id:in:[{}]", ids.join(","))),
                ],
            )
            .await?;
        Self::users_from(value)
    }

    async fn list(&self, filter: &ListFilter) -> RepoResult<UserPage> {
        let mut query = vec![
            ("page", filter.page.to_string()),
            ("pageSize", filter.page_size.to_string()),
            ("fields", USER_FIELDS.to_string()),
            ("order", "username:asc".to_string()),
        ];
        if let Some(q) = &filter.query {
            query.push(("query", q.clone()));
        }

        let mut value = self.client.get_json("users", &query).await?;
        let pager = value["pager"].take();
        let users = Self::users_from(value)?;

        Ok(UserPage {
            users,
            page: pager["page"].as_i64().unwrap_or(filter.page),
            page_size: pager["pageSize"].as_i64().unwrap_or(filter.page_size),
            total_count: pager["total"].as_i64().unwrap_or(0),
            total_pages: pager["pageCount"].as_i64().unwrap_or(0),
        })
    }

    async fn list_all_ids(&self) -> RepoResult<Vec<String>> {
        let value = self
            .client
            .get_json(
                "users",
                &[("paging", "false".to_string()), ("fields", "id".to_string())],
            )
            .await?;
        let ids = value["users"]
            .as_array()
            .map(|users| {
                users
                    .iter()
                    .filter_map(|u| u["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn save(&self, users: &[User]) -> RepoResult<()> {
        let body = json!({ "users": users });
        let value = self
            .client
            .post_json(
                "metadata",
                &[("importStrategy", "CREATE_AND_UPDATE".to_string())],
                &body,
            )
            .await?;

        // The metadata import reports success in-band.
        let status = value["status"].as_str().unwrap_or("ERROR");
        if status == "OK" || status == "SUCCESS" {
            Ok(())
        } else {
            Err(RepositoryError::Rejected(format!("Import status {status}")))
        }
    }
}
