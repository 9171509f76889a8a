use std::sync::Arc;

use crate::domain::entities::{MetadataKind, NamedRef};
use crate::domain::repository::{MetadataRepository, RepoResult};

pub struct ListMetadataUseCase {
    metadata: Arc<dyn MetadataRepository>,
}

impl ListMetadataUseCase {
    pub fn new(metadata: Arc<dyn MetadataRepository>) -> Self {
        Self { metadata }
    }

    pub async fn execute(&self, kind: MetadataKind) -> RepoResult<Vec<NamedRef>> {
        self.metadata.list(kind).await
    }
}
