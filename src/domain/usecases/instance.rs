use std::sync::Arc;

use crate::domain::entities::Locale;
use crate::domain::repository::{InstanceRepository, RepoResult};

pub struct GetInstanceVersionUseCase {
    instance: Arc<dyn InstanceRepository>,
}

impl GetInstanceVersionUseCase {
    pub fn new(instance: Arc<dyn InstanceRepository>) -> Self {
        Self { instance }
    }

    pub async fn execute(&self) -> RepoResult<String> {
        self.instance.version().await
    }
}

pub struct GetInstanceLocalesUseCase {
    instance: Arc<dyn InstanceRepository>,
}

impl GetInstanceLocalesUseCase {
    pub fn new(instance: Arc<dyn InstanceRepository>) -> Self {
        Self { instance }
    }

    pub async fn execute(&self) -> RepoResult<Vec<Locale>> {
        self.instance.locales().await
    }
}
