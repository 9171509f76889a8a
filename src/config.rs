use crate::domain::entities::Instance;

/// Runtime configuration, read from the environment (a `.env` file is
/// honored via dotenvy in `main`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub instance: Instance,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let base_url =
            std::env::var("D2_BASE_URL").map_err(|_| "D2_BASE_URL is required".to_string())?;
        let username =
            std::env::var("D2_USERNAME").map_err(|_| "D2_USERNAME is required".to_string())?;
        let password =
            std::env::var("D2_PASSWORD").map_err(|_| "D2_PASSWORD is required".to_string())?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        Ok(AppConfig {
            bind_addr,
            instance: Instance { base_url, username, password },
        })
    }
}
