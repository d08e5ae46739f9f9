use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_IMPORT_MAX_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the credit-transfer REST backend
    pub api_base_url: String,
    pub host: String,
    pub port: u16,

    // Query cache
    pub query_stale_secs: u64,
    pub query_cache_capacity: u64,

    // Sessions
    pub session_idle_hours: i64,
    pub cookie_secure: bool,

    pub static_dir: String,

    /// Largest accepted import request body
    pub import_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("query_stale_secs", 30)?
            .set_default("query_cache_capacity", 1000)?
            .set_default("session_idle_hours", 24)?
            .set_default("cookie_secure", false)?
            .set_default("static_dir", "web/static")?
            .set_default("import_max_bytes", DEFAULT_IMPORT_MAX_BYTES as u64)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        let config = Self {
            api_base_url: config.get("api_base_url")?,
            host: config.get("host")?,
            port: config.get("port")?,

            query_stale_secs: config.get("query_stale_secs")?,
            query_cache_capacity: config.get("query_cache_capacity")?,

            session_idle_hours: config.get("session_idle_hours")?,
            cookie_secure: config.get("cookie_secure")?,

            static_dir: config.get("static_dir")?,
            import_max_bytes: config.get("import_max_bytes")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration pointing at `api_base_url` with every other value defaulted
    pub fn for_backend(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            query_stale_secs: 30,
            query_cache_capacity: 1000,
            session_idle_hours: 24,
            cookie_secure: false,
            static_dir: "web/static".to_string(),
            import_max_bytes: DEFAULT_IMPORT_MAX_BYTES,
        }
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        url::Url::parse(&self.api_base_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "API_BASE_URL is not a valid URL ({}): {}",
                self.api_base_url, e
            ))
        })?;
        Ok(())
    }
}
