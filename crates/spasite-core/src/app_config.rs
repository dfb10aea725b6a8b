use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which document-store backend the binaries should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Present whenever `store_backend` is [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub reviews_url: String,
    pub hours_url: String,
    pub upstream_timeout_secs: u64,
    /// Lower-cased admin e-mail allow-list.
    pub admin_emails: Vec<String>,
    pub identity_url: Option<String>,
    pub sync_cron: String,
    pub catalog_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("store_backend", &self.store_backend)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("reviews_url", &self.reviews_url)
            .field("hours_url", &self.hours_url)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("admin_emails", &self.admin_emails.len())
            .field("identity_url", &self.identity_url)
            .field("sync_cron", &self.sync_cron)
            .field("catalog_path", &self.catalog_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
