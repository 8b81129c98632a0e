//! Application configuration read from environment variables.
//!
//! Only packaging metadata and the location of the store live here; nothing
//! in this struct changes how the data layer behaves.

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct AppConfig {
    /// Environment name: "local", "dev" or "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// SQLite url of the store
    /// Example: "sqlite:animalia.db?mode=rwc", "sqlite::memory:"
    #[envconfig(default = "sqlite:animalia.db?mode=rwc")]
    pub db_host: String,

    /// Application identifier used when packaging the mobile shell
    #[envconfig(default = "io.ionic.starter")]
    pub app_id: String,

    /// Display name of the app
    #[envconfig(default = "animalia")]
    pub app_name: String,

    /// Directory holding the built web assets
    #[envconfig(default = "dist")]
    pub web_dir: String,

    /// One of: off, error, warn, info, debug, trace
    #[envconfig(default = "info")]
    pub log_level: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_host.contains(":memory:")
    }
}
