use animalia::AppConfig;
use anyhow::Context;
use envconfig::Envconfig;

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    AppConfig::init_from_env().context("failed to read app config from env")
}
