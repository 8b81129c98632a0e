pub mod action;
pub mod config;
pub mod utils;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load_app_config()?;
    animalia::logger::setup_simple_logger(&app_config.log_level)?;

    let args = action::AppArgs::parse();

    args.run(&app_config).await
}
