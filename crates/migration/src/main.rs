use config::{Config, Environment, File};
use sea_orm_migration::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    // run_cli reads DATABASE_URL; fall back to the server's configuration
    // sources (config.yaml plus `__`-separated env overrides) when it is
    // not set directly.
    if env::var("DATABASE_URL").is_err() {
        let settings = Config::builder()
            .add_source(File::with_name("config.yaml"))
            .add_source(Environment::default().separator("__"))
            .build()
            .expect("Failed to load configuration");
        let url = settings
            .get_string("database_url")
            .expect("database_url missing from configuration");
        env::set_var("DATABASE_URL", url);
    }
    cli::run_cli(migration::Migrator).await;
}
