use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use sos_intake::AppResources;
use sos_intake::api::start_webserver;
use sos_intake::config::load_config_or_panic;
use sos_intake::oidc::OidcClient;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "sos_intake=info,tower_http=info,sea_orm=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install().expect("Failed to install `color_eyre::install`");

    initialize_tracing();

    // Load config
    let config = Arc::new(load_config_or_panic());

    // Set up SeaORM database connection and bring the schema up to date.
    // The alerts table is auto-created on a fresh database.
    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );
    Migrator::up(db.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    let oidc = Arc::new(OidcClient::new(config.oidc.clone()));

    let resources = AppResources { db, config, oidc };
    tracing::info!(
        allowed_domain = %resources.oidc.config().allowed_domain,
        "student gate configured"
    );

    start_webserver(resources).await?;
    Ok(())
}
