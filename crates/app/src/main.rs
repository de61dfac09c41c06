use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::{HttpSessionResolver, OpenAiAdvisor, ServerState};

use crate::error::AppError;

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = settings::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerly={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = settings.app.timezone()?;
    let db = connect_database(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let sessions = HttpSessionResolver::new(
        &settings.auth.url,
        &settings.auth.api_key,
        settings.auth.timeout(),
    )?;
    let advisor = OpenAiAdvisor::new(
        &settings.advisor.base_url,
        settings.advisor.api_key.as_deref(),
        &settings.advisor.model,
        settings.advisor.timeout(),
    )?;
    tracing::info!(
        timezone = %timezone,
        model = %settings.advisor.model,
        "clients ready"
    );

    let state = ServerState {
        engine: Arc::new(engine),
        sessions: Arc::new(sessions),
        advisor: Arc::new(advisor),
        timezone,
        chat_history_limit: settings.advisor.history_limit,
    };

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, AppError> {
    let database = sea_orm::Database::connect(config.connection_url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database migrated");
    Ok(database)
}
