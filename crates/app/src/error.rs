use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid setting: {0}")]
    Setting(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("auth client error: {0}")]
    Auth(#[from] server::AuthError),
    #[error("advisor client error: {0}")]
    Advisor(#[from] server::AdvisorError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
