use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, constants::Env};

/// Connects to the history database and applies pending migrations.
/// Returns `None` when no `DATABASE_URL` is configured.
pub async fn connect_database(env: &Env) -> Result<Option<PgPool>, error::SystemError> {
    let Some(database_url) = env.database_url.as_deref() else {
        log::warn!("DATABASE_URL not set, upload history is disabled");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| error::SystemError::InternalError(Box::new(e)))?;

    Ok(Some(pool))
}

/// Shared outbound HTTP client for the OCR and generative-AI services.
pub fn http_client() -> Result<reqwest::Client, error::SystemError> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| error::SystemError::InternalError(Box::new(e)))
}
