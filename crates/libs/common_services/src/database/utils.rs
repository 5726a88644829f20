use app_state::DatabaseSettings;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Connect, run migrations, and return the shared connection pool.
pub async fn get_db_pool(
    database_url: &str,
    settings: &DatabaseSettings,
) -> color_eyre::Result<Pool<Postgres>> {
    info!("Connecting to database.");
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .max_lifetime(Duration::from_secs(settings.max_lifetime))
        .idle_timeout(Duration::from_secs(settings.idle_timeout))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;
    sqlx::migrate!("../../../migrations").run(&pool).await?;
    Ok(pool)
}

/// Short random alphanumeric id for database rows.
#[must_use]
pub fn new_short_id(length: usize) -> String {
    (0..length).map(|_| fastrand::alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::new_short_id;

    #[test]
    fn ids_have_requested_length_and_vary() {
        let a = new_short_id(12);
        let b = new_short_id(12);
        assert_eq!(a.len(), 12);
        assert_eq!(b.len(), 12);
        assert!(a.chars().all(char::is_alphanumeric));
        assert_ne!(a, b);
    }
}
