use enrollgate::configuration::{get_configuration, DatabaseSettings};
use enrollgate::telemetry::{get_subscriber, init_subscriber};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Set TEST_LOG=1 to get bunyan-formatted spans from the code under test.
pub fn init_telemetry() {
    TRACING.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = get_subscriber("enrollgate-test".to_string(), "debug".to_string());
            init_subscriber(subscriber);
        }
    });
}

/// Create a throwaway uuid-named database and run migrations against it.
/// Returns `None` (so the caller can skip) when Postgres is unreachable.
pub async fn spawn_db() -> Option<PgPool> {
    init_telemetry();

    let mut configuration = match get_configuration() {
        Ok(configuration) => configuration,
        Err(err) => {
            eprintln!("Skipping tests: failed to read configuration: {}", err);
            return None;
        }
    };
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    match configure_database(&configuration.database).await {
        Ok(pool) => Some(pool),
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            None
        }
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}
