use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS experiences (
        id          BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        title       JSONB NOT NULL DEFAULT '{}'::jsonb,
        company     JSONB NOT NULL DEFAULT '{}'::jsonb,
        period      JSONB NOT NULL DEFAULT '{}'::jsonb,
        description JSONB NOT NULL DEFAULT '{}'::jsonb,
        order_index INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contact_info (
        id    BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        type  TEXT NOT NULL,
        value TEXT NOT NULL DEFAULT '',
        label TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS content (
        key        TEXT NOT NULL,
        language   TEXT NOT NULL,
        value      TEXT NOT NULL DEFAULT '',
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (key, language)
    )
    "#,
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the site tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Schema verified");
    Ok(())
}
