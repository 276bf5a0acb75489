use async_trait::async_trait;
use snip_core::repository::{NewShortLink, ReadRepository, Repository, Result, ShortLink};
use snip_core::{ListRange, ShortCode, StorageError};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::debug;

const SCHEMA: [&str; 2] = [
    include_str!("../ddl/postgres/short_links.sql"),
    include_str!("../ddl/postgres/short_links_code_index.sql"),
];

/// PostgreSQL implementation of the repository contract.
///
/// Ids come from the `BIGSERIAL` sequence of `short_links.id`. Deletes are
/// hard deletes. The `code` column is indexed but not unique.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `short_links` table and its index if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        debug!("short_links schema is in place");
        Ok(())
    }
}

fn to_db_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| StorageError::InvalidData(format!("id {} exceeds BIGINT", id)))
}

fn from_db_id(id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| StorageError::InvalidData(format!("negative id {}", id)))
}

fn clamp_to_db(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn row_to_link(row: &PgRow) -> Result<ShortLink> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let source: String = row.try_get("source").map_err(map_sqlx_error)?;
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;

    Ok(ShortLink {
        id: from_db_id(id)?,
        source,
        code: ShortCode::new_unchecked(code),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for PostgresRepository {
    async fn get(&self, id: u64) -> Result<Option<ShortLink>> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            SELECT id, source, code
            FROM short_links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        let row = sqlx::query(
            r#"
            SELECT id, source, code
            FROM short_links
            WHERE code = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn list(&self, range: ListRange) -> Result<Vec<ShortLink>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source, code
            FROM short_links
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(clamp_to_db(range.count()))
        .bind(clamp_to_db(range.start()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_link).collect()
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn last_id(&self) -> Result<Option<u64>> {
        // NULL until the sequence has handed out its first value.
        let last: Option<i64> = sqlx::query_scalar(
            "SELECT pg_sequence_last_value(pg_get_serial_sequence('short_links', 'id')::regclass)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        last.map(from_db_id).transpose()
    }

    async fn next_id(&self) -> Result<u64> {
        let id: i64 = sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('short_links', 'id'))")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        from_db_id(id)
    }

    async fn insert(&self, link: &ShortLink) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (id, source, code)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(to_db_id(link.id)?)
        .bind(&link.source)
        .bind(link.code.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(format!("id {}", link.id)))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn insert_generated(&self, link: NewShortLink) -> Result<ShortLink> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO short_links (source, code)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&link.source)
        .bind(link.code.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(link.with_id(from_db_id(id)?))
    }

    async fn update(&self, link: &ShortLink) -> Result<bool> {
        let Ok(id) = i64::try_from(link.id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET source = $1, code = $2
            WHERE id = $3
            "#,
        )
        .bind(&link.source)
        .bind(link.code.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM short_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
