//! Statement execution.
//!
//! # Architecture
//!
//! The executor uses database-specific implementations organized in submodules:
//! - `mysql`, `postgres`, `sqlite`: sqlx pools
//! - `sqlserver`: a single tiberius client
//!
//! Each submodule provides identical functionality adapted to the driver. Values
//! arrive already laid out positionally (see [`crate::db::params::bind_named`]).
//! With no values the SQL is sent raw, avoiding prepared statements for text that
//! does not support them.

use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{JsonRow, QueryParam};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Await `fut`, bounded by `deadline` when one is given.
pub async fn with_deadline<T, F>(operation: &str, deadline: Option<Duration>, fut: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match deadline {
        Some(limit) => match timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(timeout_error(operation, limit)),
        },
        None => fut.await,
    }
}

fn timeout_error(operation: &str, limit: Duration) -> DbError {
    DbError::timeout(operation, limit.as_secs())
}

fn to_json_rows<R: RowToJson>(rows: Vec<R>) -> Vec<JsonRow> {
    rows.iter().map(RowToJson::to_json_map).collect()
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================
//
// Each module below provides the same interface adapted to its driver.
// The code structure is intentionally parallel to make differences obvious.

pub mod mysql {
    use super::*;
    use sqlx::MySqlPool;
    use sqlx::mysql::MySqlArguments;

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<Vec<JsonRow>> {
        let rows = if params.is_empty() {
            use sqlx::Executor;
            pool.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.fetch_all(pool).await?
        };
        Ok(to_json_rows(rows))
    }

    pub async fn execute(pool: &MySqlPool, sql: &str, params: &[QueryParam]) -> DbResult<u64> {
        // Some SQL like CREATE PROCEDURE doesn't support prepared statements
        let result = if params.is_empty() {
            use sqlx::Executor;
            pool.execute(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.execute(pool).await?
        };
        Ok(result.rows_affected())
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>,
        param: &'q QueryParam,
    ) -> sqlx::query::Query<'q, sqlx::MySql, MySqlArguments> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(v) => query.bind(*v),
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::String(v) => query.bind(v.as_str()),
            QueryParam::Json(v) => query.bind(sqlx::types::Json(v)),
        }
    }
}

pub mod postgres {
    use super::*;
    use sqlx::PgPool;
    use sqlx::postgres::PgArguments;

    pub async fn fetch_rows(
        pool: &PgPool,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<Vec<JsonRow>> {
        let rows = if params.is_empty() {
            use sqlx::Executor;
            pool.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.fetch_all(pool).await?
        };
        Ok(to_json_rows(rows))
    }

    pub async fn execute(pool: &PgPool, sql: &str, params: &[QueryParam]) -> DbResult<u64> {
        let result = if params.is_empty() {
            use sqlx::Executor;
            pool.execute(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.execute(pool).await?
        };
        Ok(result.rows_affected())
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
        param: &'q QueryParam,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(v) => query.bind(*v),
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::String(v) => query.bind(v.as_str()),
            QueryParam::Json(v) => query.bind(sqlx::types::Json(v)),
        }
    }
}

pub mod sqlite {
    use super::*;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqliteArguments;

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<Vec<JsonRow>> {
        let rows = if params.is_empty() {
            use sqlx::Executor;
            pool.fetch_all(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.fetch_all(pool).await?
        };
        Ok(to_json_rows(rows))
    }

    pub async fn execute(pool: &SqlitePool, sql: &str, params: &[QueryParam]) -> DbResult<u64> {
        let result = if params.is_empty() {
            use sqlx::Executor;
            pool.execute(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_param(query, param);
            }
            query.execute(pool).await?
        };
        Ok(result.rows_affected())
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
        param: &'q QueryParam,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(v) => query.bind(*v),
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Float(v) => query.bind(*v),
            QueryParam::String(v) => query.bind(v.as_str()),
            // SQLite has no JSON type - bind as text
            QueryParam::Json(v) => query.bind(v.to_string()),
        }
    }
}

pub mod sqlserver {
    use super::*;
    use std::borrow::Cow;
    use tiberius::{Client, ColumnData, ToSql};
    use tokio::net::TcpStream;
    use tokio_util::compat::Compat;

    pub type SqlServerClient = Client<Compat<TcpStream>>;

    impl ToSql for QueryParam {
        fn to_sql(&self) -> ColumnData<'_> {
            match self {
                QueryParam::Null => ColumnData::String(None),
                QueryParam::Bool(v) => ColumnData::Bit(Some(*v)),
                QueryParam::Int(v) => ColumnData::I64(Some(*v)),
                QueryParam::Float(v) => ColumnData::F64(Some(*v)),
                QueryParam::String(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
                QueryParam::Json(v) => ColumnData::String(Some(Cow::Owned(v.to_string()))),
            }
        }
    }

    fn as_refs(params: &[QueryParam]) -> Vec<&dyn ToSql> {
        params.iter().map(|p| p as &dyn ToSql).collect()
    }

    pub async fn fetch_rows(
        client: &mut SqlServerClient,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<Vec<JsonRow>> {
        let stream = if params.is_empty() {
            client.simple_query(sql).await?
        } else {
            client.query(sql, &as_refs(params)).await?
        };
        let rows = stream.into_first_result().await?;
        Ok(to_json_rows(rows))
    }

    pub async fn execute(
        client: &mut SqlServerClient,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<u64> {
        let result = client.execute(sql, &as_refs(params)).await?;
        Ok(result.total())
    }
}
