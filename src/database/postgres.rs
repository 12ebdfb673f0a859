/*!
 * PostgreSQL access for the document source.
 *
 * The query runs inside a read-only transaction that is rolled back once the
 * rows are read, so the server is never written to.
 */

use log::{info, warn};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo};
use std::fmt;

use crate::errors::AppError;
use super::source::LocalizedRow;

/// Port used when none is configured
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Connection parameters of a PostgreSQL server
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostgresSettings {
    /// Server host name or address
    #[serde(default)]
    pub host: String,

    /// Server port, 5432 when unset
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name
    #[serde(default)]
    pub database: String,

    /// Role to connect as
    #[serde(default)]
    pub user: Option<String>,

    /// Password of the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("port", &self.port())
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl PostgresSettings {
    /// Effective port
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_POSTGRES_PORT)
    }

    /// `postgres://user@host:port/database`, without the password
    pub fn describe(&self) -> String {
        let user = self.user.as_deref().map(|u| format!("{}@", u)).unwrap_or_default();
        format!("postgres://{}{}:{}/{}", user, self.host, self.port(), self.database)
    }

    /// Connection options for sqlx
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port())
            .database(&self.database);

        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }
}

/// Run `sql` on the server and collect the language and document columns of every row
pub async fn fetch_localized_rows(
    settings: &PostgresSettings,
    sql: &str,
    column_name: &str,
    language_column_name: &str,
) -> Result<Vec<LocalizedRow>, AppError> {
    info!("Connecting to {}", settings.describe());

    let mut conn = settings
        .connect_options()
        .connect()
        .await
        .map_err(|e| AppError::Source(format!("Failed to connect to {}: {}", settings.describe(), e)))?;

    let mut tx = conn.begin().await.map_err(query_error)?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;
    let rows = sqlx::query(sql).fetch_all(&mut *tx).await.map_err(query_error)?;
    tx.rollback().await.map_err(query_error)?;

    if let Err(e) = conn.close().await {
        warn!("Failed to close PostgreSQL connection cleanly: {}", e);
    }

    let mut localized = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(language) = column_text(row, language_column_name)? else {
            warn!("Skipping row with NULL language");
            continue;
        };
        let document_json = column_text(row, column_name)?;
        localized.push(LocalizedRow { language, document_json });
    }

    Ok(localized)
}

fn query_error(error: sqlx::Error) -> AppError {
    AppError::Source(format!("PostgreSQL query failed: {}", error))
}

/// Read a column as text; JSON columns are re-serialized, BYTEA must be UTF-8
fn column_text(row: &PgRow, name: &str) -> Result<Option<String>, AppError> {
    let column = row.try_column(name).map_err(|_| {
        let available: Vec<&str> = row.columns().iter().map(|c| c.name()).collect();
        AppError::Source(format!(
            "Column '{}' not found in query result (available: {})",
            name,
            available.join(", ")
        ))
    })?;
    let index = column.ordinal();
    let read_error = |e: sqlx::Error| AppError::Source(format!("Cannot read column '{}': {}", name, e));

    match column.type_info().name() {
        "JSON" | "JSONB" => Ok(row
            .try_get::<Option<serde_json::Value>, _>(index)
            .map_err(read_error)?
            .map(|value| value.to_string())),
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map_err(read_error)?
            .map(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| AppError::Source(format!("Column value is not valid UTF-8: {}", e)))
            })
            .transpose(),
        "INT2" => Ok(row.try_get::<Option<i16>, _>(index).map_err(read_error)?.map(|v| v.to_string())),
        "INT4" => Ok(row.try_get::<Option<i32>, _>(index).map_err(read_error)?.map(|v| v.to_string())),
        "INT8" => Ok(row.try_get::<Option<i64>, _>(index).map_err(read_error)?.map(|v| v.to_string())),
        _ => row.try_get::<Option<String>, _>(index).map_err(read_error),
    }
}
