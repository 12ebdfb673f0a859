/*!
 * Source document lookup.
 *
 * A source is either a JSON file holding one block-document, or a SQL query
 * run against a SQLite or PostgreSQL database that returns one row per
 * language. In the latter case the row whose language column matches the
 * source language is selected and its document column parsed.
 */

use log::{debug, info, warn};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::BlockDocument;
use super::postgres::{self, PostgresSettings};
use super::DatabaseConnection;

/// Database the query runs against
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseBackend {
    /// SQLite database file, opened read-only
    Sqlite(PathBuf),
    /// PostgreSQL server
    Postgres(PostgresSettings),
}

impl DatabaseBackend {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Sqlite(path) => format!("database {:?}", path),
            Self::Postgres(settings) => format!("database {}", settings.describe()),
        }
    }
}

/// Parameters of a database lookup
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseQuery {
    /// Where the query runs
    pub backend: DatabaseBackend,
    /// File holding the SQL query
    pub sql_query_path: PathBuf,
    /// Column holding the document JSON
    pub column_name: String,
    /// Column holding the language code
    pub language_column_name: String,
}

/// Where the source document is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// A JSON file
    File(PathBuf),
    /// A query against a database
    Database(DatabaseQuery),
}

/// One row of the query result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedRow {
    /// Language code of the row
    pub language: String,
    /// Document JSON, if the column is not NULL
    pub document_json: Option<String>,
}

impl DocumentSource {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file {:?}", path),
            Self::Database(query) => format!(
                "{} (query {:?}, column '{}')",
                query.backend.describe(),
                query.sql_query_path,
                query.column_name
            ),
        }
    }

    /// Load the source-language document
    pub async fn load(&self, source_language: &str, target_language: &str) -> Result<BlockDocument, AppError> {
        match self {
            Self::File(path) => {
                let json = FileManager::read_to_string(path).map_err(|e| AppError::Source(format!("{:#}", e)))?;
                Ok(BlockDocument::from_json_str(&json)?)
            }
            Self::Database(query) => query.load(source_language, target_language).await,
        }
    }
}

impl DatabaseQuery {
    /// Run the query and parse the document of the source-language row
    pub async fn load(&self, source_language: &str, target_language: &str) -> Result<BlockDocument, AppError> {
        let sql = FileManager::read_to_string(&self.sql_query_path)
            .map_err(|e| AppError::Source(format!("{:#}", e)))?;

        let rows = match &self.backend {
            DatabaseBackend::Sqlite(database_path) => {
                let db = DatabaseConnection::open_read_only(database_path)
                    .map_err(|e| AppError::Source(format!("{:#}", e)))?;

                let column = self.column_name.clone();
                let language_column = self.language_column_name.clone();
                db.execute_async(move |conn| Ok(fetch_localized_rows(conn, &sql, &column, &language_column)?))
                    .await
                    .map_err(|e| match e.downcast::<AppError>() {
                        Ok(app_error) => app_error,
                        Err(other) => AppError::Source(format!("{:#}", other)),
                    })?
            }
            DatabaseBackend::Postgres(settings) => {
                postgres::fetch_localized_rows(settings, &sql, &self.column_name, &self.language_column_name)
                    .await?
            }
        };

        debug!("Query returned {} row(s)", rows.len());

        let source_row = select_row(&rows, source_language).ok_or_else(|| {
            AppError::Source(format!(
                "No row with language '{}' in column '{}'",
                source_language, self.language_column_name
            ))
        })?;

        match select_row(&rows, target_language) {
            Some(_) => info!("A '{}' row already exists; it is not modified", target_language),
            None => debug!("No existing '{}' row", target_language),
        }

        let json = source_row.document_json.as_deref().ok_or_else(|| {
            AppError::Source(format!(
                "Column '{}' is NULL for language '{}'",
                self.column_name, source_language
            ))
        })?;

        Ok(BlockDocument::from_json_str(json)?)
    }
}

/// Run `sql` on SQLite and collect the language and document columns of every row
pub fn fetch_localized_rows(
    conn: &Connection,
    sql: &str,
    column_name: &str,
    language_column_name: &str,
) -> Result<Vec<LocalizedRow>, AppError> {
    let mut stmt = conn.prepare(sql)?;

    let column_names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let find_column = |name: &str| {
        column_names.iter().position(|c| c == name).ok_or_else(|| {
            AppError::Source(format!(
                "Column '{}' not found in query result (available: {})",
                name,
                column_names.join(", ")
            ))
        })
    };
    let document_index = find_column(column_name)?;
    let language_index = find_column(language_column_name)?;

    let mut rows = stmt.query([])?;
    let mut localized = Vec::new();

    while let Some(row) = rows.next()? {
        let Some(language) = value_to_string(row.get_ref(language_index)?)? else {
            warn!("Skipping row with NULL language");
            continue;
        };
        let document_json = value_to_string(row.get_ref(document_index)?)?;
        localized.push(LocalizedRow { language, document_json });
    }

    Ok(localized)
}

/// First row whose language matches `language`
pub fn select_row<'a>(rows: &'a [LocalizedRow], language: &str) -> Option<&'a LocalizedRow> {
    rows.iter()
        .find(|row| language_utils::language_codes_match(&row.language, language))
}

fn value_to_string(value: ValueRef<'_>) -> Result<Option<String>, AppError> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| AppError::Source(format!("Column value is not valid UTF-8: {}", e))),
    }
}
