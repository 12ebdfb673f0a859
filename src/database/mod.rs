/*!
 * Database module for loading the source document.
 *
 * This module provides read access to a SQLite or PostgreSQL database holding
 * one block-document per language:
 * - `connection`: SQLite connection handling with async-safe access
 * - `postgres`: PostgreSQL connection settings and read-only querying
 * - `source`: SQL-file driven lookup of the source-language document
 */

pub mod connection;
pub mod postgres;
pub mod source;

// Re-export main types
pub use connection::DatabaseConnection;
pub use postgres::PostgresSettings;
pub use source::{DatabaseBackend, DatabaseQuery, DocumentSource, LocalizedRow};
