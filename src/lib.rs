/*!
 * # editorjs-translator
 *
 * A Rust library for translating EditorJS-style block documents.
 *
 * ## Features
 *
 * - Per-block-type field selection (forbidden types, per-type field lists,
 *   a default field for everything else)
 * - Structure-preserving transformation: only the selected text fields change
 * - Translation providers:
 *   - Google Translate web endpoint
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Fixed delay before every request, optional retry and cache
 * - Source documents from a JSON file or a SQLite query
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Document model and translation:
 *   - `translation::document`: Block-document model
 *   - `translation::policy`: Field-selection policy
 *   - `translation::transformer`: Document transformer
 *   - `translation::core`: Translation gateway and service
 *   - `translation::cache`: Translation memoization
 * - `providers`: Client implementations for the translation backends
 * - `database`: SQLite access and source document lookup
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions, RunSummary};
pub use translation::{
    Block, BlockDocument, DocumentTransformer, FieldPolicy, TransformReport, TranslationGateway,
    TranslationService,
};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use errors::{AppError, ProviderError, TranslationError};
