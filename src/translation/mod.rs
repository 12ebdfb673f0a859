/*!
 * Block-document translation.
 *
 * This module contains the translation core. It is split into several submodules:
 *
 * - `core`: The translation gateway seam and the provider-backed service
 * - `cache`: Optional memoization of translations
 * - `document`: Block-document model
 * - `policy`: Field-selection policy deciding which fields get translated
 * - `transformer`: Document walk writing translated text back in place
 */

// Re-export main types for easier usage
pub use self::core::{TranslationGateway, TranslationOptions, TranslationService};
pub use self::document::{Block, BlockDocument};
pub use self::policy::{FieldPolicy, FieldSelection};
pub use self::transformer::{BlockSkip, DocumentTransformer, FieldRef, SkipReason, TransformReport};

// Submodules
pub mod cache;
pub mod core;
pub mod document;
pub mod policy;
pub mod transformer;
