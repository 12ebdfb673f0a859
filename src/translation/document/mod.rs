/*!
 * Block-document modeling.
 *
 * This module provides the document types the transformer walks:
 * - `BlockDocument`: the top-level record holding an ordered list of blocks
 * - `Block`: one content unit with a type discriminator and optional data
 *
 * Both types keep every key they do not interpret, so a document written
 * back out has the same shape it was read with.
 */

pub mod model;

// Re-export types used by other modules
pub use model::{Block, BlockDocument};
