/*!
 * Block-document transformer.
 *
 * Walks the blocks of a document in order and sends the fields selected by
 * the `FieldPolicy` through a `TranslationGateway`, writing the translated
 * text back in place on an independent copy of the document. Blocks and
 * fields are processed strictly one after the other.
 */

use log::debug;
use serde_json::Value;
use std::fmt;

use crate::errors::TranslationError;
use super::core::TranslationGateway;
use super::document::{Block, BlockDocument};
use super::policy::{FieldPolicy, FieldSelection};

/// One data field of one block
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldRef {
    /// Position of the block in the document
    pub block_index: usize,
    /// Type discriminator of the block
    pub block_type: String,
    /// Key inside the block's `data`
    pub field: String,
}

impl FieldRef {
    fn new(block_index: usize, block_type: &str, field: &str) -> Self {
        Self {
            block_index,
            block_type: block_type.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}.{}", self.block_index, self.block_type, self.field)
    }
}

/// Why a whole block was passed through unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The block has no `data` object
    MissingData,
    /// The block has no string `type`
    MissingType,
    /// The block type is forbidden by the policy
    ForbiddenType,
    /// None of the selected fields is present in `data`
    NoTranslatableField,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingData => "block does not have data",
            Self::MissingType => "block does not have a type",
            Self::ForbiddenType => "block type is forbidden",
            Self::NoTranslatableField => "no translatable field present",
        };
        f.write_str(reason)
    }
}

/// A block passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSkip {
    /// Position of the block in the document
    pub block_index: usize,
    /// Type discriminator, if the block has one
    pub block_type: Option<String>,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// What a transformation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Fields whose value was replaced, in document order
    pub translated: Vec<FieldRef>,
    /// Blocks left untouched as a whole
    pub skipped: Vec<BlockSkip>,
    /// Selected fields left untouched because their value is not a string
    pub non_text_fields: Vec<FieldRef>,
}

impl TransformReport {
    /// Number of translated fields
    pub fn translated_count(&self) -> usize {
        self.translated.len()
    }

    /// Number of blocks skipped for the given reason
    pub fn skipped_count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|skip| skip.reason == reason).count()
    }
}

/// Per-block decision
enum BlockPlan<'p> {
    Skip(SkipReason),
    Translate(Vec<&'p str>),
}

/// Translates the selected fields of a block-document
#[derive(Debug)]
pub struct DocumentTransformer<G> {
    gateway: G,
    policy: FieldPolicy,
}

impl<G: TranslationGateway> DocumentTransformer<G> {
    /// Create a transformer around a gateway and a policy
    pub fn new(gateway: G, policy: FieldPolicy) -> Self {
        Self { gateway, policy }
    }

    /// The gateway translations go through
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The field-selection policy in use
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    fn plan_block(&self, block: &Block) -> BlockPlan<'_> {
        let Some(data) = block.data() else {
            return BlockPlan::Skip(SkipReason::MissingData);
        };
        let Some(block_type) = block.block_type() else {
            return BlockPlan::Skip(SkipReason::MissingType);
        };

        match self.policy.select(block_type) {
            FieldSelection::Forbidden => BlockPlan::Skip(SkipReason::ForbiddenType),
            FieldSelection::Specific(_) | FieldSelection::Default(_) => {
                let fields = self.policy.fields_to_translate(block_type, data);
                if fields.is_empty() {
                    BlockPlan::Skip(SkipReason::NoTranslatableField)
                } else {
                    BlockPlan::Translate(fields)
                }
            }
        }
    }

    /// Fields `transform` would translate, without calling the gateway
    pub fn plan(&self, document: &BlockDocument) -> Vec<FieldRef> {
        let mut planned = Vec::new();

        for (block_index, block) in document.blocks.iter().enumerate() {
            if let (BlockPlan::Translate(fields), Some(block_type), Some(data)) =
                (self.plan_block(block), block.block_type(), block.data())
            {
                planned.extend(
                    fields
                        .into_iter()
                        .filter(|field| data.get(*field).is_some_and(Value::is_string))
                        .map(|field| FieldRef::new(block_index, block_type, field)),
                );
            }
        }

        planned
    }

    /// Translate a document; the input is left untouched.
    ///
    /// The first gateway failure aborts the whole pass and nothing is returned.
    pub async fn transform(
        &self,
        document: &BlockDocument,
        source_language: &str,
        target_language: &str,
    ) -> Result<(BlockDocument, TransformReport), TranslationError> {
        self.transform_with_progress(document, source_language, target_language, |_| {})
            .await
    }

    /// Same as `transform`, calling `on_field` after each translated field
    pub async fn transform_with_progress<F>(
        &self,
        document: &BlockDocument,
        source_language: &str,
        target_language: &str,
        mut on_field: F,
    ) -> Result<(BlockDocument, TransformReport), TranslationError>
    where
        F: FnMut(&FieldRef),
    {
        let mut output = document.clone();
        let mut report = TransformReport::default();

        for (block_index, block) in output.blocks.iter_mut().enumerate() {
            let fields = match self.plan_block(block) {
                BlockPlan::Skip(reason) => {
                    debug!(
                        "Block #{} ({}) skipped: {}",
                        block_index,
                        block.block_type().unwrap_or("untyped"),
                        reason
                    );
                    report.skipped.push(BlockSkip {
                        block_index,
                        block_type: block.block_type().map(str::to_string),
                        reason,
                    });
                    continue;
                }
                BlockPlan::Translate(fields) => fields,
            };

            let block_type = block.block_type().unwrap_or_default().to_string();
            debug!("Block #{} ({}) translating fields: {}", block_index, block_type, fields.join(", "));

            let Some(data) = block.data_mut() else {
                continue;
            };

            for field in fields {
                let field_ref = FieldRef::new(block_index, &block_type, field);
                let Some(value) = data.get_mut(field) else {
                    continue;
                };

                let Some(text) = value.as_str() else {
                    debug!("Field {} is not text, left untouched", field_ref);
                    report.non_text_fields.push(field_ref);
                    continue;
                };

                let translated = self
                    .gateway
                    .translate(text, source_language, target_language)
                    .await
                    .map_err(|source| TranslationError::Service {
                        block_index,
                        block_type: block_type.clone(),
                        field: field.to_string(),
                        source,
                    })?;

                *value = Value::String(translated);
                on_field(&field_ref);
                report.translated.push(field_ref);
            }
        }

        Ok((output, report))
    }
}
