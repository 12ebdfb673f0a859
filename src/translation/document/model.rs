/*!
 * Core document model types for block-document translation.
 *
 * A block-document is a JSON object whose `blocks` array holds the content
 * units. Blocks are kept as raw JSON objects so that keys this crate does not
 * know about (`id`, `tunes`, `time`, `version`, ...) survive a round trip.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the block type discriminator
pub const TYPE_KEY: &str = "type";

/// Key holding the block payload
pub const DATA_KEY: &str = "data";

/// Top-level block-document.
///
/// Only `blocks` is interpreted; every other top-level key is carried in
/// `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    /// Ordered content blocks
    pub blocks: Vec<Block>,

    /// Top-level keys other than `blocks`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockDocument {
    /// Create a document holding the given blocks and nothing else
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            extra: Map::new(),
        }
    }

    /// Parse a document from its JSON text
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build a document from an already parsed JSON value
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Serialize the document, compact or pretty-printed
    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One content unit of a block-document.
///
/// Wraps the raw JSON object of the block. Accessors return `None` when the
/// expected key is absent or has an unexpected JSON type, and the block is
/// then treated as opaque.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(Map<String, Value>);

impl Block {
    /// Create a block with a type and a data payload
    pub fn new(block_type: impl Into<String>, data: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_KEY.to_string(), Value::String(block_type.into()));
        fields.insert(DATA_KEY.to_string(), data);
        Self(fields)
    }

    /// Create a block that carries only a type
    pub fn without_data(block_type: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_KEY.to_string(), Value::String(block_type.into()));
        Self(fields)
    }

    /// Wrap an existing JSON object
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The type discriminator, if present and a string
    pub fn block_type(&self) -> Option<&str> {
        self.0.get(TYPE_KEY).and_then(Value::as_str)
    }

    /// The data payload, if present and a JSON object
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.0.get(DATA_KEY).and_then(Value::as_object)
    }

    /// Mutable access to the data payload
    pub fn data_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.0.get_mut(DATA_KEY).and_then(Value::as_object_mut)
    }

    /// Get any top-level key of the block
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The raw JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
