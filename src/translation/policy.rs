/*!
 * Field-selection policy.
 *
 * Decides which data fields of which block types are sent for translation.
 * The decision has three ordered branches:
 * 1. forbidden types are never translated,
 * 2. types with a specific mapping translate exactly the mapped fields,
 * 3. every other type translates the default field.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of the policy lookup for one block type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelection<'a> {
    /// The type is never translated
    Forbidden,
    /// The type has its own list of fields
    Specific(&'a [String]),
    /// The type falls back to the default field
    Default(&'a str),
}

/// Static table mapping block types to translatable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPolicy {
    /// Block types passed through verbatim
    #[serde(default = "default_forbidden_types")]
    pub forbidden_types: BTreeSet<String>,

    /// Block type -> ordered field names to translate
    #[serde(default = "default_specific_fields")]
    pub specific_fields: BTreeMap<String, Vec<String>>,

    /// Field translated for types without a specific mapping
    #[serde(default = "default_field")]
    pub default_field: String,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            forbidden_types: default_forbidden_types(),
            specific_fields: default_specific_fields(),
            default_field: default_field(),
        }
    }
}

impl FieldPolicy {
    /// Create an empty policy that only translates `default_field`
    pub fn with_default_field(default_field: impl Into<String>) -> Self {
        Self {
            forbidden_types: BTreeSet::new(),
            specific_fields: BTreeMap::new(),
            default_field: default_field.into(),
        }
    }

    /// Mark a block type as never translated
    pub fn forbid(mut self, block_type: impl Into<String>) -> Self {
        self.forbidden_types.insert(block_type.into());
        self
    }

    /// Give a block type its own list of translatable fields
    pub fn map_fields<I, S>(mut self, block_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specific_fields
            .insert(block_type.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    /// Look up how a block type is handled.
    ///
    /// Forbidden wins over a specific mapping, which wins over the default.
    pub fn select(&self, block_type: &str) -> FieldSelection<'_> {
        if self.forbidden_types.contains(block_type) {
            return FieldSelection::Forbidden;
        }

        match self.specific_fields.get(block_type) {
            Some(fields) => FieldSelection::Specific(fields),
            None => FieldSelection::Default(&self.default_field),
        }
    }

    /// Field names of `data` to translate for a block of `block_type`.
    ///
    /// Only fields present in `data` are returned, in policy order.
    pub fn fields_to_translate<'a>(&'a self, block_type: &str, data: &Map<String, Value>) -> Vec<&'a str> {
        match self.select(block_type) {
            FieldSelection::Forbidden => Vec::new(),
            FieldSelection::Specific(fields) => fields
                .iter()
                .map(String::as_str)
                .filter(|field| data.contains_key(*field))
                .collect(),
            FieldSelection::Default(field) => {
                if data.contains_key(field) {
                    vec![field]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Block types that are both forbidden and mapped; the mapping never applies
    pub fn shadowed_mappings(&self) -> Vec<&str> {
        self.specific_fields
            .keys()
            .filter(|block_type| self.forbidden_types.contains(*block_type))
            .map(String::as_str)
            .collect()
    }
}

fn default_forbidden_types() -> BTreeSet<String> {
    BTreeSet::from(["toc".to_string()])
}

fn default_specific_fields() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(
        "warning".to_string(),
        vec!["title".to_string(), "message".to_string()],
    )])
}

fn default_field() -> String {
    "text".to_string()
}
