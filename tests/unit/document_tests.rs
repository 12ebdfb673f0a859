/*!
 * Tests for the block-document model
 */

use serde_json::{json, Value};

use editorjs_translator::translation::document::{Block, BlockDocument};
use crate::common;

#[test]
fn test_blockDocument_sample_shouldExposeBlocksInOrder() {
    let document = common::sample_document();

    let types: Vec<Option<&str>> = document.blocks.iter().map(Block::block_type).collect();
    assert_eq!(
        types,
        vec![Some("paragraph"), Some("toc"), Some("warning"), Some("image"), Some("delimiter"), Some("header")]
    );
    assert_eq!(document.len(), 6);
    assert!(!document.is_empty());
}

#[test]
fn test_blockDocument_toJsonString_shouldPreserveEveryKey() {
    let document = common::sample_document();

    let compact: Value = serde_json::from_str(&document.to_json_string(false).unwrap()).unwrap();
    let pretty: Value = serde_json::from_str(&document.to_json_string(true).unwrap()).unwrap();

    assert_eq!(compact, common::sample_document_value());
    assert_eq!(pretty, compact);
}

#[test]
fn test_blockDocument_pretty_shouldSpanMultipleLines() {
    let document = BlockDocument::new(vec![Block::new("paragraph", json!({"text": "Hi"}))]);

    assert!(!document.to_json_string(false).unwrap().contains('\n'));
    assert!(document.to_json_string(true).unwrap().contains('\n'));
}

#[test]
fn test_block_missingType_shouldReturnNone() {
    let block: Block = serde_json::from_value(json!({"data": {"text": "orphan"}})).unwrap();

    assert!(block.block_type().is_none());
    assert_eq!(block.data().and_then(|d| d.get("text")), Some(&json!("orphan")));
}

#[test]
fn test_block_nonStringType_shouldReturnNone() {
    let block: Block = serde_json::from_value(json!({"type": 7, "data": {}})).unwrap();
    assert!(block.block_type().is_none());
}

#[test]
fn test_blockDocument_nonObjectBlock_shouldFailToParse() {
    let result = BlockDocument::from_json_str(r#"{"blocks":["not a block"]}"#);
    assert!(result.is_err());
}

#[test]
fn test_blockDocument_emptyBlocks_shouldParse() {
    let document = BlockDocument::from_json_str(r#"{"blocks":[]}"#).unwrap();
    assert!(document.is_empty());
}
