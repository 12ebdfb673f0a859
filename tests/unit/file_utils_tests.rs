/*!
 * Tests for file utilities
 */

use anyhow::Result;
use std::fs;

use editorjs_translator::file_utils::FileManager;
use crate::common;

#[test]
fn test_fileExists_withExistingFileAndDirectory_shouldOnlyAcceptFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.json", "{}")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.json")));
    Ok(())
}

#[test]
fn test_writeToFile_nestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.json");

    FileManager::write_to_file(&target, "content")?;

    assert_eq!(FileManager::read_to_string(&target)?, "content");
    Ok(())
}

#[test]
fn test_writeAtomically_newFile_shouldLeaveNoTemporaryFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("output_editorjs.json");

    FileManager::write_atomically(&target, "{\"blocks\":[]}")?;

    let entries: Vec<_> = fs::read_dir(temp_dir.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("output_editorjs.json")]);
    assert_eq!(fs::read_to_string(&target)?, "{\"blocks\":[]}");
    Ok(())
}

#[test]
fn test_readToString_missingFile_shouldNameThePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.json");

    let err = FileManager::read_to_string(&missing).unwrap_err();

    assert!(format!("{:#}", err).contains("missing.json"));
    Ok(())
}

#[test]
fn test_ensureDir_existingDirectory_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    FileManager::ensure_dir(temp_dir.path())?;
    FileManager::ensure_dir(temp_dir.path().join("new"))?;
    assert!(temp_dir.path().join("new").is_dir());
    Ok(())
}
