/*!
 * Tests for language utilities
 */

use editorjs_translator::language_utils::{
    display_language, get_language_name, language_codes_match, normalize_to_part2t,
};

#[test]
fn test_normalizeToPart2t_shouldAcceptAllIsoForms() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fra").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("GER").unwrap(), "deu");
    assert_eq!(normalize_to_part2t(" en ").unwrap(), "eng");
}

#[test]
fn test_normalizeToPart2t_invalidCode_shouldFail() {
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("english").is_err());
    assert!(normalize_to_part2t("").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert_eq!(get_language_name("spa").unwrap(), "Spanish");
}

#[test]
fn test_languageCodesMatch_mixedForms_shouldMatchSameLanguage() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("de", "ger"));
    assert!(language_codes_match("nld", "dut"));
    assert!(!language_codes_match("en", "fr"));
}

#[test]
fn test_languageCodesMatch_isoAgainstCustomTag_shouldNotMatch() {
    assert!(!language_codes_match("en", "en-US"));
    assert!(language_codes_match(" en-US ", "EN-us"));
}

#[test]
fn test_displayLanguage_shouldIncludeNameForKnownCodes() {
    assert_eq!(display_language("fr"), "French (fr)");
    assert_eq!(display_language("pt-BR"), "pt-BR");
}
