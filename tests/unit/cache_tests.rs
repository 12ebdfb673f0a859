/*!
 * Tests for translation cache functionality
 */

use editorjs_translator::translation::cache::TranslationCache;

#[test]
fn test_cache_default_shouldBeDisabled() {
    let cache = TranslationCache::default();
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_new_withDisabled_shouldIgnoreStores() {
    let cache = TranslationCache::new(false);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "en", "fr").is_none());
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 0);
}

#[test]
fn test_cache_store_withEnabledCache_shouldStoreTranslation() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert_eq!(cache.get("hello", "en", "fr"), Some("bonjour".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_get_withDifferentLanguages_shouldReturnNone() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "de", "fr").is_none());
    assert!(cache.get("hello", "en", "es").is_none());
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    cache.get("hello", "en", "fr");
    cache.get("hello", "en", "fr");
    cache.get("goodbye", "en", "fr");

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_cache_clear_shouldResetEntriesAndStats() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");
    cache.get("hello", "en", "fr");

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
    assert_eq!(cache.stats().hit_rate(), 0.0);
}
