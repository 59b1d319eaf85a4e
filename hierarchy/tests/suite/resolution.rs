use pretty_assertions::assert_eq;
use std::sync::Arc;
use strata_hierarchy::HierarchyResolver;
use strata_hierarchy::ResolveError;
use strata_hierarchy::ResolverConfig;
use strata_test_support::BrokenCache;
use strata_test_support::CountingStore;
use strata_test_support::UnavailableStore;
use strata_test_support::fixture_resolver;
use strata_test_support::fixture_store;
use strata_test_support::resolver_with;
use strata_utils_cache::LruSharedCache;
use strata_utils_cache::SharedCache;
use strata_utils_cache::cache_key;

#[test]
fn resolves_by_identifier_slug_and_uri() {
    let resolver = fixture_resolver();
    let by_id = resolver.resolve("material").expect("by identifier");
    let by_slug = resolver.resolve("m1").expect("by slug");
    let by_uri = resolver.resolve("/predicates/material").expect("by uri");
    assert_eq!(by_id, by_slug);
    assert_eq!(by_id, by_uri);
    assert_eq!(by_id.slug, "m1");
}

#[test]
fn misses_and_root_sentinel_are_not_found() {
    let resolver = fixture_resolver();
    assert!(resolver.resolve("bone").expect_err("bone").is_not_found());
    assert!(resolver.resolve("root").expect_err("root").is_not_found());
    assert!(resolver.resolve("  ").expect_err("blank").is_not_found());
}

#[test]
fn lookups_are_memoized_per_resolver() {
    let store = Arc::new(CountingStore::new(fixture_store()));
    let resolver = resolver_with(store.clone(), ResolverConfig::default());
    for _ in 0..3 {
        resolver.resolve("domuztepe").expect("resolve");
        let _ = resolver.resolve("bone");
    }
    assert_eq!(store.count("domuztepe"), 1);
    assert_eq!(store.count("bone"), 1);
}

#[test]
fn shared_cache_is_read_through_across_resolvers() {
    let cache = Arc::new(LruSharedCache::default());
    let first_store = Arc::new(CountingStore::new(fixture_store()));
    let first = HierarchyResolver::new(
        first_store.clone(),
        cache.clone(),
        ResolverConfig::default(),
    );
    first.resolve("italy").expect("first resolve");
    let key = cache_key(&ResolverConfig::default().cache_namespace, "italy");
    assert!(cache.get(&key).expect("cache get").is_some());

    let second_store = Arc::new(CountingStore::new(fixture_store()));
    let second = HierarchyResolver::new(
        second_store.clone(),
        cache,
        ResolverConfig::default(),
    );
    let node = second.resolve("italy").expect("second resolve");
    assert_eq!(node.label, "Italy");
    assert_eq!(second_store.count("italy"), 0);
    assert_eq!(first_store.count("italy"), 1);
}

#[test]
fn cache_failures_never_fail_resolution() {
    let resolver = HierarchyResolver::new(
        Arc::new(fixture_store()),
        Arc::new(BrokenCache),
        ResolverConfig::default(),
    );
    let node = resolver.resolve("poggio-civitate").expect("resolve");
    assert_eq!(node.label, "Poggio Civitate");
}

#[test]
fn store_failures_are_not_misses() {
    let resolver = resolver_with(Arc::new(UnavailableStore), ResolverConfig::default());
    let err = resolver.resolve("turkey").expect_err("store down");
    assert!(matches!(err, ResolveError::Store(_)));
    assert!(!err.is_not_found());
}
