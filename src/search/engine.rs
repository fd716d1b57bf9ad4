//! Search engine integration
//!
//! Ties together query building, store execution, scoring and ordering.
//! The engine owns the request pipeline shared by both entry points: the
//! lightweight typeahead variant and the full listing variant with filters,
//! sort overrides and the fuzzy fallback.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::builder::{QueryBuilder, SearchQuery};
use super::ranking::{self, RelevanceRanker, ScoredProduct, SortMode, FALLBACK_SCORE};
use super::synonyms;
use crate::catalog::{Filters, Product, ProductStore, StoreError};

/// Default result cap for the typeahead variant.
pub const DEFAULT_SUGGEST_LIMIT: usize = 8;

/// Shown when a typeahead query matches nothing.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "Running shoes",
    "Sneakers",
    "Black shoes",
    "White shoes",
    "Athletic shoes",
    "Casual shoes",
];

const MAX_SUGGESTIONS: usize = 4;

/// Parameters for the full listing variant.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub sort: SortMode,
    pub filters: Filters,
    pub limit: Option<usize>,
}

/// Outcome of the typeahead variant.
#[derive(Debug, Clone, Serialize)]
pub struct QuickSearch {
    pub query: String,
    pub results: Vec<Product>,
    pub count: usize,
    pub suggestions: Vec<String>,
}

/// Outcome of the full listing variant.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub sort: SortMode,
    pub results: Vec<Product>,
    pub count: usize,
    /// True when the looser per-word rerun produced these results.
    pub used_fallback: bool,
    pub facets: Facets,
}

/// Filter facets derived from the current result set, not the full catalog.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub heights: Vec<String>,
    pub widths: Vec<String>,
    pub collections: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

pub struct SearchEngine<S> {
    store: S,
}

impl<S: ProductStore> SearchEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lightweight JSON search for autocomplete. No filters, no fallback.
    /// Empty input short-circuits without touching the store.
    pub fn quick_search(&self, raw: &str, limit: usize) -> Result<QuickSearch, StoreError> {
        let query = SearchQuery::parse(raw);
        if query.is_empty() {
            return Ok(QuickSearch {
                query: query.raw_term,
                results: Vec::new(),
                count: 0,
                suggestions: Vec::new(),
            });
        }

        let results = self.run_plan(&query, &Filters::default())?;
        let results: Vec<Product> = results
            .into_iter()
            .take(limit)
            .map(|s| s.product)
            .collect();
        let suggestions = derive_suggestions(&results);

        Ok(QuickSearch {
            count: results.len(),
            query: query.raw_term,
            results,
            suggestions,
        })
    }

    /// Full listing search: filters, sort override, fuzzy fallback, facets.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, StoreError> {
        let query = SearchQuery::parse(&request.query);
        let filters = sanitize_filters(&request.filters);

        if query.is_empty() {
            return Ok(SearchOutcome {
                query: query.raw_term,
                sort: request.sort,
                results: Vec::new(),
                count: 0,
                used_fallback: false,
                facets: Facets::default(),
            });
        }

        let mut scored = self.run_plan(&query, &filters)?;
        let mut used_fallback = false;

        if scored.is_empty() && query.words.len() > 1 {
            scored = self.run_fallback(&query, &filters)?;
            used_fallback = !scored.is_empty();
        }

        ranking::order_results(&mut scored, request.sort);

        let mut results: Vec<Product> = scored.into_iter().map(|s| s.product).collect();
        if let Some(limit) = request.limit {
            results.truncate(limit);
        }
        let facets = derive_facets(&results);

        Ok(SearchOutcome {
            query: query.raw_term,
            sort: request.sort,
            count: results.len(),
            used_fallback,
            facets,
            results,
        })
    }

    /// Execute the primary tiered plan: build, fetch, dedup, score, order.
    fn run_plan(&self, query: &SearchQuery, filters: &Filters) -> Result<Vec<ScoredProduct>, StoreError> {
        let plan = QueryBuilder::build(query);
        let (clause, params) = plan.render();
        debug!("query plan for {:?}: {} with {} bindings", query.raw_term, clause, params.len());

        let candidates = dedup_by_id(self.store.candidates(&plan, filters)?);
        let mut scored: Vec<ScoredProduct> = candidates
            .into_iter()
            .map(|product| ScoredProduct {
                score: RelevanceRanker::score(query, &product),
                product,
            })
            .collect();
        ranking::order_results(&mut scored, SortMode::Relevance);
        Ok(scored)
    }

    /// Looser rerun for zero-result multi-word queries: per-word contains
    /// across title/brand/category, flat score, same active filters.
    fn run_fallback(&self, query: &SearchQuery, filters: &Filters) -> Result<Vec<ScoredProduct>, StoreError> {
        let plan = QueryBuilder::build_fallback(query);
        debug!("fuzzy fallback for {:?}", query.raw_term);

        let candidates = dedup_by_id(self.store.candidates(&plan, filters)?);
        Ok(candidates
            .into_iter()
            .map(|product| ScoredProduct {
                score: FALLBACK_SCORE,
                product,
            })
            .collect())
    }
}

/// Drop repeated rows, keeping the first occurrence per id.
fn dedup_by_id(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect()
}

/// Drop filter dimensions whose values cannot possibly be valid: category
/// values outside the canonical vocabulary, and inverted price bounds.
/// Non-numeric prices never reach here; the endpoints parse leniently.
fn sanitize_filters(filters: &Filters) -> Filters {
    let mut sanitized = filters.clone();
    if let Some(category) = &sanitized.category {
        if !synonyms::is_canonical_category(category) {
            sanitized.category = None;
        }
    }
    if let (Some(min), Some(max)) = (sanitized.price_min, sanitized.price_max) {
        if min > max {
            sanitized.price_min = None;
            sanitized.price_max = None;
        }
    }
    sanitized
}

/// Distinct categories/brands/colors/collections of the result set, capped
/// at four in that priority order.
fn derive_suggestions(results: &[Product]) -> Vec<String> {
    if results.is_empty() {
        return DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }

    let mut suggestions: Vec<String> = Vec::new();
    let push = |value: &str, suggestions: &mut Vec<String>| {
        if suggestions.len() < MAX_SUGGESTIONS
            && !value.is_empty()
            && !suggestions.iter().any(|s| s.eq_ignore_ascii_case(value))
        {
            suggestions.push(value.to_string());
        }
    };

    for product in results {
        push(&product.category, &mut suggestions);
    }
    for product in results {
        push(&product.brand, &mut suggestions);
    }
    for product in results {
        push(&product.color, &mut suggestions);
    }
    for product in results {
        push(&product.collection, &mut suggestions);
    }
    suggestions
}

fn derive_facets(results: &[Product]) -> Facets {
    fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            if !value.is_empty() && !out.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
                out.push(value);
            }
        }
        out.sort_by_key(|v| v.to_lowercase());
        out
    }

    Facets {
        categories: distinct(results.iter().map(|p| p.category.clone())),
        brands: distinct(results.iter().map(|p| p.brand.clone())),
        colors: distinct(results.iter().map(|p| p.color.clone())),
        heights: distinct(results.iter().map(|p| p.height.clone())),
        widths: distinct(results.iter().map(|p| p.width.clone())),
        collections: distinct(results.iter().map(|p| p.collection.clone())),
        price_min: results.iter().map(|p| p.price).min_by(f64::total_cmp),
        price_max: results.iter().map(|p| p.price).max_by(f64::total_cmp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testutil::product;
    use crate::catalog::MemoryStore;
    use crate::search::predicate::QueryPlan;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Catalog used across scenario tests.
    fn catalog() -> Vec<Product> {
        let mut rows = vec![
            product(1, "Marathon Pro", "Velocity", "running", "Red"),
            product(2, "Blaze Runner", "Velocity", "running", "Blue"),
            product(3, "Brunner Classic", "Strider", "casual", "Brown"),
            product(4, "Court King", "AeroFlex", "basketball", "White"),
            product(5, "City Walker", "CloudStep", "walking", "Black"),
            product(6, "Navy Drift", "CloudStep", "casual", "Blue"),
            product(7, "Dune Trek", "TrailForge", "hiking", "Beige"),
            product(8, "Swift Lady", "Velocity", "women's running", "Pink"),
        ];
        rows[1].price = 80.0;
        rows[4].stock = 0;
        rows[6].description = "Rugged trail shoe in bold colors".to_string();
        rows
    }

    fn engine() -> SearchEngine<MemoryStore> {
        SearchEngine::new(MemoryStore::new(catalog()))
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            ..SearchRequest::default()
        }
    }

    /// Store that counts accesses, for the empty-query short-circuit.
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl ProductStore for CountingStore {
        fn candidates(&self, _: &QueryPlan, _: &Filters) -> Result<Vec<Product>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    struct FailingStore;

    impl ProductStore for FailingStore {
        fn candidates(&self, _: &QueryPlan, _: &Filters) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    /// Store that returns the same row for every tier, uncollapsed.
    struct DuplicatingStore;

    impl ProductStore for DuplicatingStore {
        fn candidates(&self, _: &QueryPlan, _: &Filters) -> Result<Vec<Product>, StoreError> {
            let row = product(42, "Marathon Pro", "Velocity", "running", "Red");
            Ok(vec![row.clone(), row.clone(), row])
        }
    }

    #[test]
    fn test_empty_query_never_touches_store() {
        let store = CountingStore { calls: AtomicUsize::new(0) };
        let engine = SearchEngine::new(store);

        let quick = engine.quick_search("", 8).unwrap();
        assert_eq!(quick.count, 0);
        assert!(quick.results.is_empty());
        assert!(quick.suggestions.is_empty());

        let outcome = engine.search(&request("   ")).unwrap();
        assert_eq!(outcome.count, 0);

        assert_eq!(engine.store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_store_failure_surfaces_as_error() {
        let engine = SearchEngine::new(FailingStore);
        assert!(engine.quick_search("running", 8).is_err());
        assert!(engine.search(&request("running")).is_err());
    }

    #[test]
    fn test_dedup_by_id() {
        let engine = SearchEngine::new(DuplicatingStore);
        let outcome = engine.search(&request("marathon")).unwrap();
        assert_eq!(outcome.count, 1);

        let quick = engine.quick_search("marathon", 8).unwrap();
        assert_eq!(quick.count, 1);
    }

    #[test]
    fn test_running_scenario_ranking() {
        let outcome = engine().search(&request("running")).unwrap();
        assert!(outcome.count >= 2);

        // Exact running-category rows outrank everything that merely
        // contains fragments; "Brunner Classic" only matched via the
        // "run" expansion words, if at all
        assert_eq!(outcome.results[0].category, "running");
        let brunner_pos = outcome.results.iter().position(|p| p.id == 3);
        if let Some(pos) = brunner_pos {
            assert!(pos > 1);
        }
    }

    #[test]
    fn test_single_letter_scenario() {
        let outcome = engine().search(&request("b")).unwrap();
        assert!(outcome.count > 0);

        // Every result contains 'b' somewhere, or matched a 'b' expansion
        // (black/blue/brown); leading matches start with 'b'
        assert!(outcome.results[0]
            .title
            .to_lowercase()
            .starts_with('b')
            || outcome.results[0].brand.to_lowercase().starts_with('b'));

        // Black item surfaces through the 'b' -> black expansion
        assert!(outcome.results.iter().any(|p| p.color == "Black"));
    }

    #[test]
    fn test_single_char_results_contain_character() {
        let outcome = engine().search(&request("b")).unwrap();
        for p in &outcome.results {
            let fields = [
                &p.title, &p.brand, &p.color, &p.category, &p.collection, &p.description,
            ];
            let direct = fields.iter().any(|f| f.to_lowercase().contains('b'));
            // Expansion words may also have matched height/width/attribute
            // columns; black/blue/brown all contain 'b' themselves
            let expanded = ["black", "blue", "brown"].iter().any(|w| {
                fields.iter().any(|f| f.to_lowercase().contains(w))
            });
            assert!(direct || expanded, "row {} matched no 'b' rule", p.id);
        }
    }

    #[test]
    fn test_navy_restricts_to_blue() {
        let outcome = engine().search(&request("navy")).unwrap();
        assert!(outcome.count > 0);
        // The color tier restricts the canonical value; rows that matched
        // other tiers (e.g. title contains "navy") are still candidates
        for p in &outcome.results {
            assert!(p.color == "Blue" || p.title.to_lowercase().contains("navy"));
        }
        assert!(outcome.results.iter().any(|p| p.color == "Blue"));
    }

    #[test]
    fn test_women_category_restriction() {
        let outcome = engine().search(&request("women")).unwrap();
        assert!(outcome.count > 0);
        for p in &outcome.results {
            assert!(p.category.starts_with("women's"), "unexpected {}", p.category);
        }
    }

    #[test]
    fn test_primary_word_tier_handles_known_words() {
        // "blue" is picked up by the primary per-word tier, so the looser
        // rerun never fires even though the full phrase matches nothing
        let outcome = engine().search(&request("blue giant shoes")).unwrap();
        assert!(outcome.count > 0);
        assert!(!outcome.used_fallback);
        assert!(outcome.results.iter().any(|p| p.color == "Blue"));
    }

    #[test]
    fn test_fuzzy_fallback_multiword() {
        // Single-letter words carry no primary word tier; the fallback
        // rerun finds the 'b' titles via per-word contains
        let outcome = engine().search(&request("b q")).unwrap();
        assert!(outcome.count > 0);
        assert!(outcome.used_fallback);
        for p in &outcome.results {
            let fields = [&p.title, &p.brand, &p.category];
            assert!(fields
                .iter()
                .any(|f| f.to_lowercase().contains('b') || f.to_lowercase().contains('q')));
        }

        // Entirely hopeless multi-word query stays empty
        let outcome = engine().search(&request("xq zv qqq")).unwrap();
        assert_eq!(outcome.count, 0);
        assert!(!outcome.used_fallback);
    }

    #[test]
    fn test_fallback_not_used_for_single_word() {
        let outcome = engine().search(&request("zzzzz")).unwrap();
        assert_eq!(outcome.count, 0);
        assert!(!outcome.used_fallback);
    }

    #[test]
    fn test_price_low_sort_monotonic() {
        let mut req = request("running");
        req.sort = SortMode::PriceLow;
        let outcome = engine().search(&req).unwrap();
        let prices: Vec<f64> = outcome.results.iter().map(|p| p.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]), "{:?}", prices);
    }

    #[test]
    fn test_relevance_ordering_non_increasing() {
        let query = SearchQuery::parse("running");
        let outcome = engine().search(&request("running")).unwrap();
        let scores: Vec<i64> = outcome
            .results
            .iter()
            .map(|p| RelevanceRanker::score(&query, p))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
    }

    #[test]
    fn test_limit_applies_after_ordering() {
        let mut req = request("running");
        req.limit = Some(1);
        let outcome = engine().search(&req).unwrap();
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.results[0].category, "running");
    }

    #[test]
    fn test_quick_search_limit_and_suggestions() {
        let quick = engine().quick_search("running", 1).unwrap();
        assert_eq!(quick.count, 1);
        assert!(!quick.suggestions.is_empty());
        assert!(quick.suggestions.len() <= 4);
        // First suggestion comes from the categories of the result set
        assert_eq!(quick.suggestions[0], quick.results[0].category);
    }

    #[test]
    fn test_quick_search_fallback_suggestions() {
        let quick = engine().quick_search("zzzzz", 8).unwrap();
        assert_eq!(quick.count, 0);
        assert_eq!(
            quick.suggestions,
            DEFAULT_SUGGESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unknown_category_filter_ignored() {
        let mut req = request("velocity");
        req.filters.category = Some("sandals".to_string());
        let outcome = engine().search(&req).unwrap();
        // An unknown category is dropped, not applied as an impossible filter
        assert!(outcome.count > 0);
    }

    #[test]
    fn test_inverted_price_bounds_ignored() {
        let mut req = request("velocity");
        req.filters.price_min = Some(500.0);
        req.filters.price_max = Some(10.0);
        let outcome = engine().search(&req).unwrap();
        assert!(outcome.count > 0);
    }

    #[test]
    fn test_valid_filters_apply() {
        let mut req = request("running");
        req.filters.color = Some("Blue".to_string());
        let outcome = engine().search(&req).unwrap();
        assert!(outcome.count > 0);
        assert!(outcome.results.iter().all(|p| p.color == "Blue"));
    }

    #[test]
    fn test_facets_derived_from_results() {
        let outcome = engine().search(&request("running")).unwrap();
        let facets = &outcome.facets;
        assert!(!facets.categories.is_empty());
        assert!(facets.categories.iter().any(|c| c == "running"));
        assert!(facets.price_min.is_some());
        assert!(facets.price_min <= facets.price_max);
        // Facets reflect only the current result set
        for brand in &facets.brands {
            assert!(outcome.results.iter().any(|p| &p.brand == brand));
        }
    }

    #[test]
    fn test_multi_char_results_satisfy_some_tier() {
        let query = SearchQuery::parse("running");
        let plan = QueryBuilder::build(&query);
        let outcome = engine().search(&request("running")).unwrap();
        assert!(!outcome.used_fallback);
        for p in &outcome.results {
            assert!(plan.matches(p), "row {} matched no tier", p.id);
        }
    }
}
