//! Relevance scoring and result ordering
//!
//! Scores exist purely for ordering within one query; they have no meaning
//! outside it. The scoring mode follows the same single-character vs
//! multi-character split as the builder so matching and ranking stay
//! consistent.

use serde::{Deserialize, Serialize};

use super::builder::SearchQuery;
use crate::catalog::Product;

/// Flat score assigned to rows found only by the fuzzy fallback; ordering
/// among them is then fully determined by the tie-breaks.
pub const FALLBACK_SCORE: i64 = 100;

/// Caller-selectable orderings for the full-results variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Az,
    Newness,
}

impl SortMode {
    /// Lenient parse: unknown values degrade to relevance rather than
    /// failing the request.
    pub fn parse(value: &str) -> SortMode {
        match value {
            "price_low" => SortMode::PriceLow,
            "price_high" => SortMode::PriceHigh,
            "az" => SortMode::Az,
            "newness" => SortMode::Newness,
            _ => SortMode::Relevance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceLow => "price_low",
            SortMode::PriceHigh => "price_high",
            SortMode::Az => "az",
            SortMode::Newness => "newness",
        }
    }
}

/// A candidate row with its computed relevance score.
#[derive(Debug, Clone)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: i64,
}

pub struct RelevanceRanker;

impl RelevanceRanker {
    /// Compute the ordering score for one candidate row.
    pub fn score(query: &SearchQuery, product: &Product) -> i64 {
        if query.is_single_char() {
            Self::score_single_char(&query.raw_term, product)
        } else {
            Self::score_multi_char(&query.raw_term, product)
        }
    }

    fn score_single_char(term: &str, product: &Product) -> i64 {
        let title = product.title.to_lowercase();
        let brand = product.brand.to_lowercase();
        let color = product.color.to_lowercase();
        let category = product.category.to_lowercase();
        let collection = product.collection.to_lowercase();
        let description = product.description.to_lowercase();
        let height = product.height.to_lowercase();
        let width = product.width.to_lowercase();

        if title.starts_with(term) {
            1000
        } else if brand.starts_with(term) {
            950
        } else if color.starts_with(term) {
            900
        } else if category.starts_with(term) {
            850
        } else if title.contains(term) {
            700
        } else if brand.contains(term) {
            650
        } else if category.contains(term) {
            600
        } else if collection.contains(term) {
            550
        } else if description.contains(term) {
            400
        } else if height.contains(term) || width.contains(term) {
            350
        } else {
            100
        }
    }

    fn score_multi_char(term: &str, product: &Product) -> i64 {
        let title = product.title.to_lowercase();
        let brand = product.brand.to_lowercase();
        let category = product.category.to_lowercase();
        let color = product.color.to_lowercase();
        let collection = product.collection.to_lowercase();
        let description = product.description.to_lowercase();
        let height = product.height.to_lowercase();
        let width = product.width.to_lowercase();

        let title_contains = title.contains(term);
        let category_contains = category.contains(term);
        let color_contains = color.contains(term);

        // Combination bonuses take precedence over any single-field match
        if title_contains && category_contains {
            1200
        } else if title_contains && color_contains {
            1150
        } else if category_contains && color_contains {
            1100
        } else if title == term {
            1000
        } else if brand == term {
            950
        } else if category == term {
            900
        } else if color == term {
            850
        } else if collection == term {
            800
        } else if height == term || width == term {
            750
        } else if title.starts_with(term) {
            700
        } else if brand.starts_with(term) {
            650
        } else if category.starts_with(term) {
            600
        } else if collection.starts_with(term) {
            550
        } else if title_contains {
            500
        } else if brand.contains(term) {
            450
        } else if category_contains {
            400
        } else if collection.contains(term) {
            350
        } else if description.contains(term) {
            300
        } else if color_contains {
            250
        } else if height.contains(term) || width.contains(term) {
            200
        } else {
            50
        }
    }
}

/// Order results in place for the requested sort mode.
///
/// Relevance: score DESC, then in-stock DESC, price ASC, title ASC. Explicit
/// modes fully override relevance but keep the same residual tie-breaks so
/// ordering stays deterministic.
pub fn order_results(results: &mut [ScoredProduct], sort: SortMode) {
    results.sort_by(|a, b| {
        let primary = match sort {
            SortMode::Relevance => b.score.cmp(&a.score),
            SortMode::PriceLow => a.product.price.total_cmp(&b.product.price),
            SortMode::PriceHigh => b.product.price.total_cmp(&a.product.price),
            SortMode::Az => title_key(&a.product).cmp(&title_key(&b.product)),
            SortMode::Newness => b.product.date_added.cmp(&a.product.date_added),
        };
        primary
            .then_with(|| b.product.in_stock().cmp(&a.product.in_stock()))
            .then_with(|| a.product.price.total_cmp(&b.product.price))
            .then_with(|| title_key(&a.product).cmp(&title_key(&b.product)))
    });
}

fn title_key(product: &Product) -> String {
    product.title.to_lowercase()
}
