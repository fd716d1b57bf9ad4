//! Query normalization and tier construction
//!
//! Turns the raw user input into the ordered tier list described by the
//! search design: a short single-character path and a multi-character path
//! with synonym detection. Building is pure string processing; the store is
//! never touched here.

use unicode_normalization::UnicodeNormalization;

use super::predicate::{FieldPredicate, MatchField, MatchOp, MatchTier, ParamCounter, QueryPlan};
use super::synonyms;

/// Normalized, request-scoped view of the user's input.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Trimmed, NFKC-normalized, lower-cased input.
    pub raw_term: String,
    /// `raw_term` split on whitespace, empty tokens discarded.
    pub words: Vec<String>,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let raw_term = input
            .nfkc()
            .collect::<String>()
            .trim()
            .to_lowercase();
        let words = raw_term.split_whitespace().map(String::from).collect();
        Self { raw_term, words }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_term.is_empty()
    }

    /// Character count of the normalized term; drives the single-character
    /// vs multi-character path in both the builder and the ranker.
    pub fn len(&self) -> usize {
        self.raw_term.chars().count()
    }

    pub fn is_single_char(&self) -> bool {
        self.len() == 1
    }
}

/// Field sets for the single-character path.
const SINGLE_STARTS_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Color,
    MatchField::Category,
];
const SINGLE_CONTAINS_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Color,
    MatchField::Category,
    MatchField::Collection,
    MatchField::Description,
];
/// Expansion words (letter and partial tables) match against every attribute
/// column except the description.
const EXPANSION_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Color,
    MatchField::Category,
    MatchField::Collection,
    MatchField::Height,
    MatchField::Width,
];

/// Field sets for the multi-character path.
const MULTI_EXACT_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Category,
    MatchField::Collection,
    MatchField::Color,
];
const MULTI_PREFIX_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Category,
    MatchField::Collection,
    MatchField::Color,
    MatchField::Height,
    MatchField::Width,
];
const MULTI_CONTAINS_FIELDS: &[MatchField] = &[
    MatchField::Title,
    MatchField::Brand,
    MatchField::Category,
    MatchField::Collection,
    MatchField::Description,
    MatchField::Color,
    MatchField::Height,
    MatchField::Width,
];

pub struct QueryBuilder;

impl QueryBuilder {
    /// Build the ordered tier list for a normalized query. An empty query
    /// yields an empty plan; callers short-circuit before the store.
    pub fn build(query: &SearchQuery) -> QueryPlan {
        if query.is_empty() {
            return QueryPlan::default();
        }

        let mut params = ParamCounter::default();
        let tiers = if query.is_single_char() {
            Self::single_char_tiers(query, &mut params)
        } else {
            Self::multi_char_tiers(query, &mut params)
        };
        QueryPlan { tiers }
    }

    fn tier(
        label: &'static str,
        op: MatchOp,
        fields: &[MatchField],
        value: &str,
        params: &mut ParamCounter,
    ) -> MatchTier {
        let predicates = fields
            .iter()
            .map(|&field| FieldPredicate {
                field,
                op,
                param: params.next_name(),
                value: value.to_string(),
            })
            .collect();
        MatchTier { label, predicates }
    }

    fn single_char_tiers(query: &SearchQuery, params: &mut ParamCounter) -> Vec<MatchTier> {
        let term = &query.raw_term;
        let mut tiers = vec![
            Self::tier("starts", MatchOp::StartsWith, SINGLE_STARTS_FIELDS, term, params),
            Self::tier("contains", MatchOp::Contains, SINGLE_CONTAINS_FIELDS, term, params),
        ];

        let letter = term.chars().next().unwrap_or_default();
        if let Some(expansions) = synonyms::letter_expansions(letter) {
            for word in expansions {
                tiers.push(Self::tier(
                    "letter-expansion",
                    MatchOp::Contains,
                    EXPANSION_FIELDS,
                    word,
                    params,
                ));
            }
        }
        tiers
    }

    fn multi_char_tiers(query: &SearchQuery, params: &mut ParamCounter) -> Vec<MatchTier> {
        let term = &query.raw_term;
        let mut tiers = vec![
            Self::tier("exact", MatchOp::Equals, MULTI_EXACT_FIELDS, term, params),
            Self::tier("prefix", MatchOp::StartsWith, MULTI_PREFIX_FIELDS, term, params),
            Self::tier("contains", MatchOp::Contains, MULTI_CONTAINS_FIELDS, term, params),
        ];

        for word in query.words.iter().filter(|w| w.chars().count() > 1) {
            tiers.push(Self::tier(
                "word",
                MatchOp::Contains,
                MULTI_CONTAINS_FIELDS,
                word,
                params,
            ));
        }

        if (2..=4).contains(&query.len()) {
            for word in synonyms::partial_expansions(term) {
                tiers.push(Self::tier(
                    "partial-expansion",
                    MatchOp::Contains,
                    EXPANSION_FIELDS,
                    word,
                    params,
                ));
            }
        }

        // Detection tiers: equality against the canonical stored value.
        // Each resolver is first-match-wins, so at most one tier per field.
        if let Some(color) = synonyms::resolve_color(term, &query.words) {
            tiers.push(Self::tier(
                "color",
                MatchOp::Equals,
                &[MatchField::Color],
                &color.to_lowercase(),
                params,
            ));
        }

        if let Some(categories) = synonyms::resolve_categories(term, &query.words) {
            let predicates = categories
                .iter()
                .map(|category| FieldPredicate {
                    field: MatchField::Category,
                    op: MatchOp::Equals,
                    param: params.next_name(),
                    value: category.to_lowercase(),
                })
                .collect();
            tiers.push(MatchTier {
                label: "category",
                predicates,
            });
        }

        if let Some(height) = synonyms::resolve_height(term, &query.words) {
            tiers.push(Self::tier(
                "height",
                MatchOp::Equals,
                &[MatchField::Height],
                height,
                params,
            ));
        }

        if let Some(width) = synonyms::resolve_width(term, &query.words) {
            tiers.push(Self::tier(
                "width",
                MatchOp::Equals,
                &[MatchField::Width],
                width,
                params,
            ));
        }

        if let Some(brand) = synonyms::resolve_brand(term, &query.words) {
            tiers.push(Self::tier(
                "brand",
                MatchOp::Equals,
                &[MatchField::Brand],
                &brand.to_lowercase(),
                params,
            ));
        }

        if let Some(collection) = synonyms::resolve_collection(term, &query.words) {
            tiers.push(Self::tier(
                "collection",
                MatchOp::Equals,
                &[MatchField::Collection],
                &collection.to_lowercase(),
                params,
            ));
        }

        tiers
    }

    /// The looser secondary plan used when the primary plan finds nothing for
    /// a multi-word query: flat per-word contains over title/brand/category.
    pub fn build_fallback(query: &SearchQuery) -> QueryPlan {
        const FALLBACK_FIELDS: &[MatchField] =
            &[MatchField::Title, MatchField::Brand, MatchField::Category];

        let mut params = ParamCounter::default();
        let tiers = query
            .words
            .iter()
            .map(|word| Self::tier("fallback-word", MatchOp::Contains, FALLBACK_FIELDS, word, &mut params))
            .collect();
        QueryPlan { tiers }
    }
}
