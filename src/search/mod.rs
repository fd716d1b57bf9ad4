//! Tiered keyword search over the product catalog
//!
//! Pipeline: normalize the query, build an ordered tier plan of structured
//! predicates, fetch candidates, score and order them. Multi-word queries
//! that match nothing are rerun with a looser per-word plan.

pub mod builder;
pub mod engine;
pub mod predicate;
pub mod ranking;
pub mod synonyms;

pub use builder::{QueryBuilder, SearchQuery};
pub use engine::{QuickSearch, SearchEngine, SearchOutcome, SearchRequest};
pub use predicate::QueryPlan;
pub use ranking::{RelevanceRanker, SortMode};
