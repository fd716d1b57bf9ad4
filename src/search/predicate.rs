//! Structured match predicates
//!
//! A query is a list of tiers; a tier is one OR-group of field predicates
//! representing a single matching strategy (exact, prefix, contains,
//! synonym-expansion). Tiers are built as data and turned into a
//! parameterized store query in one rendering step, keeping "what to match"
//! separate from how a particular store expresses it. The in-memory backend
//! evaluates the same predicates directly.

use crate::catalog::Product;

/// Searchable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Brand,
    Category,
    Color,
    Collection,
    Description,
    Height,
    Width,
}

impl MatchField {
    /// Column name used by the rendering step.
    pub fn column(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Brand => "brand",
            MatchField::Category => "category",
            MatchField::Color => "color",
            MatchField::Collection => "collection",
            MatchField::Description => "description",
            MatchField::Height => "height",
            MatchField::Width => "width",
        }
    }

    /// The row value this field addresses.
    pub fn of(self, product: &Product) -> &str {
        match self {
            MatchField::Title => &product.title,
            MatchField::Brand => &product.brand,
            MatchField::Category => &product.category,
            MatchField::Color => &product.color,
            MatchField::Collection => &product.collection,
            MatchField::Description => &product.description,
            MatchField::Height => &product.height,
            MatchField::Width => &product.width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    Equals,
    StartsWith,
    Contains,
}

/// One field-level predicate with its bound parameter. Matching is always
/// case-insensitive; `value` is stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub field: MatchField,
    pub op: MatchOp,
    /// Unique bind-parameter name, e.g. `p3`.
    pub param: String,
    pub value: String,
}

impl FieldPredicate {
    pub fn matches(&self, product: &Product) -> bool {
        let haystack = self.field.of(product).to_lowercase();
        match self.op {
            MatchOp::Equals => haystack == self.value,
            MatchOp::StartsWith => haystack.starts_with(&self.value),
            MatchOp::Contains => haystack.contains(&self.value),
        }
    }

    /// The value as bound for the rendered query, wildcards included.
    pub fn bound_value(&self) -> String {
        match self.op {
            MatchOp::Equals => self.value.clone(),
            MatchOp::StartsWith => format!("{}%", self.value),
            MatchOp::Contains => format!("%{}%", self.value),
        }
    }

    fn render(&self) -> String {
        match self.op {
            MatchOp::Equals => format!("LOWER({}) = :{}", self.field.column(), self.param),
            MatchOp::StartsWith | MatchOp::Contains => {
                format!("LOWER({}) LIKE :{}", self.field.column(), self.param)
            }
        }
    }
}

/// One OR-group of predicates representing a single matching strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTier {
    pub label: &'static str,
    pub predicates: Vec<FieldPredicate>,
}

impl MatchTier {
    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().any(|p| p.matches(product))
    }
}

/// Request-scoped counter producing unique bind-parameter names. A fresh one
/// is created per build; it is never shared across requests.
#[derive(Debug, Default)]
pub struct ParamCounter(usize);

impl ParamCounter {
    pub fn next_name(&mut self) -> String {
        let n = self.0;
        self.0 += 1;
        format!("p{}", n)
    }
}

/// The ordered tier list for one query. Tiers are OR-combined: a row matching
/// any tier is a candidate, and scoring differentiates quality afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    pub tiers: Vec<MatchTier>,
}

impl QueryPlan {
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.tiers.iter().any(|t| t.matches(product))
    }

    /// Render the plan as a parameterized WHERE clause plus its bindings.
    /// Each bound parameter appears in exactly the fragment generated for it.
    pub fn render(&self) -> (String, Vec<(String, String)>) {
        let mut params = Vec::new();
        let clause = self
            .tiers
            .iter()
            .map(|tier| {
                let group = tier
                    .predicates
                    .iter()
                    .map(|p| {
                        params.push((p.param.clone(), p.bound_value()));
                        p.render()
                    })
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("({})", group)
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        (clause, params)
    }
}
