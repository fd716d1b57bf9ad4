//! Fixed synonym and expansion tables
//!
//! Every mapping the builder consults lives here as plain data so tests can
//! enumerate the tables independently of the query-building logic. Synonym
//! keys are lowercase free-text; values are the canonical strings stored in
//! the catalog.
//!
//! Color equality has exactly one source of truth: `COLOR_SYNONYMS`. The
//! single-letter expansion table carries lowercase words that flow through
//! ordinary contains-matching and never produce an equality condition.

/// Single-letter queries expand into these contains-words.
pub const LETTER_EXPANSIONS: &[(char, &[&str])] = &[
    ('a', &["athletic"]),
    ('b', &["black", "blue", "brown"]),
    ('c', &["casual", "canvas"]),
    ('g', &["green", "grey"]),
    ('h', &["high top", "hiking"]),
    ('l', &["low top", "leather"]),
    ('m', &["mid top", "mesh"]),
    ('r', &["running", "red", "regular"]),
    ('s', &["sneakers", "slip on"]),
    ('t', &["trail", "tennis"]),
    ('w', &["white", "wide", "walking"]),
];

/// Short queries (2-4 chars) that are a fragment of one of these keys expand
/// into the full words.
pub const PARTIAL_EXPANSIONS: &[(&str, &[&str])] = &[
    ("athl", &["athletic"]),
    ("bask", &["basketball"]),
    ("casu", &["casual"]),
    ("hike", &["hiking", "hiker"]),
    ("run", &["running", "runner"]),
    ("snea", &["sneakers"]),
    ("tenn", &["tennis"]),
    ("trai", &["trail", "training"]),
    ("walk", &["walking", "walker"]),
];

/// The twelve canonical color values the catalog stores.
pub const CANONICAL_COLORS: &[&str] = &[
    "Black", "White", "Blue", "Red", "Green", "Grey", "Brown", "Pink", "Purple", "Yellow",
    "Orange", "Beige",
];

/// Free-text color words resolved to one canonical color.
pub const COLOR_SYNONYMS: &[(&str, &str)] = &[
    ("black", "Black"),
    ("charcoal", "Black"),
    ("onyx", "Black"),
    ("white", "White"),
    ("ivory", "White"),
    ("blue", "Blue"),
    ("navy", "Blue"),
    ("teal", "Blue"),
    ("turquoise", "Blue"),
    ("red", "Red"),
    ("crimson", "Red"),
    ("maroon", "Red"),
    ("burgundy", "Red"),
    ("green", "Green"),
    ("olive", "Green"),
    ("mint", "Green"),
    ("grey", "Grey"),
    ("gray", "Grey"),
    ("silver", "Grey"),
    ("brown", "Brown"),
    ("chocolate", "Brown"),
    ("mocha", "Brown"),
    ("pink", "Pink"),
    ("rose", "Pink"),
    ("purple", "Purple"),
    ("violet", "Purple"),
    ("lavender", "Purple"),
    ("yellow", "Yellow"),
    ("gold", "Yellow"),
    ("orange", "Orange"),
    ("coral", "Orange"),
    ("beige", "Beige"),
    ("tan", "Beige"),
    ("khaki", "Beige"),
    ("cream", "Beige"),
];

/// Free-text category words resolved to one or more canonical categories.
/// A key owning several values means those values are OR-combined.
pub const CATEGORY_SYNONYMS: &[(&str, &[&str])] = &[
    ("running", &["running"]),
    ("jogging", &["running"]),
    ("basketball", &["basketball"]),
    ("hoops", &["basketball"]),
    ("tennis", &["tennis"]),
    ("casual", &["casual"]),
    ("athletic", &["athletic"]),
    ("walking", &["walking"]),
    ("hiking", &["hiking"]),
    ("trekking", &["hiking"]),
    (
        "women",
        &["women's running", "women's casual", "women's athletic"],
    ),
    (
        "womens",
        &["women's running", "women's casual", "women's athletic"],
    ),
    (
        "woman",
        &["women's running", "women's casual", "women's athletic"],
    ),
    (
        "ladies",
        &["women's running", "women's casual", "women's athletic"],
    ),
    ("men", &["men's running", "men's casual", "men's athletic"]),
    ("mens", &["men's running", "men's casual", "men's athletic"]),
    ("kids", &["kids"]),
    ("children", &["kids"]),
];

/// Canonical shaft heights and their free-text spellings.
pub const HEIGHT_SYNONYMS: &[(&str, &str)] = &[
    ("high top", "high top"),
    ("high-top", "high top"),
    ("hightop", "high top"),
    ("high", "high top"),
    ("mid top", "mid top"),
    ("mid-top", "mid top"),
    ("midtop", "mid top"),
    ("mid", "mid top"),
    ("low top", "low top"),
    ("low-top", "low top"),
    ("lowtop", "low top"),
    ("low", "low top"),
];

/// Canonical widths and their free-text spellings. "extra wide" entries come
/// first so the two-word form wins before the bare "wide" key can.
pub const WIDTH_SYNONYMS: &[(&str, &str)] = &[
    ("extra wide", "extra wide"),
    ("extra-wide", "extra wide"),
    ("xwide", "extra wide"),
    ("x-wide", "extra wide"),
    ("wide", "wide"),
    ("regular", "regular"),
    ("standard", "regular"),
    ("normal", "regular"),
    ("medium", "regular"),
];

pub const BRAND_SYNONYMS: &[(&str, &str)] = &[
    ("aeroflex", "AeroFlex"),
    ("aero", "AeroFlex"),
    ("cloudstep", "CloudStep"),
    ("strider", "Strider"),
    ("trailforge", "TrailForge"),
    ("urbankicks", "UrbanKicks"),
    ("urban kicks", "UrbanKicks"),
    ("velocity", "Velocity"),
];

pub const COLLECTION_SYNONYMS: &[(&str, &str)] = &[
    ("classic", "Classic"),
    ("retro", "Classic"),
    ("heritage", "Classic"),
    ("limited edition", "Limited Edition"),
    ("limited", "Limited Edition"),
    ("exclusive", "Limited Edition"),
    ("performance", "Performance"),
    ("street", "Street"),
];

/// Expansion words for a single-character query, if any.
pub fn letter_expansions(c: char) -> Option<&'static [&'static str]> {
    LETTER_EXPANSIONS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, words)| *words)
}

/// All expansion words whose table key contains `term`. Only meaningful for
/// short terms; the builder gates callers to 2..=4 chars.
pub fn partial_expansions(term: &str) -> Vec<&'static str> {
    let mut words = Vec::new();
    for (key, expansions) in PARTIAL_EXPANSIONS {
        if key.contains(term) {
            for word in *expansions {
                if !words.contains(word) {
                    words.push(*word);
                }
            }
        }
    }
    words
}

/// Shared resolution rule for the detection tables: an exact match on the
/// whole term wins, then an exact match on any token, then a key appearing
/// as a substring of the term. First hit in table order wins.
fn resolve<'a, T>(table: &'a [(&str, T)], term: &str, words: &[String]) -> Option<&'a T> {
    if let Some((_, value)) = table.iter().find(|(key, _)| *key == term) {
        return Some(value);
    }
    if let Some((_, value)) = table
        .iter()
        .find(|(key, _)| words.iter().any(|w| w == key))
    {
        return Some(value);
    }
    table
        .iter()
        .find(|(key, _)| term.contains(key))
        .map(|(_, value)| value)
}

pub fn resolve_color(term: &str, words: &[String]) -> Option<&'static str> {
    resolve(COLOR_SYNONYMS, term, words).copied()
}

pub fn resolve_categories(term: &str, words: &[String]) -> Option<&'static [&'static str]> {
    resolve(CATEGORY_SYNONYMS, term, words).copied()
}

pub fn resolve_height(term: &str, words: &[String]) -> Option<&'static str> {
    resolve(HEIGHT_SYNONYMS, term, words).copied()
}

pub fn resolve_width(term: &str, words: &[String]) -> Option<&'static str> {
    resolve(WIDTH_SYNONYMS, term, words).copied()
}

pub fn resolve_brand(term: &str, words: &[String]) -> Option<&'static str> {
    resolve(BRAND_SYNONYMS, term, words).copied()
}

pub fn resolve_collection(term: &str, words: &[String]) -> Option<&'static str> {
    resolve(COLLECTION_SYNONYMS, term, words).copied()
}

/// Whether `value` is a canonical category the catalog can actually store.
/// Used to drop unknown category filters instead of failing the request.
pub fn is_canonical_category(value: &str) -> bool {
    CATEGORY_SYNONYMS
        .iter()
        .flat_map(|(_, values)| values.iter())
        .any(|v| v.eq_ignore_ascii_case(value))
}
