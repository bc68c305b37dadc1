//! Reference evaluation of physical queries and sort keys against documents.

use std::cmp::Ordering;

use super::{PhysicalQuery, PhysicalSort};
use crate::document::{Document, IndexValue};
use crate::sort_clause::SortDirection;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Evaluates a query against a document.
///
/// Returns `None` when the document does not match, otherwise its score. Full-text
/// leaves score the number of term occurrences; other matching leaves score 1 and
/// negations score 0. Composites add up the scores of their matching children.
#[must_use]
pub fn evaluate(query: &PhysicalQuery, doc: &Document) -> Option<f32> {
    match query {
        PhysicalQuery::MatchAll => Some(1.0),
        PhysicalQuery::MatchNone => None,
        PhysicalQuery::Term { field, value } => {
            hit(doc.get(field).iter().any(|v| equals(v, value)))
        }
        PhysicalQuery::Terms { field, values } => hit(doc
            .get(field)
            .iter()
            .any(|v| values.iter().any(|candidate| equals(v, candidate)))),
        PhysicalQuery::Range {
            field,
            lower,
            upper,
            include_lower,
            include_upper,
        } => hit(doc.get(field).iter().any(|v| {
            within(v, lower.as_ref(), *include_lower, upper.as_ref(), *include_upper)
        })),
        PhysicalQuery::Wildcard { field, pattern } => hit(doc
            .get(field)
            .iter()
            .filter_map(IndexValue::as_str)
            .any(|s| wildcard_match(s, pattern))),
        PhysicalQuery::FullText { fields, text } => full_text_score(doc, fields, text),
        PhysicalQuery::GeoDistance {
            field,
            latitude,
            longitude,
            min_km,
            max_km,
            include_min,
            include_max,
        } => hit(geo_points(doc, field).any(|(lat, lon)| {
            let d = haversine_km(*latitude, *longitude, lat, lon);
            bound_ok(d, *min_km, *include_min, Ordering::Greater)
                && bound_ok(d, *max_km, *include_max, Ordering::Less)
        })),
        PhysicalQuery::Exists { field } => hit(doc.has(field)),
        PhysicalQuery::And { queries } => queries
            .iter()
            .try_fold(0.0, |acc, q| evaluate(q, doc).map(|s| acc + s)),
        PhysicalQuery::Or { queries } => {
            let scores: Vec<f32> = queries.iter().filter_map(|q| evaluate(q, doc)).collect();
            (!scores.is_empty()).then(|| scores.iter().sum())
        }
        PhysicalQuery::Not { query } => evaluate(query, doc).is_none().then_some(0.0),
    }
}

fn hit(matched: bool) -> Option<f32> {
    matched.then_some(1.0)
}

fn bound_ok(value: f64, bound: Option<f64>, inclusive: bool, wanted: Ordering) -> bool {
    match bound {
        None => true,
        Some(b) => match value.total_cmp(&b) {
            Ordering::Equal => inclusive,
            ord => ord == wanted,
        },
    }
}

fn within(
    value: &IndexValue,
    lower: Option<&IndexValue>,
    include_lower: bool,
    upper: Option<&IndexValue>,
    include_upper: bool,
) -> bool {
    let check = |bound: Option<&IndexValue>, inclusive: bool, wanted: Ordering| match bound {
        None => true,
        Some(b) => match compare_index_values(value, b) {
            Some(Ordering::Equal) => inclusive,
            Some(ord) => ord == wanted,
            None => false,
        },
    };
    check(lower, include_lower, Ordering::Greater) && check(upper, include_upper, Ordering::Less)
}

fn equals(a: &IndexValue, b: &IndexValue) -> bool {
    compare_index_values(a, b) == Some(Ordering::Equal)
}

/// Compares two values of compatible types.
///
/// Integers, floats and dates compare numerically with each other; strings and
/// booleans compare with their own kind. Any other pairing is incomparable.
#[must_use]
pub fn compare_index_values(a: &IndexValue, b: &IndexValue) -> Option<Ordering> {
    match (a, b) {
        (IndexValue::String(x), IndexValue::String(y)) => Some(x.cmp(y)),
        (IndexValue::Boolean(x), IndexValue::Boolean(y)) => Some(x.cmp(y)),
        (
            IndexValue::Integer(x) | IndexValue::Date(x),
            IndexValue::Integer(y) | IndexValue::Date(y),
        ) => Some(x.cmp(y)),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Some(x.total_cmp(&y)),
            _ => None,
        },
    }
}

/// Total ordering used for sorting mixed values.
///
/// Type priority (ascending): Boolean < Number < String < GeoPoint.
#[must_use]
pub fn total_order(a: &IndexValue, b: &IndexValue) -> Ordering {
    let rank = |v: &IndexValue| -> u8 {
        match v {
            IndexValue::Boolean(_) => 0,
            IndexValue::Integer(_) | IndexValue::Float(_) | IndexValue::Date(_) => 1,
            IndexValue::String(_) => 2,
            IndexValue::GeoPoint { .. } => 3,
        }
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| compare_index_values(a, b).unwrap_or(Ordering::Equal))
}

/// Wildcard match where `*` matches any run of characters and `?` exactly one.
/// A backslash escapes the next character.
#[must_use]
pub fn wildcard_match(text: &str, pattern: &str) -> bool {
    enum Token {
        Any,
        One,
        Char(char),
    }

    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '*' => Token::Any,
            '?' => Token::One,
            '\\' => Token::Char(chars.next().unwrap_or('\\')),
            other => Token::Char(other),
        });
    }

    let text: Vec<char> = text.chars().collect();
    let m = text.len();

    // row[i] = true if text[..i] matches the pattern tokens seen so far
    let mut row = vec![false; m + 1];
    row[0] = true;

    for token in &tokens {
        let mut next = vec![false; m + 1];
        match token {
            Token::Any => {
                let mut reachable = false;
                for i in 0..=m {
                    reachable |= row[i];
                    next[i] = reachable;
                }
            }
            Token::One => {
                for i in 1..=m {
                    next[i] = row[i - 1];
                }
            }
            Token::Char(c) => {
                for i in 1..=m {
                    next[i] = row[i - 1] && text[i - 1] == *c;
                }
            }
        }
        row = next;
    }

    row[m]
}

/// Splits text into lowercase alphanumeric tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn full_text_score(doc: &Document, fields: &[String], text: &str) -> Option<f32> {
    let doc_tokens: Vec<String> = fields
        .iter()
        .flat_map(|f| doc.get(f))
        .filter_map(IndexValue::as_str)
        .flat_map(tokenize)
        .collect();

    let mut terms = Vec::new();
    for word in text.split_whitespace() {
        let prefix = word.ends_with('*');
        let mut word_tokens = tokenize(word.trim_end_matches('*'));
        let last = word_tokens.pop();
        terms.extend(word_tokens.into_iter().map(|t| (t, false)));
        if let Some(last) = last {
            terms.push((last, prefix));
        }
    }
    if terms.is_empty() {
        return None;
    }

    let mut score = 0.0_f32;
    for (term, prefix) in &terms {
        let count = doc_tokens
            .iter()
            .filter(|t| if *prefix { t.starts_with(term.as_str()) } else { *t == term })
            .count();
        if count == 0 {
            return None;
        }
        score += count as f32;
    }
    Some(score)
}

fn geo_points<'a>(doc: &'a Document, field: &str) -> impl Iterator<Item = (f64, f64)> + 'a {
    doc.get(field).iter().filter_map(|v| match v {
        IndexValue::GeoPoint { lat, lon } => Some((*lat, *lon)),
        _ => None,
    })
}

/// Great-circle distance in kilometres (haversine, earth radius 6371 km).
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sort key of one document for one sort clause; `None` when the document has no value.
#[must_use]
pub fn sort_key(sort: &PhysicalSort, doc: &Document, score: f32) -> Option<IndexValue> {
    match sort {
        PhysicalSort::Field { field, direction } => {
            let values = doc.get(field).iter();
            let key = match direction {
                SortDirection::Asc => values.min_by(|a, b| total_order(a, b)),
                SortDirection::Desc => values.max_by(|a, b| total_order(a, b)),
            };
            key.cloned()
        }
        PhysicalSort::GeoDistance {
            field,
            latitude,
            longitude,
            ..
        } => geo_points(doc, field)
            .map(|(lat, lon)| haversine_km(*latitude, *longitude, lat, lon))
            .min_by(f64::total_cmp)
            .map(IndexValue::Float),
        PhysicalSort::Score { .. } => Some(IndexValue::Float(f64::from(score))),
    }
}

/// Compares two sort keys; missing keys sort last in both directions.
#[must_use]
pub fn compare_keys(
    a: Option<&IndexValue>,
    b: Option<&IndexValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = total_order(x, y);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

impl PhysicalSort {
    /// Direction of this sort key.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        match self {
            Self::Field { direction, .. }
            | Self::GeoDistance { direction, .. }
            | Self::Score { direction } => *direction,
        }
    }
}
