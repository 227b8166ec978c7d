//! Free-text search helpers.
//!
//! Ranking itself is PostgreSQL's (`ts_rank` over a weighted `tsvector`);
//! this module only validates input and turns it into a safe `tsquery`.

use crate::error::CoreError;

/// Minimum trimmed query length, in characters, for a full search.
pub const MIN_QUERY_CHARS: usize = 2;

/// Number of title suggestions returned by the typeahead endpoint.
pub const SUGGESTION_LIMIT: i64 = 5;

/// Text search configuration. `simple` avoids language-specific stemming so
/// Arabic and English content are indexed the same way.
pub const TS_CONFIG: &str = "simple";

/// Whether a query is long enough to search with.
pub fn meets_minimum(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Reject queries shorter than [`MIN_QUERY_CHARS`].
pub fn validate_query(query: &str) -> Result<(), CoreError> {
    if !meets_minimum(query) {
        return Err(CoreError::Validation(
            "الرجاء إدخال كلمة بحث (حرفين على الأقل)".into(),
        ));
    }
    Ok(())
}

/// Split input into terms made only of letters, digits and `_`.
///
/// Every other character is dropped so operators such as `&`, `|`, `!`, `:`
/// or parentheses can never reach the tsquery parser.
fn sanitize_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Build a `tsquery` string that matches documents containing any term.
///
/// Returns `None` when nothing searchable remains after sanitizing.
pub fn build_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query);
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}

/// Escape `%`, `_` and `\` so the input is matched literally by `LIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%input%` with LIKE metacharacters escaped.
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input.trim()))
}
