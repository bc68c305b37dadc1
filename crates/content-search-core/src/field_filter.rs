//! Language post-processing of search hits.
//!
//! A content is visible under a [`FieldFilters`] when it is translated into one of the
//! requested languages, or when the always-available fallback is on, the content is
//! flagged always-available and its main translation exists. Without requested languages
//! every content is visible.
//!
//! Visible hits keep only the field translations in visible languages, ordered by
//! request priority, so [`Content::field`] returns the preferred translation. A raw hit
//! without a visible language is an error, never a silent drop, so the reported total
//! stays the backend's total minus duplicates.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::content::Content;
use crate::error::{Error, Result};
use crate::query::FieldFilters;
use crate::search_result::SearchResult;

/// Returns true if the content has a visible language under the filters.
#[must_use]
pub fn is_visible(content: &Content, filters: &FieldFilters) -> bool {
    !visible_languages(content, filters).is_empty()
}

/// Visible languages of a content, highest priority first.
///
/// Without requested languages, the main language comes first followed by the other
/// translations. Otherwise the requested languages the content has, in request order,
/// or only the main language when the content is visible through always-available.
#[must_use]
pub fn visible_languages<'a>(content: &'a Content, filters: &'a FieldFilters) -> Vec<&'a str> {
    let main = content.info.main_language_code.as_str();

    if filters.is_unrestricted() {
        let mut languages = Vec::with_capacity(content.version.language_codes.len());
        if content.has_language(main) {
            languages.push(main);
        }
        for code in &content.version.language_codes {
            if !languages.contains(&code.as_str()) {
                languages.push(code);
            }
        }
        return languages;
    }

    let languages: Vec<&str> = filters
        .languages
        .iter()
        .map(String::as_str)
        .filter(|l| content.has_language(l))
        .collect();

    if languages.is_empty()
        && filters.use_always_available
        && content.info.always_available
        && content.has_language(main)
    {
        return vec![main];
    }
    languages
}

fn restrict_fields(content: &mut Content, languages: &[&str]) {
    let priority = |code: &str| languages.iter().position(|l| *l == code);
    content
        .fields
        .retain(|field| priority(&field.language_code).is_some());
    content
        .fields
        .sort_by_key(|field| priority(&field.language_code));
}

/// Applies language visibility, de-duplication and field ordering to raw hits.
///
/// Hit order is preserved. Hits repeating an earlier content id are removed.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for the first hit without a visible language.
pub fn apply(mut result: SearchResult, filters: &FieldFilters) -> Result<SearchResult> {
    let mut seen = FxHashSet::default();
    let mut removed = 0_usize;
    let mut hits = Vec::with_capacity(result.hits.len());

    for mut hit in std::mem::take(&mut result.hits) {
        let content = &mut hit.value_object;
        if !seen.insert(content.id()) {
            removed += 1;
            continue;
        }

        let languages: Vec<String> = visible_languages(content, filters)
            .into_iter()
            .map(str::to_owned)
            .collect();

        if languages.is_empty() {
            warn!(
                content_id = content.id(),
                languages = ?filters.languages,
                "Raw hit has no visible language"
            );
            return Err(Error::NotFound(format!(
                "content {} has no translation in {:?}",
                content.id(),
                filters.languages
            )));
        }

        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();
        restrict_fields(content, &languages);
        hits.push(hit);
    }

    if removed > 0 {
        debug!(removed, "Post-processing removed duplicate hits");
    }

    result.total_count = result.total_count.saturating_sub(removed);
    result.hits = hits;
    Ok(result)
}
