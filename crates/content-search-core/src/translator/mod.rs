//! Query translator: criteria and sort clauses to physical search requests.
//!
//! Field-level leaves are expanded per language. With requested languages
//! `[l1, l2]` a predicate `p` on a translatable field becomes
//!
//! ```text
//! p(<base>_l1) OR p(<base>_l2) [OR (always_available = true AND p(<base>_main))]
//! ```
//!
//! where the bracketed branch is added when the always-available fallback is on. Without
//! requested languages the predicate runs on the `<base>_all` projection. Full-text leaves
//! follow the same rule over the aggregated `text_*` fields.

mod coerce;

pub use coerce::coerce;

use std::sync::Arc;
use tracing::debug;

use crate::criterion::{
    ContentIdCriterion, Criterion, CustomFields, FieldCriterion, LanguageCodeCriterion,
    MapLocationDistanceCriterion, MetadataCriterion, MetadataTarget,
};
use crate::document::{names, IndexValue};
use crate::error::{Error, Result};
use crate::field_registry::{FieldKind, FieldLanguage, FieldRegistry};
use crate::operator::Operator;
use crate::physical::{FacetRequest, PhysicalQuery, PhysicalSort, SearchRequest};
use crate::query::{FacetBuilder, FieldFilters, Query};
use crate::sort_clause::{SortClause, SortTarget};
use crate::value::{CriterionValue, Scalar};

/// Lowers queries into [`SearchRequest`]s.
#[derive(Debug, Clone)]
pub struct QueryTranslator {
    fields: Arc<FieldRegistry>,
    max_limit: usize,
    timeout_ms: u64,
}

impl QueryTranslator {
    /// Creates a translator.
    ///
    /// `max_limit` caps every request's limit; `timeout_ms` is the execution budget copied
    /// into each request.
    #[must_use]
    pub fn new(fields: Arc<FieldRegistry>, max_limit: usize, timeout_ms: u64) -> Self {
        Self {
            fields,
            max_limit,
            timeout_ms,
        }
    }

    /// Hard cap applied to limits.
    #[must_use]
    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Translates a full query.
    ///
    /// Language narrowing comes only from field and full-text expansion; no
    /// document-level language restriction is added, so a raw hit may still be invisible
    /// to the post-processor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for unresolvable fields and
    /// [`Error::InvalidArgument`] for values that cannot be coerced to their field kind.
    pub fn translate(&self, query: &Query, filters: &FieldFilters) -> Result<SearchRequest> {
        let filter = match &query.filter {
            Some(criterion) => self.translate_criterion(criterion, filters)?,
            None => PhysicalQuery::MatchAll,
        };

        let scoring = match &query.query {
            Some(criterion) => self.translate_criterion(criterion, filters)?,
            None => PhysicalQuery::MatchAll,
        };

        let sort = query
            .sort_clauses
            .iter()
            .map(|clause| self.translate_sort(clause))
            .collect::<Result<Vec<_>>>()?;

        let limit = query
            .limit
            .map_or(self.max_limit, |limit| limit.min(self.max_limit));

        let request = SearchRequest {
            filter,
            query: scoring,
            sort,
            offset: query.offset,
            limit,
            facets: query.facets.iter().map(facet_request).collect(),
            timeout_ms: self.timeout_ms,
        };

        debug!(
            fields = request.filter.fields().len(),
            sort_keys = request.sort.len(),
            limit = request.limit,
            languages = filters.languages.len(),
            "Translated query"
        );
        Ok(request)
    }

    /// Translates one criterion tree.
    ///
    /// # Errors
    ///
    /// See [`QueryTranslator::translate`].
    pub fn translate_criterion(
        &self,
        criterion: &Criterion,
        filters: &FieldFilters,
    ) -> Result<PhysicalQuery> {
        match criterion {
            Criterion::MatchAll => Ok(PhysicalQuery::MatchAll),
            Criterion::MatchNone => Ok(PhysicalQuery::MatchNone),
            Criterion::ContentId(c) => content_id(c),
            Criterion::Metadata(c) => metadata(c),
            Criterion::LanguageCode(c) => language_code(c),
            Criterion::Field(c) => self.field(c, filters),
            Criterion::CustomField(c) => {
                compile_leaf(c.target(), None, c.operator(), c.value())
            }
            Criterion::FullText(c) => expand_languages(filters, true, |language| {
                Ok(PhysicalQuery::FullText {
                    fields: vec![language.project(names::TEXT)],
                    text: c.text().to_owned(),
                })
            }),
            Criterion::MapLocationDistance(c) => self.map_location_distance(c, filters),
            Criterion::LogicalAnd { criteria } => criteria
                .iter()
                .map(|c| self.translate_criterion(c, filters))
                .collect::<Result<Vec<_>>>()
                .map(PhysicalQuery::and),
            Criterion::LogicalOr { criteria } => criteria
                .iter()
                .map(|c| self.translate_criterion(c, filters))
                .collect::<Result<Vec<_>>>()
                .map(PhysicalQuery::or),
            Criterion::LogicalNot { criterion } => self
                .translate_criterion(criterion, filters)
                .map(PhysicalQuery::not),
        }
    }

    /// Content types a field criterion applies to: every searchable registration of the
    /// identifier plus every overridden content type.
    fn content_types_for(
        &self,
        identifier: &str,
        overrides: &CustomFields,
    ) -> Result<Vec<String>> {
        let mut content_types: Vec<String> = self
            .fields
            .definitions_for(identifier)
            .into_iter()
            .filter(|d| d.searchable)
            .map(|d| d.content_type.clone())
            .collect();
        for content_type in overrides.content_types_for(identifier) {
            if !content_types.iter().any(|c| c == content_type) {
                content_types.push(content_type.to_owned());
            }
        }
        if content_types.is_empty() {
            return Err(Error::UnknownField(identifier.to_owned()));
        }
        Ok(content_types)
    }

    fn field(&self, criterion: &FieldCriterion, filters: &FieldFilters) -> Result<PhysicalQuery> {
        let identifier = criterion.target();
        let overrides = criterion.custom_fields();

        let mut branches = Vec::new();
        for content_type in self.content_types_for(identifier, overrides)? {
            let definition = self.fields.definition(&content_type, identifier);
            let kind = definition.map(|d| d.kind);
            let translatable = definition.is_some_and(|d| d.translatable);

            branches.push(expand_languages(filters, translatable, |language| {
                let name = self
                    .fields
                    .resolve(&content_type, identifier, language, overrides)?;
                compile_leaf(&name, kind, criterion.operator(), criterion.value())
            })?);
        }
        Ok(PhysicalQuery::or(branches))
    }

    fn map_location_distance(
        &self,
        criterion: &MapLocationDistanceCriterion,
        filters: &FieldFilters,
    ) -> Result<PhysicalQuery> {
        let identifier = criterion.target();
        let overrides = criterion.custom_fields();

        let mut branches = Vec::new();
        for content_type in self.content_types_for(identifier, overrides)? {
            let definition = self.fields.definition(&content_type, identifier);
            if let Some(d) = definition.filter(|d| d.kind != FieldKind::GeoLocation) {
                return Err(Error::InvalidArgument(format!(
                    "{content_type}/{identifier} is a {:?} field, not a map location",
                    d.kind
                )));
            }
            let translatable = definition.is_some_and(|d| d.translatable);

            branches.push(expand_languages(filters, translatable, |language| {
                let name = self
                    .fields
                    .resolve(&content_type, identifier, language, overrides)?;
                geo_distance(&name, criterion)
            })?);
        }
        Ok(PhysicalQuery::or(branches))
    }

    /// Translates one sort clause. Field sorts use exactly the given language.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for unregistered fields.
    pub fn translate_sort(&self, clause: &SortClause) -> Result<PhysicalSort> {
        let direction = clause.direction;
        let by_field = |field: &str| PhysicalSort::Field {
            field: field.to_owned(),
            direction,
        };

        Ok(match &clause.target {
            SortTarget::ContentId => by_field(names::ID),
            SortTarget::ContentName => by_field(names::NAME),
            SortTarget::DateModified => by_field(names::MODIFIED),
            SortTarget::DatePublished => by_field(names::PUBLISHED),
            SortTarget::SectionId => by_field(names::SECTION),
            SortTarget::LocationDepth => by_field(names::DEPTH),
            SortTarget::LocationPath => by_field(names::PATH),
            SortTarget::Score => PhysicalSort::Score { direction },
            SortTarget::Field {
                content_type,
                field,
                language,
            } => by_field(&self.sort_field(content_type, field, language.as_deref())?),
            SortTarget::MapLocationDistance {
                content_type,
                field,
                latitude,
                longitude,
                language,
            } => PhysicalSort::GeoDistance {
                field: self.sort_field(content_type, field, language.as_deref())?,
                latitude: *latitude,
                longitude: *longitude,
                direction,
            },
        })
    }

    fn sort_field(
        &self,
        content_type: &str,
        field: &str,
        language: Option<&str>,
    ) -> Result<String> {
        let language = language.map_or(FieldLanguage::Main, FieldLanguage::Code);
        self.fields
            .resolve(content_type, field, language, &CustomFields::new())
    }
}

fn expand_languages<F>(
    filters: &FieldFilters,
    translatable: bool,
    mut build: F,
) -> Result<PhysicalQuery>
where
    F: FnMut(FieldLanguage<'_>) -> Result<PhysicalQuery>,
{
    if !translatable {
        return build(FieldLanguage::Main);
    }
    if filters.is_unrestricted() {
        return build(FieldLanguage::Any);
    }

    let mut branches = filters
        .languages
        .iter()
        .map(|language| build(FieldLanguage::Code(language)))
        .collect::<Result<Vec<_>>>()?;

    if filters.use_always_available {
        branches.push(PhysicalQuery::and(vec![
            PhysicalQuery::term(names::ALWAYS_AVAILABLE, true),
            build(FieldLanguage::Main)?,
        ]));
    }
    Ok(PhysicalQuery::or(branches))
}

fn facet_request(builder: &FacetBuilder) -> FacetRequest {
    let (name, field, limit) = match builder {
        FacetBuilder::ContentType { name, limit } => (name, names::TYPE_IDENTIFIER, limit),
        FacetBuilder::Section { name, limit } => (name, names::SECTION, limit),
        FacetBuilder::Language { name, limit } => (name, names::LANGUAGE_CODE, limit),
    };
    FacetRequest {
        name: name.clone(),
        field: field.to_owned(),
        limit: *limit,
    }
}

fn single<'a>(field: &str, value: &'a CriterionValue) -> Result<&'a Scalar> {
    value
        .as_single()
        .ok_or_else(|| Error::InvalidArgument(format!("{field}: expected a single value")))
}

fn pair<'a>(field: &str, value: &'a CriterionValue) -> Result<(&'a Scalar, &'a Scalar)> {
    match value.as_array() {
        Some([low, high]) => Ok((low, high)),
        _ => Err(Error::InvalidArgument(format!(
            "{field}: expected exactly two values"
        ))),
    }
}

fn range(
    field: &str,
    lower: Option<IndexValue>,
    upper: Option<IndexValue>,
    inclusive: bool,
) -> PhysicalQuery {
    PhysicalQuery::Range {
        field: field.to_owned(),
        lower,
        upper,
        include_lower: inclusive,
        include_upper: inclusive,
    }
}

/// Compiles an operator/value pair on one physical field.
fn compile_leaf(
    field: &str,
    kind: Option<FieldKind>,
    operator: Operator,
    value: &CriterionValue,
) -> Result<PhysicalQuery> {
    let one = |v: &Scalar| coerce(v, kind);

    Ok(match operator {
        Operator::Eq | Operator::Contains => {
            PhysicalQuery::term(field, one(single(field, value)?)?)
        }
        Operator::In => PhysicalQuery::terms(
            field,
            value.scalars().map(one).collect::<Result<Vec<_>>>()?,
        ),
        Operator::Gt => range(field, Some(one(single(field, value)?)?), None, false),
        Operator::Gte => range(field, Some(one(single(field, value)?)?), None, true),
        Operator::Lt => range(field, None, Some(one(single(field, value)?)?), false),
        Operator::Lte => range(field, None, Some(one(single(field, value)?)?), true),
        Operator::Between => {
            let (low, high) = pair(field, value)?;
            range(field, Some(one(low)?), Some(one(high)?), true)
        }
        Operator::Like => {
            if !matches!(kind, None | Some(FieldKind::String | FieldKind::Text)) {
                return Err(Error::InvalidArgument(format!(
                    "{field}: LIKE requires a string field"
                )));
            }
            match single(field, value)? {
                Scalar::String(pattern) => PhysicalQuery::Wildcard {
                    field: field.to_owned(),
                    pattern: pattern.clone(),
                },
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "{field}: LIKE requires a string pattern, got '{other}'"
                    )))
                }
            }
        }
    })
}

fn content_id(criterion: &ContentIdCriterion) -> Result<PhysicalQuery> {
    compile_leaf(
        names::ID,
        Some(FieldKind::Integer),
        criterion.operator(),
        criterion.value(),
    )
}

fn metadata(criterion: &MetadataCriterion) -> Result<PhysicalQuery> {
    let (field, kind) = match criterion.target() {
        MetadataTarget::ContentTypeId => (names::TYPE, FieldKind::Integer),
        MetadataTarget::ContentTypeIdentifier => (names::TYPE_IDENTIFIER, FieldKind::String),
        MetadataTarget::SectionId => (names::SECTION, FieldKind::Integer),
        MetadataTarget::RemoteId => (names::REMOTE_ID, FieldKind::String),
        MetadataTarget::LocationId => (names::LOCATION, FieldKind::Integer),
        MetadataTarget::ParentLocationId => (names::LOCATION_PARENT, FieldKind::Integer),
        MetadataTarget::LocationRemoteId => (names::LOCATION_REMOTE_ID, FieldKind::String),
        MetadataTarget::DateModified => (names::MODIFIED, FieldKind::Date),
        MetadataTarget::DatePublished => (names::PUBLISHED, FieldKind::Date),
        MetadataTarget::Subtree => {
            let branches = criterion
                .value()
                .scalars()
                .map(|path| PhysicalQuery::Wildcard {
                    field: names::PATH.to_owned(),
                    pattern: format!("{}*", escape_wildcards(&path.to_string())),
                })
                .collect();
            return Ok(PhysicalQuery::or(branches));
        }
    };
    compile_leaf(field, Some(kind), criterion.operator(), criterion.value())
}

fn escape_wildcards(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn language_code(criterion: &LanguageCodeCriterion) -> Result<PhysicalQuery> {
    let by_code = compile_leaf(
        names::LANGUAGE_CODE,
        Some(FieldKind::String),
        criterion.operator(),
        criterion.value(),
    )?;
    if criterion.match_always_available() {
        Ok(PhysicalQuery::or(vec![
            by_code,
            PhysicalQuery::term(names::ALWAYS_AVAILABLE, true),
        ]))
    } else {
        Ok(by_code)
    }
}

fn geo_distance(field: &str, criterion: &MapLocationDistanceCriterion) -> Result<PhysicalQuery> {
    let km = |scalar: &Scalar| {
        scalar.as_f64().ok_or_else(|| {
            Error::InvalidArgument(format!("{field}: distance '{scalar}' is not numeric"))
        })
    };
    let value = criterion.value();

    let (min_km, max_km, include_min, include_max) = match criterion.operator() {
        Operator::Gt => (Some(km(single(field, value)?)?), None, false, false),
        Operator::Gte => (Some(km(single(field, value)?)?), None, true, false),
        Operator::Lt => (None, Some(km(single(field, value)?)?), false, false),
        Operator::Lte => (None, Some(km(single(field, value)?)?), false, true),
        Operator::Between => {
            let (low, high) = pair(field, value)?;
            (Some(km(low)?), Some(km(high)?), true, true)
        }
        other => return Err(Error::invalid_operator("MapLocationDistance", other)),
    };

    Ok(PhysicalQuery::GeoDistance {
        field: field.to_owned(),
        latitude: criterion.latitude(),
        longitude: criterion.longitude(),
        min_km,
        max_km,
        include_min,
        include_max,
    })
}
