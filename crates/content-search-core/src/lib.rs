//! # Content Search Core
//!
//! Criterion-based content search with language-aware result filtering.
//!
//! Queries are trees of typed predicates ([`Criterion`]) over system metadata and
//! localized content fields. A [`QueryTranslator`] turns them into a backend-neutral
//! physical query using the [`FieldRegistry`], an [`IndexBackend`] executes it, and the
//! language post-processor keeps each hit's translations visible under the caller's
//! [`FieldFilters`], failing with [`Error::NotFound`] for a hit that has none.
//!
//! ## Features
//!
//! - **Typed criteria**: per-criterion operator tables validate value arity, count and type
//!   at construction
//! - **Field registry**: logical `(content type, field, language)` triples resolve to
//!   physical index fields, with per-criterion overrides
//! - **Language fallback**: requested languages in priority order, plus the
//!   always-available main-language fallback
//! - **Indexing pipeline**: contents map to flat documents through pluggable field type
//!   encoders
//! - **Reference backend**: [`InMemoryIndex`] evaluates the physical query model
//!   in-process, with near-real-time visibility
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use content_search_core::{
//!     CommitMode, ContentSearchConfig, Criterion, FieldFilters, InMemoryIndex, Query,
//!     SearchHandler, SortClause, SortDirection,
//! };
//! use std::sync::Arc;
//!
//! let config = ContentSearchConfig::load()?;
//! let handler = SearchHandler::from_config(Arc::new(InMemoryIndex::new()), &config)?;
//!
//! handler.index_content(&content, CommitMode::Sync)?;
//!
//! let query = Query::new()
//!     .with_query(Criterion::full_text("one")?)
//!     .with_sort(SortClause::field("folder", "name", None, SortDirection::Asc));
//! let result = handler.find_content(&query, &FieldFilters::languages(["eng-GB", "eng-US"]))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod async_ops;
pub mod backend;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod content;
pub mod criterion;
#[cfg(test)]
mod criterion_tests;
pub mod document;
pub mod error;
pub mod field_filter;
pub mod field_registry;
pub mod field_type;
pub mod gateway;
#[cfg(test)]
mod gateway_tests;
pub mod handler;
#[cfg(test)]
mod handler_tests;
pub mod mapper;
pub mod operator;
pub mod physical;
pub mod query;
pub mod search_result;
pub mod sort_clause;
pub mod telemetry;
pub mod translator;
#[cfg(test)]
mod translator_tests;
pub mod value;

pub use backend::{BackendHit, BackendResponse, InMemoryIndex, IndexBackend};
pub use config::{ConfigError, ContentSearchConfig};
pub use content::{Content, ContentInfo, Field, FieldValue, Location, VersionInfo, VersionStatus};
pub use criterion::{
    ContentIdCriterion, Criterion, CustomFieldCriterion, CustomFields, FieldCriterion,
    FullTextCriterion, LanguageCodeCriterion, MapLocationDistanceCriterion, MetadataCriterion,
    MetadataTarget,
};
pub use document::{Document, IndexValue};
pub use error::{Error, Result};
pub use field_registry::{FieldDefinition, FieldKind, FieldLanguage, FieldRegistry};
pub use field_type::{DateAndTimeValue, DateTimeHash, FieldTypeEncoder, FieldTypeRegistry};
pub use gateway::SearchGateway;
pub use handler::{CommitMode, SearchHandler};
pub use mapper::ContentMapper;
pub use operator::{Operator, Specification, Specifications, ValueFormat, ValueTypes};
pub use physical::{Facet, FacetRequest, PhysicalQuery, PhysicalSort, SearchRequest};
pub use query::{FacetBuilder, FieldFilters, Query};
pub use search_result::{SearchHit, SearchResult};
pub use sort_clause::{SortClause, SortDirection, SortTarget};
pub use translator::QueryTranslator;
pub use value::{CriterionValue, Scalar};
