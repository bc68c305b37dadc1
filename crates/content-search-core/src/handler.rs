//! Search handler: the public entry point.
//!
//! Composes the translator, gateway, language post-processor and indexing mapper over
//! one backend. Handlers are cheap to share behind an `Arc`; every call is
//! request-scoped.
//!
//! ```rust,ignore
//! use content_search_core::{
//!     CommitMode, ContentSearchConfig, FieldFilters, InMemoryIndex, Query, SearchHandler,
//! };
//! use std::sync::Arc;
//!
//! let handler = SearchHandler::from_config(Arc::new(InMemoryIndex::new()), &config)?;
//! handler.index_content(&content, CommitMode::Sync)?;
//! let result = handler.find_content(&Query::new(), &FieldFilters::languages(["eng-GB"]))?;
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::IndexBackend;
use crate::config::ContentSearchConfig;
use crate::content::Content;
use crate::criterion::Criterion;
use crate::document::names;
use crate::error::{Error, Result};
use crate::field_filter;
use crate::field_registry::FieldRegistry;
use crate::field_type::FieldTypeRegistry;
use crate::gateway::SearchGateway;
use crate::mapper::ContentMapper;
use crate::physical::PhysicalQuery;
use crate::query::{FieldFilters, Query};
use crate::search_result::SearchResult;
use crate::translator::QueryTranslator;

/// When indexed documents become searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// On the backend's next refresh (default).
    #[default]
    Eventual,
    /// Before the indexing call returns.
    Sync,
}

/// Content search entry point.
#[derive(Clone)]
pub struct SearchHandler {
    backend: Arc<dyn IndexBackend>,
    translator: QueryTranslator,
    gateway: SearchGateway,
    mapper: ContentMapper,
    commit_mode: CommitMode,
}

impl std::fmt::Debug for SearchHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandler")
            .field("translator", &self.translator)
            .field("commit_mode", &self.commit_mode)
            .finish_non_exhaustive()
    }
}

impl SearchHandler {
    /// Creates a handler from explicit registries.
    #[must_use]
    pub fn new(
        backend: Arc<dyn IndexBackend>,
        fields: Arc<FieldRegistry>,
        field_types: Arc<FieldTypeRegistry>,
        config: &ContentSearchConfig,
    ) -> Self {
        let mapper = ContentMapper::new(Arc::clone(&fields), field_types);
        Self {
            translator: QueryTranslator::new(
                fields,
                config.search.max_limit,
                config.search.request_timeout_ms,
            ),
            gateway: SearchGateway::new(Arc::clone(&backend), mapper.clone()),
            mapper,
            backend,
            commit_mode: config.indexing.commit_mode,
        }
    }

    /// Creates a handler whose field registry comes from `config.fields`, with the
    /// built-in field type encoders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid settings or duplicate field definitions.
    pub fn from_config(
        backend: Arc<dyn IndexBackend>,
        config: &ContentSearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        let fields = config.field_registry()?;
        Ok(Self::new(
            backend,
            Arc::new(fields),
            Arc::new(FieldTypeRegistry::new()),
            config,
        ))
    }

    /// Commit mode configured for indexing calls that do not choose one.
    #[must_use]
    pub fn default_commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    /// The translator used by this handler.
    #[must_use]
    pub fn translator(&self) -> &QueryTranslator {
        &self.translator
    }

    /// Finds contents matching the query, filtered by language visibility.
    ///
    /// # Errors
    ///
    /// Returns translation errors ([`Error::UnknownField`], [`Error::InvalidArgument`]),
    /// [`Error::BackendUnavailable`], or [`Error::NotFound`] when a matched content has no
    /// visible language under `filters`.
    pub fn find_content(&self, query: &Query, filters: &FieldFilters) -> Result<SearchResult> {
        let request = self.translator.translate(query, filters)?;
        let raw = self.gateway.execute(&request)?;
        field_filter::apply(raw, filters)
    }

    /// Finds the single content matching the criterion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidObjectCount`] unless exactly one content matches, and
    /// [`Error::NotFound`] when it has no visible language.
    pub fn find_single(&self, criterion: &Criterion, filters: &FieldFilters) -> Result<Content> {
        let query = Query::new()
            .with_filter(criterion.clone())
            .with_offset(0)
            .with_limit(1);
        let request = self.translator.translate(&query, filters)?;
        let raw = self.gateway.execute(&request)?;

        if raw.total_count != 1 {
            return Err(Error::InvalidObjectCount {
                expected: 1,
                found: raw.total_count,
            });
        }

        field_filter::apply(raw, filters)?
            .hits
            .into_iter()
            .next()
            .map(|hit| hit.value_object)
            .ok_or_else(|| Error::NotFound("matching content was not returned".into()))
    }

    /// Completion suggestions for `prefix` over physical `field_paths` (the content name
    /// when empty), restricted by an optional filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] for backends without suggestions.
    pub fn suggest(
        &self,
        prefix: &str,
        field_paths: &[String],
        limit: usize,
        filter: Option<&Criterion>,
    ) -> Result<Vec<String>> {
        let filter = match filter {
            Some(criterion) => self
                .translator
                .translate_criterion(criterion, &FieldFilters::default())?,
            None => PhysicalQuery::MatchAll,
        };
        let default_fields = [names::NAME.to_owned()];
        let fields = if field_paths.is_empty() {
            &default_fields[..]
        } else {
            field_paths
        };
        self.backend.suggest(prefix, fields, limit, &filter)
    }

    /// Indexes one content, replacing its previous document.
    ///
    /// # Errors
    ///
    /// Returns mapping errors or [`Error::BackendUnavailable`].
    pub fn index_content(&self, content: &Content, mode: CommitMode) -> Result<()> {
        self.bulk_index_content(std::slice::from_ref(content), mode)
    }

    /// Indexes several contents in one backend call.
    ///
    /// # Errors
    ///
    /// Returns mapping errors or [`Error::BackendUnavailable`]. Nothing is written when
    /// any content fails to map.
    pub fn bulk_index_content(&self, contents: &[Content], mode: CommitMode) -> Result<()> {
        let documents = contents
            .iter()
            .map(|c| self.mapper.map_content(c))
            .collect::<Result<Vec<_>>>()?;
        let count = documents.len();

        self.backend.index(documents)?;
        if mode == CommitMode::Sync {
            self.backend.refresh()?;
        }
        debug!(count, ?mode, "Indexed contents");
        Ok(())
    }

    /// Removes a content from the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`].
    pub fn delete_content(&self, content_id: i64) -> Result<()> {
        self.backend.delete(&content_id.to_string())?;
        debug!(content_id, "Deleted content from index");
        Ok(())
    }

    /// Removes every content from the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`].
    pub fn purge_index(&self) -> Result<()> {
        self.backend.purge()?;
        info!("Purged search index");
        Ok(())
    }

    /// Makes pending writes searchable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`].
    pub fn refresh(&self) -> Result<()> {
        self.backend.refresh()
    }
}
