//! In-process index backend.
//!
//! Documents live in a committed map guarded by a `parking_lot::RwLock`. Writes go to a
//! pending buffer first and become searchable on [`IndexBackend::refresh`], which mirrors
//! the near-real-time visibility of external search engines.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::{BackendHit, BackendResponse, IndexBackend};
use crate::document::{Document, IndexValue};
use crate::error::{Error, Result};
use crate::physical::matching::{compare_keys, evaluate, sort_key};
use crate::physical::{Facet, FacetRequest, PhysicalQuery, PhysicalSort, SearchRequest};
use crate::sort_clause::SortDirection;

/// Deadline is checked every this many documents.
const DEADLINE_CHECK_INTERVAL: usize = 256;

#[derive(Debug, Default)]
struct State {
    committed: BTreeMap<String, Document>,
    pending: Vec<Document>,
}

/// In-memory [`IndexBackend`].
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    state: RwLock<State>,
    offline: AtomicBool,
    latency_ms: AtomicU64,
}

struct Candidate<'a> {
    doc: &'a Document,
    score: f32,
    keys: Vec<Option<IndexValue>>,
}

impl InMemoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of searchable documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().committed.len()
    }

    /// Returns true if no document is searchable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of writes waiting for a refresh.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Searchable document by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Document> {
        self.state.read().committed.get(id).cloned()
    }

    /// Simulates an unreachable index: every call fails with
    /// [`Error::BackendUnavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Adds an artificial delay to every search.
    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, AtomicOrdering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(Error::BackendUnavailable("in-memory index is offline".into()));
        }
        Ok(())
    }

    fn simulate_latency(&self) {
        let ms = self.latency_ms.load(AtomicOrdering::SeqCst);
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
}

fn check_deadline(start: Instant, budget: Duration) -> Result<()> {
    if start.elapsed() > budget {
        return Err(Error::BackendUnavailable(format!(
            "search exceeded its {} ms budget",
            budget.as_millis()
        )));
    }
    Ok(())
}

/// Numeric ids compare as numbers, anything else as strings.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn compute_facet(request: &FacetRequest, matches: &[Candidate<'_>]) -> Facet {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for candidate in matches {
        let mut seen: Vec<String> = Vec::new();
        for value in candidate.doc.get(&request.field) {
            let key = value.to_string();
            if !seen.contains(&key) {
                *counts.entry(key.clone()).or_default() += 1;
                seen.push(key);
            }
        }
    }

    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(request.limit);

    Facet {
        name: request.name.clone(),
        entries,
    }
}

fn order_candidates(candidates: &mut [Candidate<'_>], sort: &[PhysicalSort]) {
    let score_desc = [PhysicalSort::Score {
        direction: SortDirection::Desc,
    }];
    let sort = if sort.is_empty() { &score_desc[..] } else { sort };

    for candidate in candidates.iter_mut() {
        candidate.keys = sort
            .iter()
            .map(|s| sort_key(s, candidate.doc, candidate.score))
            .collect();
    }

    candidates.sort_by(|a, b| {
        sort.iter()
            .enumerate()
            .map(|(i, s)| compare_keys(a.keys[i].as_ref(), b.keys[i].as_ref(), s.direction()))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| compare_ids(&a.doc.id, &b.doc.id))
    });
}

impl IndexBackend for InMemoryIndex {
    fn search(&self, request: &SearchRequest) -> Result<BackendResponse> {
        self.ensure_online()?;
        let start = Instant::now();
        let budget = Duration::from_millis(request.timeout_ms);
        self.simulate_latency();

        let state = self.state.read();
        let mut candidates = Vec::new();

        for (i, doc) in state.committed.values().enumerate() {
            if i % DEADLINE_CHECK_INTERVAL == 0 {
                check_deadline(start, budget)?;
            }
            if evaluate(&request.filter, doc).is_none() {
                continue;
            }
            if let Some(score) = evaluate(&request.query, doc) {
                candidates.push(Candidate {
                    doc,
                    score,
                    keys: Vec::new(),
                });
            }
        }

        let facets = request
            .facets
            .iter()
            .map(|f| compute_facet(f, &candidates))
            .collect();

        order_candidates(&mut candidates, &request.sort);
        check_deadline(start, budget)?;

        let total = candidates.len();
        let hits: Vec<BackendHit> = candidates
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .map(|c| BackendHit {
                score: c.score,
                document: c.doc.clone(),
            })
            .collect();

        let took = start.elapsed();
        debug!(
            total,
            returned = hits.len(),
            took_us = took.as_micros() as u64,
            "In-memory search executed"
        );

        Ok(BackendResponse {
            total,
            hits,
            facets,
            took,
        })
    }

    fn enforces_deadline(&self) -> bool {
        true
    }

    fn index(&self, documents: Vec<Document>) -> Result<()> {
        self.ensure_online()?;
        let count = documents.len();
        self.state.write().pending.extend(documents);
        trace!(count, "Buffered documents for the next refresh");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.state.write();
        state.committed.remove(id);
        state.pending.retain(|doc| doc.id != id);
        Ok(())
    }

    fn purge(&self) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.state.write();
        state.committed.clear();
        state.pending.clear();
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let pending = std::mem::take(&mut state.pending);
        let count = pending.len();
        for doc in pending {
            state.committed.insert(doc.id.clone(), doc);
        }
        trace!(count, "Refreshed in-memory index");
        Ok(())
    }

    fn suggest(
        &self,
        prefix: &str,
        fields: &[String],
        limit: usize,
        filter: &PhysicalQuery,
    ) -> Result<Vec<String>> {
        self.ensure_online()?;
        let prefix = prefix.to_lowercase();
        let state = self.state.read();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for doc in state.committed.values() {
            if evaluate(filter, doc).is_none() {
                continue;
            }
            for field in fields {
                for value in doc.get(field).iter().filter_map(IndexValue::as_str) {
                    if value.to_lowercase().starts_with(&prefix) {
                        *counts.entry(value).or_default() += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(value, _)| value.to_owned())
            .collect())
    }
}
