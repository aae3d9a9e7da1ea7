//! Name-addressed filter engine

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use bloomstore_core::{
    Filter, FilterElement, FilterError, FilterMetrics, FilterOperation, FilterParams, FilterStats,
    FilterStore, HashFamily, JsonCodec, NoopMetrics, RecordCodec, Result,
};

/// Configuration for FilterEngine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Namespace prefix applied to store keys
    pub namespace: Option<String>,
    /// Deadline for each store operation; exceeded deadlines surface
    /// as `Timeout` instead of hanging
    pub store_timeout: std::time::Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            store_timeout: std::time::Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Create config with a namespace prefix
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Set the store operation deadline
    pub fn store_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

/// Name-addressed bloom filter engine
///
/// Owns the registry of live filters and drives persistence through an
/// injected [`FilterStore`]. Construct one explicitly and share it
/// (it's `Clone`; clones share the same registry); there is no
/// process-wide singleton.
///
/// Generic over:
/// - `S`: the filter store (Memory, Redis)
/// - `C`: the record codec (JSON, bincode)
/// - `M`: the metrics collector
///
/// Lifecycle per name: `create` registers a live filter, `add` /
/// `contains` / `count` / `clear` operate on it, `delete` removes it
/// terminally. Operations on an unregistered name fail with
/// `NotFound`; they never create filters implicitly.
pub struct FilterEngine<S, C = JsonCodec, M = NoopMetrics>
where
    S: FilterStore,
    C: RecordCodec,
    M: FilterMetrics,
{
    filters: Arc<DashMap<String, Arc<Filter>>>,
    store: Arc<S>,
    codec: Arc<C>,
    metrics: Arc<M>,
    config: EngineConfig,
}

// Constructors for default codec/metrics
impl<S: FilterStore> FilterEngine<S, JsonCodec, NoopMetrics> {
    /// Create a new engine with the default JSON codec and no metrics
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create with custom config
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            filters: Arc::new(DashMap::new()),
            store: Arc::new(store),
            codec: Arc::new(JsonCodec),
            metrics: Arc::new(NoopMetrics),
            config,
        }
    }
}

impl<S, C, M> FilterEngine<S, C, M>
where
    S: FilterStore,
    C: RecordCodec,
    M: FilterMetrics,
{
    /// Create an engine with custom codec and metrics
    pub fn with_codec_and_metrics(store: S, codec: C, metrics: M, config: EngineConfig) -> Self {
        Self {
            filters: Arc::new(DashMap::new()),
            store: Arc::new(store),
            codec: Arc::new(codec),
            metrics: Arc::new(metrics),
            config,
        }
    }

    /// Store key for a filter name, with namespace prefix
    fn store_key(&self, name: &str) -> String {
        match &self.config.namespace {
            Some(ns) => format!("{}:{}", ns, name),
            None => name.to_string(),
        }
    }

    /// Bound a store call by the configured deadline.
    async fn bounded<T, Fut>(&self, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.config.store_timeout, call)
            .await
            .map_err(|_| FilterError::Timeout)?
    }

    fn live(&self, name: &str) -> Result<Arc<Filter>> {
        self.filters
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FilterError::NotFound(name.to_string()))
    }

    /// Create a filter under `name`, sized for the given parameters,
    /// and write its initial record to the store.
    ///
    /// Re-initialization is destructive and therefore explicit: if a
    /// live filter or a persisted record already exists under `name`,
    /// this fails with `AlreadyExists` unless
    /// [`FilterParams::reset`] was requested, in which case both are
    /// replaced. Creating never silently reuses existing sizing.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty name or bad sizing inputs,
    /// `AlreadyExists` as above, `BackendUnavailable` / `Timeout` from
    /// the store.
    pub async fn create(&self, name: &str, params: FilterParams) -> Result<()> {
        if name.is_empty() {
            return Err(FilterError::InvalidParameter(
                "filter name must be non-empty".to_string(),
            ));
        }
        let start = Instant::now();

        let seed = params
            .seed
            .unwrap_or_else(|| HashFamily::seed_for_name(name));
        let filter = Arc::new(Filter::new(
            params.expected_insertions,
            params.false_probability,
            seed,
        )?);

        let key = self.store_key(name);
        if !params.reset {
            if self.filters.contains_key(name) {
                return Err(FilterError::AlreadyExists(name.to_string()));
            }
            // A persisted record is real state too; refuse to shadow it.
            if self.bounded(self.store.exists(&key)).await? {
                return Err(FilterError::AlreadyExists(name.to_string()));
            }
        }

        match self.filters.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                if !params.reset {
                    return Err(FilterError::AlreadyExists(name.to_string()));
                }
                self.metrics.record_drop(name, FilterOperation::Create);
                entry.insert(filter.clone());
            }
            Entry::Vacant(entry) => {
                entry.insert(filter.clone());
            }
        }

        let record = filter.snapshot(name);
        let encoded = self.codec.encode(&record)?;
        if let Err(err) = self.bounded(self.store.save(&key, encoded)).await {
            // No partial creates: a name is either fully registered and
            // persisted, or absent.
            self.filters.remove(name);
            return Err(err);
        }

        self.metrics
            .record_create(name, filter.bits(), filter.hashes());
        self.metrics
            .record_latency(FilterOperation::Create, start.elapsed());
        Ok(())
    }

    /// Add an element to the filter registered under `name`.
    ///
    /// Safe under concurrent invocation; no update is lost. Exceeding
    /// the configured expected insertions is allowed and degrades the
    /// real false-positive rate gradually rather than erroring.
    ///
    /// # Errors
    ///
    /// `NotFound` if no live filter exists under `name`, `HashInput`
    /// if the element cannot be converted to bytes (in which case
    /// nothing is inserted).
    pub fn add<E: FilterElement + ?Sized>(&self, name: &str, element: &E) -> Result<()> {
        let start = Instant::now();
        let filter = self.live(name)?;
        filter.add(element)?;
        self.metrics.record_add(name);
        self.metrics
            .record_latency(FilterOperation::Add, start.elapsed());
        Ok(())
    }

    /// Whether `element` is possibly in the filter under `name`.
    ///
    /// `false` is definitive; `true` may be a false positive at the
    /// configured rate. Elements previously added always test `true`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no live filter exists under `name`, `HashInput`
    /// if the element cannot be converted to bytes.
    pub fn contains<E: FilterElement + ?Sized>(&self, name: &str, element: &E) -> Result<bool> {
        let start = Instant::now();
        let filter = self.live(name)?;
        let positive = filter.contains(element)?;
        self.metrics.record_query(name, positive);
        self.metrics
            .record_latency(FilterOperation::Contains, start.elapsed());
        Ok(positive)
    }

    /// Approximate number of `add` calls on the filter under `name`.
    ///
    /// An upper bound on distinct elements, not an exact cardinality:
    /// duplicate adds inflate it.
    pub fn count(&self, name: &str) -> Result<u64> {
        Ok(self.live(name)?.approx_len())
    }

    /// Zero the filter's bit array and counter in place, keeping its
    /// dimensions and registration. Unlike [`delete`](Self::delete),
    /// the name stays live.
    pub fn clear(&self, name: &str) -> Result<()> {
        let filter = self.live(name)?;
        filter.clear();
        self.metrics.record_drop(name, FilterOperation::Clear);
        Ok(())
    }

    /// Delete the filter under `name`: remove its registration and its
    /// persisted record. Terminal: every subsequent operation on the
    /// name fails with `NotFound` until it is created again.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let start = Instant::now();
        let was_live = self.filters.contains_key(name);
        let key = self.store_key(name);
        // Store first: a failed backend delete leaves the live
        // registration and the record both in place, so the name is
        // either fully deleted or not deleted at all.
        let was_stored = self.bounded(self.store.delete(&key)).await?;

        if !was_live && !was_stored {
            return Err(FilterError::NotFound(name.to_string()));
        }
        self.filters.remove(name);
        self.metrics.record_drop(name, FilterOperation::Delete);
        self.metrics
            .record_latency(FilterOperation::Delete, start.elapsed());
        Ok(())
    }

    /// Write a consistent snapshot of the live filter under `name` to
    /// the store, replacing its previous record.
    pub async fn persist(&self, name: &str) -> Result<()> {
        let start = Instant::now();
        let filter = self.live(name)?;
        let record = filter.snapshot(name);
        let encoded = self.codec.encode(&record)?;
        let key = self.store_key(name);
        self.bounded(self.store.save(&key, encoded)).await?;
        self.metrics
            .record_latency(FilterOperation::Persist, start.elapsed());
        Ok(())
    }

    /// Revive a persisted filter into the registry.
    ///
    /// The loaded filter answers membership identically to the process
    /// that persisted it.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if `name` is already live (clear or delete it
    /// first), `NotFound` if the store has no record for it.
    pub async fn load(&self, name: &str) -> Result<()> {
        let start = Instant::now();
        if self.filters.contains_key(name) {
            return Err(FilterError::AlreadyExists(name.to_string()));
        }

        let key = self.store_key(name);
        let encoded = self
            .bounded(self.store.load(&key))
            .await?
            .ok_or_else(|| FilterError::NotFound(name.to_string()))?;
        let record = self.codec.decode(&encoded)?;
        let filter = Arc::new(Filter::from_record(&record)?);

        match self.filters.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(FilterError::AlreadyExists(name.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(filter);
            }
        }
        self.metrics
            .record_latency(FilterOperation::Load, start.elapsed());
        Ok(())
    }

    /// Point-in-time statistics for the filter under `name`
    pub fn stats(&self, name: &str) -> Result<FilterStats> {
        Ok(self.live(name)?.stats())
    }

    /// Names of all live filters
    pub fn names(&self) -> Vec<String> {
        self.filters.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of live filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is live
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of all persisted records in the store, with the engine's
    /// namespace prefix stripped. Records outside the namespace are
    /// not reported.
    pub async fn stored_names(&self) -> Result<Vec<String>> {
        let keys = self.bounded(self.store.list()).await?;
        Ok(match &self.config.namespace {
            Some(ns) => keys
                .into_iter()
                .filter_map(|key| {
                    key.strip_prefix(ns.as_str())
                        .and_then(|rest| rest.strip_prefix(':'))
                        .map(str::to_string)
                })
                .collect(),
            None => keys,
        })
    }
}

impl<S, C, M> Clone for FilterEngine<S, C, M>
where
    S: FilterStore,
    C: RecordCodec,
    M: FilterMetrics,
{
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            store: self.store.clone(),
            codec: self.codec.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        }
    }
}
