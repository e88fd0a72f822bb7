//! Discovered scanner info cache.
//!
//! Entries are keyed by the owner of a canonical scope and stay valid while
//! the profile id stored with them is the one the scope resolves to. Reads of
//! valid entries never take the discovery lock; misses are serialized behind
//! a reentrant lock so a loader may query the cache while discovering.

mod entry;

pub use entry::{CacheEntry, stored_info_key};

use crate::config::DiscoveryConfig;
use crate::context::{ContextResolver, ResolvedScope};
use crate::merge::SettingsMerger;
use crate::toolchain::BuildModel;
use dashmap::DashMap;
use parking_lot::{ReentrantMutex, RwLock};
use scanscope_api::{
    CacheOwner, CacheStats, ConfigurationId, DiscoveryLoader, DiscoveryStore, InheritingDataFactory,
    NoopStore, PathInfo, ResourceDataFactory, ScopeContext, SettingRecord,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

pub struct DiscoveryCache {
    model: RwLock<Arc<BuildModel>>,
    loader: Arc<dyn DiscoveryLoader>,
    store: Arc<dyn DiscoveryStore>,
    factory: Arc<dyn ResourceDataFactory>,
    config: DiscoveryConfig,
    entries: DashMap<CacheOwner, CacheEntry>,
    discovery_lock: ReentrantMutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    discoveries: AtomicU64,
    failures: AtomicU64,
}

impl DiscoveryCache {
    pub fn new(model: Arc<BuildModel>, loader: Arc<dyn DiscoveryLoader>) -> Self {
        Self {
            model: RwLock::new(model),
            loader,
            store: Arc::new(NoopStore),
            factory: Arc::new(InheritingDataFactory),
            config: DiscoveryConfig::default(),
            entries: DashMap::new(),
            discovery_lock: ReentrantMutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            discoveries: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DiscoveryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_factory(mut self, factory: Arc<dyn ResourceDataFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Snapshot of the build model queries currently resolve against.
    pub fn model(&self) -> Arc<BuildModel> {
        self.model.read().clone()
    }

    /// Swaps in an edited build model. Entries whose profile no longer
    /// matches are dropped lazily on their next read.
    pub fn set_model(&self, model: Arc<BuildModel>) {
        *self.model.write() = model;
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn get(&self, scope: &ScopeContext) -> Arc<PathInfo> {
        self.get_with_cancel(scope, &CancellationToken::new())
    }

    /// Discovered info for `scope`, running discovery on a miss. Returns
    /// [`PathInfo::EMPTY`] when no profile governs the scope or discovery
    /// fails; failures leave nothing behind so the next read retries.
    pub fn get_with_cancel(&self, scope: &ScopeContext, cancel: &CancellationToken) -> Arc<PathInfo> {
        self.ensure_entry(scope, cancel)
            .map(|entry| entry.value)
            .unwrap_or_else(PathInfo::empty_arc)
    }

    /// Merged per-resource records of the entry governing `scope`.
    pub fn settings(&self, scope: &ScopeContext) -> Arc<[SettingRecord]> {
        self.ensure_entry(scope, &CancellationToken::new())
            .and_then(|entry| entry.settings)
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Drops the entry for `scope`. Configurations discovering per resource
    /// type lose every entry under them, since their tool entries may have
    /// been derived from the one removed. Waits for a discovery in flight
    /// so its result cannot outlive the invalidation.
    pub fn invalidate(&self, scope: &ScopeContext, also_store: bool) {
        let _guard = self.discovery_lock.lock();
        let model = self.model();
        let resolved = ContextResolver::new(&model, &self.config).resolve(scope);
        self.entries.remove(&resolved.owner());

        let configuration = resolved.canonical.configuration;
        if model[configuration].per_rc_type_discovery {
            self.remove_configuration_entries(&model, configuration);
        }
        if also_store {
            self.store.remove_stored_info(&resolved.canonical);
        }
        tracing::debug!("Invalidated discovered info for {}", resolved.canonical);
    }

    /// Drops everything owned by `configuration` after its profile changed.
    pub fn on_profile_changed(&self, configuration: ConfigurationId) {
        let _guard = self.discovery_lock.lock();
        let model = self.model();
        self.remove_configuration_entries(&model, configuration);
        tracing::info!(
            "Discovery profile of configuration `{}` changed, cached info dropped",
            model[configuration].name
        );
    }

    pub fn clear(&self) {
        let _guard = self.discovery_lock.lock();
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            discoveries: self.discoveries.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn ensure_entry(&self, scope: &ScopeContext, cancel: &CancellationToken) -> Option<CacheEntry> {
        let model = self.model();
        let resolver = ContextResolver::new(&model, &self.config);
        let resolved = resolver.resolve(scope);
        let Some(profile_id) = resolved.profile_id.as_deref() else {
            tracing::debug!("No discovery profile for {}", scope);
            return None;
        };

        if let Some(entry) = self
            .valid_entry(resolved.owner(), profile_id)
            .or_else(|| self.fallback_entry(&model, &resolver, &resolved))
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let _guard = self.discovery_lock.lock();
        if let Some(entry) = self.valid_entry(resolved.owner(), profile_id) {
            return Some(entry);
        }
        let entry = self.discover(&model, &resolved, profile_id, cancel)?;
        self.entries.insert(resolved.owner(), entry.clone());
        Some(entry)
    }

    /// Entry of `owner` when it was produced by `profile_id`. A stale entry
    /// is removed before anything can read it.
    fn valid_entry(&self, owner: CacheOwner, profile_id: &str) -> Option<CacheEntry> {
        let stale = match self.entries.get(&owner) {
            Some(entry) if entry.is_valid_for(profile_id) => return Some(entry.clone()),
            Some(_) => true,
            None => false,
        };
        if stale {
            self.entries
                .remove_if(&owner, |_, entry| !entry.is_valid_for(profile_id));
            tracing::debug!("Dropped stale discovered info of {:?}", owner);
        }
        None
    }

    /// Entry of a tool superclass with a matching input type, then the
    /// whole-configuration entry.
    fn fallback_entry(
        &self,
        model: &BuildModel,
        resolver: &ContextResolver<'_>,
        resolved: &ResolvedScope,
    ) -> Option<CacheEntry> {
        let canonical = resolved.canonical;
        let search_first = self.config.search_first_profile;

        if let Some(tool) = canonical.tool {
            for superclass in model.tool_chain_of(tool).skip(1) {
                let input = resolver.matching_super_input(superclass.id, canonical.input_type);
                let scope = ScopeContext {
                    tool: Some(superclass.id),
                    input_type: input,
                    ..canonical
                };
                if let Some(profile_id) = resolver.resolve_profile_id(&scope, search_first)
                    && let Some(entry) = self.valid_entry(CacheOwner::for_scope(&scope), &profile_id)
                {
                    tracing::debug!("Using discovered info of superclass {} for {}", superclass.name, canonical);
                    return Some(entry);
                }
            }
        }

        if canonical.is_whole_configuration() {
            return None;
        }
        let scope = ScopeContext::configuration(canonical.configuration);
        let profile_id = resolver.resolve_profile_id(&scope, search_first)?;
        self.valid_entry(CacheOwner::for_scope(&scope), &profile_id)
    }

    fn discover(
        &self,
        model: &BuildModel,
        resolved: &ResolvedScope,
        profile_id: &str,
        cancel: &CancellationToken,
    ) -> Option<CacheEntry> {
        let scope = &resolved.canonical;
        if cancel.is_cancelled() {
            self.failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Discovery for {} cancelled before start", scope);
            return None;
        }

        let fresh_run = !self
            .store
            .has_stored_info(scope, &stored_info_key(scope, profile_id));
        tracing::info!(
            "Running discovery for {} with profile `{}` (fresh run: {})",
            scope,
            profile_id,
            fresh_run
        );

        let raw = match self.loader.load(scope, profile_id, fresh_run, cancel) {
            Ok(_) if cancel.is_cancelled() => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Discovery for {} cancelled, result dropped", scope);
                return None;
            }
            Ok(raw) => {
                self.discoveries.fetch_add(1, Ordering::Relaxed);
                raw
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Discovery for {} failed: {}", scope, err);
                return None;
            }
        };

        let value = if raw.base.is_empty() {
            PathInfo::empty_arc()
        } else {
            Arc::new(raw.base)
        };
        let mut entry = CacheEntry::new(profile_id, value);
        if let Some(per_file) = &raw.per_file {
            let records = SettingsMerger::new(self.factory.as_ref())
                .with_mode(self.config.merge_mode)
                .merge_discovered_info(&model[scope.configuration].data, per_file);
            entry = entry.with_settings(records);
        }
        Some(entry)
    }

    fn remove_configuration_entries(&self, model: &BuildModel, configuration: ConfigurationId) {
        let resources: HashSet<_> = model[configuration].resource_infos.iter().copied().collect();
        let tools: HashSet<_> = resources
            .iter()
            .flat_map(|rc| model[*rc].tools.iter().copied())
            .collect();

        self.entries.retain(|owner, _| match owner {
            CacheOwner::Configuration(id) => *id != configuration,
            CacheOwner::Resource(rc) => !resources.contains(rc),
            CacheOwner::ToolInput(tool, _) => !tools.contains(tool),
        });
    }
}
