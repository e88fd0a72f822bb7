#![allow(dead_code)]

use parking_lot::Mutex;
use scanscope_api::{
    ConfigurationData, ConfigurationId, DiscoveryError, DiscoveryLoader, DiscoveryResult,
    DiscoveryStore, FileData, FolderData, InputTypeId, LanguageData, PathInfo, RawDiscoveredInfo,
    ResourceData, ResourceDataError, ResourceDataFactory, ResourceInfoId, ResourcePath,
    ScopeContext, ToolId,
};
use scanscope_core::BuildModel;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

pub fn include(dir: &str) -> PathInfo {
    PathInfo::default().with_include_path(dir)
}

/// Value a loader produces for a profile when nothing else is scripted.
pub fn info_for(profile_id: &str) -> PathInfo {
    include(&format!("/usr/include/{profile_id}"))
}

pub fn discovered(entries: &[(&str, &PathInfo)]) -> BTreeMap<ResourcePath, PathInfo> {
    entries
        .iter()
        .map(|(path, info)| (ResourcePath::parse(path), (*info).clone()))
        .collect()
}

pub fn c_project() -> ConfigurationData {
    ConfigurationData::new(vec![LanguageData::new("c", ["c", "h"])])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCall {
    pub scope: ScopeContext,
    pub profile_id: String,
    pub fresh_run: bool,
}

/// Loader answering every profile with [`info_for`], with scripted
/// failures and per-file maps.
#[derive(Default)]
pub struct ScriptedLoader {
    calls: Mutex<Vec<LoadCall>>,
    failures_left: AtomicUsize,
    cancel_on_load: AtomicUsize,
    per_file: Mutex<Option<BTreeMap<ResourcePath, PathInfo>>>,
}

impl ScriptedLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// The next load cancels its own token before returning data.
    pub fn cancel_next(&self) {
        self.cancel_on_load.store(1, Ordering::SeqCst);
    }

    pub fn answer_per_file(&self, map: BTreeMap<ResourcePath, PathInfo>) {
        *self.per_file.lock() = Some(map);
    }

    pub fn calls(&self) -> Vec<LoadCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl DiscoveryLoader for ScriptedLoader {
    fn load(
        &self,
        scope: &ScopeContext,
        profile_id: &str,
        fresh_run: bool,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<RawDiscoveredInfo> {
        self.calls.lock().push(LoadCall {
            scope: *scope,
            profile_id: profile_id.to_string(),
            fresh_run,
        });

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DiscoveryError::BuildFailed(format!("make exited with 2 for {profile_id}")));
        }
        if self.cancel_on_load.swap(0, Ordering::SeqCst) == 1 {
            cancel.cancel();
        }

        let base = info_for(profile_id);
        Ok(match self.per_file.lock().clone() {
            Some(map) => RawDiscoveredInfo::per_file(base, map),
            None => RawDiscoveredInfo::whole(base),
        })
    }
}

/// Store reporting persisted data for a fixed set of fingerprints.
#[derive(Default)]
pub struct RecordingStore {
    pub stored: Mutex<HashSet<String>>,
    pub queried: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<ScopeContext>>,
}

impl DiscoveryStore for RecordingStore {
    fn has_stored_info(&self, _scope: &ScopeContext, serialized: &str) -> bool {
        self.queried.lock().push(serialized.to_string());
        self.stored.lock().contains(serialized)
    }

    fn remove_stored_info(&self, scope: &ScopeContext) {
        self.removed.lock().push(*scope);
    }
}

/// Factory that refuses to synthesize data for chosen paths.
pub struct RefusingFactory {
    pub refused: Vec<ResourcePath>,
    pub excluded: Vec<ResourcePath>,
}

impl RefusingFactory {
    fn check(&self, path: &ResourcePath) -> Result<(), ResourceDataError> {
        if self.refused.contains(path) {
            return Err(ResourceDataError::new(path, "resource is read-only"));
        }
        Ok(())
    }
}

impl ResourceDataFactory for RefusingFactory {
    fn create_file_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
        language: Option<&LanguageData>,
    ) -> Result<FileData, ResourceDataError> {
        self.check(path)?;
        let language = language.cloned().or_else(|| parent.language_for_file(path).cloned());
        Ok(FileData::new(path.clone(), language))
    }

    fn create_file_data_from(
        &self,
        path: &ResourcePath,
        base: &FileData,
    ) -> Result<FileData, ResourceDataError> {
        self.check(path)?;
        Ok(FileData::new(path.clone(), base.language.clone()))
    }

    fn create_folder_data(
        &self,
        path: &ResourcePath,
        parent: &FolderData,
    ) -> Result<FolderData, ResourceDataError> {
        self.check(path)?;
        Ok(FolderData::new(path.clone(), parent.languages.clone()))
    }

    fn include_in_calculation(&self, data: &ResourceData) -> bool {
        !self.excluded.contains(data.path())
    }
}

/// A GNU-style model with two configurations sharing one toolchain.
///
/// `Debug` discovers per resource type; `Release` discovers once for the
/// whole configuration; `Trace` uses a per-file profile.
pub struct Fixture {
    pub model: BuildModel,
    pub debug: ConfigurationId,
    pub release: ConfigurationId,
    pub trace: ConfigurationId,
    pub src: ResourceInfoId,
    pub gcc: ToolId,
    pub c_in: InputTypeId,
    pub cross_gcc: ToolId,
    pub cross_c_in: InputTypeId,
    pub strip: ToolId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_toolchain_profile("gnu.specs")
    }

    /// Same model and ids, with the `gnu` toolchain declaring `profile_id`.
    pub fn with_toolchain_profile(profile_id: &str) -> Self {
        let mut b = BuildModel::builder();
        b.profile("gcc.per.file", true);
        b.profile("gcc.specs", false);

        let c_in = b.input_type("c.in", None, ["c"], Some("gcc.c.specs|gcc.c.alt"));
        let gcc = b.tool("gcc", None, Some("gcc.specs"), vec![c_in]);
        let cross_c_in = b.input_type("cross.c.in", Some(c_in), Vec::<String>::new(), None);
        let cross_gcc = b.tool("arm-gcc", Some(gcc), None, vec![cross_c_in]);
        let strip_in = b.input_type("obj.in", None, ["o"], None);
        let strip = b.tool("strip", None, None, vec![strip_in]);
        let gnu = b.toolchain("gnu", None, Some(profile_id), vec![gcc, cross_gcc, strip]);
        let trace_tc = b.toolchain("gnu.trace", None, Some("gcc.per.file"), vec![gcc]);

        let debug = b.configuration("Debug", gnu, Some("cfg.specs"), true, c_project());
        let src = b.folder_info(debug, ResourcePath::parse("src"), None, vec![gcc, strip]);
        let release = b.configuration("Release", gnu, Some("cfg.specs"), false, c_project());
        let trace = b.configuration("Trace", trace_tc, None, false, c_project());

        Self {
            model: b.build(),
            debug,
            release,
            trace,
            src,
            gcc,
            c_in,
            cross_gcc,
            cross_c_in,
            strip,
        }
    }
}
