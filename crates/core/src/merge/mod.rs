//! Turns a flat per-file discovery map into per-resource setting records.
//!
//! In tree mode the discovered values are laid over the resource hierarchy,
//! each folder keeps the value most of its files share and only the files
//! that differ get their own record. File-data mode maps every entry to its
//! own resource without any majority computation.

mod aggregate;
mod file_mode;
mod tree;

pub use aggregate::ExtSetAggregate;
pub use tree::{SettingsNode, SettingsTree};

use scanscope_api::{
    ConfigurationData, FolderData, PathInfo, ResourceData, ResourceDataFactory, ResourcePath,
    SettingRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    Tree,
    FileData,
}

pub struct SettingsMerger<'f> {
    factory: &'f dyn ResourceDataFactory,
    mode: MergeMode,
}

impl<'f> SettingsMerger<'f> {
    pub fn new(factory: &'f dyn ResourceDataFactory) -> Self {
        Self {
            factory,
            mode: MergeMode::Tree,
        }
    }

    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    pub fn merge_discovered_info(
        &self,
        data: &ConfigurationData,
        discovered: &BTreeMap<ResourcePath, PathInfo>,
    ) -> Vec<SettingRecord> {
        let entries = ordered_entries(discovered);
        let records = match self.mode {
            MergeMode::Tree => self.merge_tree(data, &entries),
            MergeMode::FileData => file_mode::map_entries(self.factory, data, &entries),
        };
        tracing::debug!(
            "merged {} discovered entries into {} records ({:?} mode)",
            discovered.len(),
            records.len(),
            self.mode
        );
        records
    }

    fn merge_tree(
        &self,
        data: &ConfigurationData,
        entries: &[(ResourcePath, Arc<PathInfo>)],
    ) -> Vec<SettingRecord> {
        let mut tree = SettingsTree::build(data, self.factory);
        for (path, info) in entries {
            if info.is_empty() {
                continue;
            }
            tree.map_entry(path, info.clone());
        }
        tree.remove_duplicates();

        let mut records = Vec::new();
        for node in tree.nodes_mut() {
            if node.is_derived && !self.realize(node) {
                continue;
            }
            self.emit(node, &mut records);
        }
        records
    }

    /// Gives a surviving derived node folder data of its own.
    fn realize(&self, node: &mut SettingsNode) -> bool {
        let Some(base) = node.data.as_folder() else {
            tracing::warn!("derived settings node {} has no folder to inherit from", node.path);
            return false;
        };
        match self.factory.create_folder_data(&node.path, base) {
            Ok(folder) => {
                node.rebind(ResourceData::Folder(folder));
                true
            }
            Err(err) => {
                tracing::warn!("Skipping folder settings: {}", err);
                false
            }
        }
    }

    fn emit(&self, node: &SettingsNode, records: &mut Vec<SettingRecord>) {
        match &node.data {
            ResourceData::File(file) => {
                let Some(agg) = node.set_for_ext(file.path.file_extension()) else {
                    return;
                };
                if let (Some(info), Some(language)) = (agg.max_match(), agg.language()) {
                    records.push(SettingRecord::new(file.path.clone(), &language.id, info.clone()));
                }
            }
            ResourceData::Folder(folder) => {
                for agg in node.sets.values() {
                    let (Some(info), Some(language)) = (agg.max_match(), agg.language()) else {
                        continue;
                    };
                    records.push(SettingRecord::new(folder.path.clone(), &language.id, info.clone()));
                    if !agg.is_multiple() {
                        continue;
                    }
                    for (path, info) in agg.minority_occurrences() {
                        match self.factory.create_file_data(path, folder, Some(language)) {
                            Ok(file) => {
                                if let Some(file_language) = file.language {
                                    records.push(SettingRecord::new(file.path, file_language.id, info.clone()));
                                }
                            }
                            Err(err) => tracing::warn!("Skipping file settings: {}", err),
                        }
                    }
                }
            }
        }
    }
}

/// One `EMPTY` record per language of `folder`, resetting its settings.
pub fn empty_records(folder: &FolderData) -> Vec<SettingRecord> {
    folder
        .languages
        .iter()
        .map(|l| SettingRecord::new(folder.path.clone(), &l.id, PathInfo::empty_arc()))
        .collect()
}

/// Entries ordered by depth, path order within a depth. Equal values share
/// one allocation so buckets compare cheaply.
fn ordered_entries(discovered: &BTreeMap<ResourcePath, PathInfo>) -> Vec<(ResourcePath, Arc<PathInfo>)> {
    let mut interned: HashMap<&PathInfo, Arc<PathInfo>> = HashMap::new();
    let mut entries: Vec<(ResourcePath, Arc<PathInfo>)> = discovered
        .iter()
        .map(|(path, info)| {
            let shared = interned
                .entry(info)
                .or_insert_with(|| Arc::new(info.clone()))
                .clone();
            (path.clone(), shared)
        })
        .collect();
    entries.sort_by_key(|(path, _)| path.segment_count());
    entries
}
