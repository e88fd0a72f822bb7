//! Resource hierarchy annotated with per-extension-set aggregates.
//!
//! Nodes are keyed by path in a `BTreeMap`, whose ordering is a pre-order
//! walk of the hierarchy. A node's parent is the nearest ancestor path that
//! still holds a node, so removing a node re-parents its descendants.

use super::aggregate::ExtSetAggregate;
use indexmap::IndexMap;
use scanscope_api::{
    ConfigurationData, ExtensionSet, FileData, FolderData, PathInfo, ResourceData,
    ResourceDataFactory, ResourcePath,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SettingsNode {
    pub path: ResourcePath,
    pub data: ResourceData,
    pub sets: IndexMap<ExtensionSet, ExtSetAggregate>,
    ext_index: HashMap<String, ExtensionSet>,
    pub is_derived: bool,
}

impl SettingsNode {
    fn new(path: ResourcePath, data: ResourceData, is_derived: bool) -> Self {
        Self {
            path,
            data,
            sets: IndexMap::new(),
            ext_index: HashMap::new(),
            is_derived,
        }
    }

    fn for_folder(folder: &FolderData) -> Self {
        let mut node = Self::new(folder.path.clone(), ResourceData::Folder(folder.clone()), false);
        for language in &folder.languages {
            node.sets
                .insert(language.extension_set(), ExtSetAggregate::for_language(language));
        }
        node.reindex();
        node
    }

    fn for_file(file: &FileData) -> Self {
        let mut node = Self::new(file.path.clone(), ResourceData::File(file.clone()), false);
        let agg = match &file.language {
            Some(language) => ExtSetAggregate::new(
                ExtensionSet::single(file.path.file_extension()),
                Some(language.clone()),
                false,
            ),
            None => ExtSetAggregate::new(ExtensionSet::default(), None, false),
        };
        node.insert_set(agg);
        node
    }

    /// Aggregate covering `ext`, if any set of this node contains it.
    pub fn set_for_ext(&self, ext: &str) -> Option<&ExtSetAggregate> {
        self.ext_index.get(ext).and_then(|key| self.sets.get(key))
    }

    fn set_for_ext_mut(&mut self, ext: &str) -> &mut ExtSetAggregate {
        if !self.ext_index.contains_key(ext) {
            self.insert_set(ExtSetAggregate::new(ExtensionSet::single(ext), None, false));
        }
        let key = &self.ext_index[ext];
        &mut self.sets[key]
    }

    /// Adds a set, merging into an existing one with the same key.
    /// An extension already indexed keeps pointing at its first set.
    fn insert_set(&mut self, agg: ExtSetAggregate) {
        if let Some(existing) = self.sets.get_mut(agg.extensions()) {
            existing.absorb(agg);
            return;
        }
        for ext in agg.extensions().extensions() {
            self.ext_index
                .entry(ext.clone())
                .or_insert_with(|| agg.extensions().clone());
        }
        self.sets.insert(agg.extensions().clone(), agg);
    }

    fn reindex(&mut self) {
        self.ext_index.clear();
        for key in self.sets.keys() {
            for ext in key.extensions() {
                self.ext_index.entry(ext.clone()).or_insert_with(|| key.clone());
            }
        }
    }

    /// Every bound aggregate of `child` has a counterpart here with the
    /// same majority value. Unbound aggregates of the child are ignored.
    fn contains_equal_max_matches(&self, child: &SettingsNode) -> bool {
        child
            .sets
            .iter()
            .filter(|(_, agg)| agg.language().is_some())
            .all(|(key, agg)| match self.sets.get(key) {
                None => false,
                Some(own) => agg.max_match().is_none() || agg.max_match() == own.max_match(),
            })
    }

    /// Replaces the node's data and rebinds its aggregates to the new
    /// languages. Aggregates no language claims lose their binding.
    pub fn rebind(&mut self, data: ResourceData) {
        self.is_derived = false;
        match &data {
            ResourceData::File(file) => {
                let own = self.ext_index.get(file.path.file_extension()).cloned();
                for (key, agg) in self.sets.iter_mut() {
                    match (&file.language, own.as_ref() == Some(key)) {
                        (Some(language), true) => agg.bind(language.clone(), false),
                        _ => agg.unbind(),
                    }
                }
            }
            ResourceData::Folder(folder) => {
                for agg in self.sets.values_mut() {
                    match folder
                        .languages
                        .iter()
                        .find(|l| &l.extension_set() == agg.extensions())
                    {
                        Some(language) => agg.bind(language.clone(), false),
                        None => agg.unbind(),
                    }
                }
            }
        }
        self.data = data;
    }
}

#[derive(Debug, Default)]
pub struct SettingsTree {
    nodes: BTreeMap<ResourcePath, SettingsNode>,
}

impl SettingsTree {
    /// One node for the root folder plus one per resource data the factory
    /// lets into the calculation.
    pub fn build(data: &ConfigurationData, factory: &dyn ResourceDataFactory) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ResourcePath::root(), SettingsNode::for_folder(&data.root));

        for rc in &data.resources {
            if rc.path().is_root() || !factory.include_in_calculation(rc) {
                continue;
            }
            let node = match rc {
                ResourceData::Folder(folder) => SettingsNode::for_folder(folder),
                ResourceData::File(file) => SettingsNode::for_file(file),
            };
            nodes.insert(node.path.clone(), node);
        }
        Self { nodes }
    }

    pub fn root(&self) -> &SettingsNode {
        &self.nodes[&ResourcePath::root()]
    }

    pub fn node(&self, path: &ResourcePath) -> Option<&SettingsNode> {
        self.nodes.get(path)
    }

    /// Node at `path` or at its nearest ancestor.
    pub fn nearest(&self, path: &ResourcePath) -> &SettingsNode {
        let mut current = path.clone();
        loop {
            if let Some(node) = self.nodes.get(&current) {
                return node;
            }
            if current.is_root() {
                return self.root();
            }
            current = current.parent();
        }
    }

    fn parent_path(&self, path: &ResourcePath) -> Option<ResourcePath> {
        if path.is_root() {
            return None;
        }
        let mut current = path.parent();
        loop {
            if self.nodes.contains_key(&current) || current.is_root() {
                return Some(current);
            }
            current = current.parent();
        }
    }

    /// Adds one discovered entry. Root entries feed every root aggregate;
    /// others land on the exact node, the containing folder's node, or a
    /// derived node synthesized for that folder.
    pub fn map_entry(&mut self, path: &ResourcePath, info: Arc<PathInfo>) {
        if path.is_root() {
            if let Some(root) = self.nodes.get_mut(path) {
                for agg in root.sets.values_mut() {
                    agg.add(path.clone(), info.clone());
                }
            }
            return;
        }

        let key = if self.nodes.contains_key(path) {
            path.clone()
        } else {
            let dir = path.parent();
            if !self.nodes.contains_key(&dir) {
                self.insert_derived(&dir);
            }
            dir
        };

        if let Some(node) = self.nodes.get_mut(&key) {
            node.set_for_ext_mut(path.file_extension())
                .add(path.clone(), info);
        }
    }

    fn insert_derived(&mut self, dir: &ResourcePath) {
        let Some(parent) = self.parent_path(dir).and_then(|p| self.nodes.get(&p)) else {
            return;
        };
        let mut node = SettingsNode::new(dir.clone(), parent.data.clone(), true);
        for agg in parent.sets.values() {
            node.sets.insert(agg.extensions().clone(), agg.derived_copy());
        }
        node.reindex();
        self.nodes.insert(dir.clone(), node);
    }

    /// Folds derived nodes that add nothing over their parent into it.
    pub fn remove_duplicates(&mut self) {
        let paths: Vec<ResourcePath> = self.nodes.keys().cloned().collect();
        for path in paths {
            let Some(parent_path) = self.parent_path(&path) else {
                continue;
            };
            let foldable = match (self.nodes.get(&path), self.nodes.get(&parent_path)) {
                (Some(node), Some(parent)) => node.is_derived && parent.contains_equal_max_matches(node),
                _ => false,
            };
            if !foldable {
                continue;
            }
            if let Some(child) = self.nodes.remove(&path)
                && let Some(parent) = self.nodes.get_mut(&parent_path)
            {
                for (_, agg) in child.sets {
                    parent.insert_set(agg);
                }
            }
        }
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut SettingsNode> {
        self.nodes.values_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
