use indexmap::IndexMap;
use scanscope_api::{ExtensionSet, LanguageData, PathInfo, ResourcePath};
use std::sync::Arc;

/// Discovered data collected for one extension set of a tree node.
///
/// Occurrences are bucketed by value in first-seen order. The majority
/// bucket only changes hands when a challenger grows strictly larger.
#[derive(Debug, Clone)]
pub struct ExtSetAggregate {
    exts: ExtensionSet,
    buckets: IndexMap<Arc<PathInfo>, Vec<ResourcePath>>,
    max_match: Option<usize>,
    language: Option<LanguageData>,
    is_derived: bool,
}

impl ExtSetAggregate {
    pub fn new(exts: ExtensionSet, language: Option<LanguageData>, is_derived: bool) -> Self {
        Self {
            exts,
            buckets: IndexMap::new(),
            max_match: None,
            language,
            is_derived,
        }
    }

    /// Aggregate bound to a configured language, keyed by its extensions.
    pub fn for_language(language: &LanguageData) -> Self {
        Self::new(language.extension_set(), Some(language.clone()), false)
    }

    /// Empty copy keeping the key and language binding, marked derived.
    pub fn derived_copy(&self) -> Self {
        Self::new(self.exts.clone(), self.language.clone(), true)
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.exts
    }

    pub fn language(&self) -> Option<&LanguageData> {
        self.language.as_ref()
    }

    pub fn is_derived(&self) -> bool {
        self.is_derived
    }

    pub fn add(&mut self, path: ResourcePath, info: Arc<PathInfo>) {
        let index = match self.buckets.get_index_of(&info) {
            Some(index) => {
                self.buckets[index].push(path);
                index
            }
            None => {
                let (index, _) = self.buckets.insert_full(info, vec![path]);
                index
            }
        };

        match self.max_match {
            None => self.max_match = Some(index),
            Some(max) if max != index => {
                if self.buckets[index].len() > self.buckets[max].len() {
                    self.max_match = Some(index);
                }
            }
            Some(_) => {}
        }
    }

    /// Replays every occurrence of `other` into this aggregate.
    pub fn absorb(&mut self, other: ExtSetAggregate) {
        for (info, paths) in other.buckets {
            for path in paths {
                self.add(path, info.clone());
            }
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.buckets.len() > 1
    }

    pub fn max_match(&self) -> Option<&Arc<PathInfo>> {
        self.max_match
            .and_then(|i| self.buckets.get_index(i))
            .map(|(info, _)| info)
    }

    /// Every occurrence, in bucket order.
    pub fn occurrences(&self) -> impl Iterator<Item = (&ResourcePath, &Arc<PathInfo>)> {
        self.buckets
            .iter()
            .flat_map(|(info, paths)| paths.iter().map(move |p| (p, info)))
    }

    /// Occurrences whose value differs from the majority, in bucket order.
    pub fn minority_occurrences(&self) -> impl Iterator<Item = (&ResourcePath, &Arc<PathInfo>)> {
        let max = self.max_match;
        self.buckets
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != max)
            .flat_map(|(_, (info, paths))| paths.iter().map(move |p| (p, info)))
    }

    pub fn bind(&mut self, language: LanguageData, is_derived: bool) {
        self.language = Some(language);
        self.is_derived = is_derived;
    }

    pub fn unbind(&mut self) {
        self.language = None;
        self.is_derived = false;
    }

    /// Same key and same single value; aggregates holding several values
    /// are never considered equal.
    pub fn settings_equal(&self, other: &ExtSetAggregate) -> bool {
        !self.is_multiple()
            && !other.is_multiple()
            && self.exts == other.exts
            && self.max_match() == other.max_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> Arc<PathInfo> {
        Arc::new(PathInfo::default().with_include_path(format!("/inc/{name}")))
    }

    fn agg() -> ExtSetAggregate {
        ExtSetAggregate::new(ExtensionSet::single("c"), None, false)
    }

    #[test]
    fn majority_follows_strict_growth() {
        let (a, b) = (info("a"), info("b"));
        let mut agg = agg();
        agg.add(ResourcePath::parse("x.c"), a.clone());
        agg.add(ResourcePath::parse("y.c"), b.clone());
        assert_eq!(agg.max_match(), Some(&a));
        assert!(agg.is_multiple());

        agg.add(ResourcePath::parse("z.c"), b.clone());
        assert_eq!(agg.max_match(), Some(&b));
    }

    #[test]
    fn ties_keep_the_incumbent() {
        let (a, b) = (info("a"), info("b"));
        let mut agg = agg();
        agg.add(ResourcePath::parse("1.c"), a.clone());
        agg.add(ResourcePath::parse("2.c"), a.clone());
        agg.add(ResourcePath::parse("3.c"), b.clone());
        agg.add(ResourcePath::parse("4.c"), b.clone());
        assert_eq!(agg.max_match(), Some(&a));
    }

    #[test]
    fn minority_occurrences_skip_majority() {
        let (a, b) = (info("a"), info("b"));
        let mut agg = agg();
        agg.add(ResourcePath::parse("1.c"), a.clone());
        agg.add(ResourcePath::parse("2.c"), b.clone());
        agg.add(ResourcePath::parse("3.c"), a.clone());
        let minority: Vec<String> = agg
            .minority_occurrences()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(minority, vec!["2.c"]);
    }

    #[test]
    fn absorb_replays_occurrences() {
        let (a, b) = (info("a"), info("b"));
        let mut parent = agg();
        parent.add(ResourcePath::root(), a.clone());
        let mut child = agg();
        child.add(ResourcePath::parse("s/1.c"), b.clone());
        child.add(ResourcePath::parse("s/2.c"), b.clone());
        parent.absorb(child);
        assert_eq!(parent.max_match(), Some(&b));
        assert_eq!(parent.minority_occurrences().count(), 1);
    }

    #[test]
    fn multiple_aggregates_are_never_settings_equal() {
        let mut one = agg();
        one.add(ResourcePath::parse("1.c"), info("a"));
        let mut two = agg();
        two.add(ResourcePath::parse("1.c"), info("a"));
        assert!(one.settings_equal(&two));
        two.add(ResourcePath::parse("2.c"), info("b"));
        assert!(!one.settings_equal(&two));
    }
}
