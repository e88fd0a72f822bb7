use super::tree::SettingsTree;
use scanscope_api::{
    ConfigurationData, PathInfo, ResourceData, ResourceDataFactory, ResourcePath, SettingRecord,
};
use std::sync::Arc;

/// Maps each non-empty entry straight onto the resource it names.
pub(super) fn map_entries(
    factory: &dyn ResourceDataFactory,
    data: &ConfigurationData,
    entries: &[(ResourcePath, Arc<PathInfo>)],
) -> Vec<SettingRecord> {
    let tree = SettingsTree::build(data, factory);
    let mut records = Vec::with_capacity(entries.len());

    for (path, info) in entries {
        if info.is_empty() {
            continue;
        }

        if path.is_root() {
            let kinds = info.entry_kinds();
            for language in &data.root.languages {
                if language.supported_kinds.intersects(kinds) {
                    records.push(SettingRecord::new(path.clone(), &language.id, info.clone()));
                }
            }
            continue;
        }

        let node = tree.nearest(path);
        let language = if node.data.path() == path {
            match &node.data {
                ResourceData::File(file) => file.language.clone(),
                ResourceData::Folder(folder) => folder.language_for_file(path).cloned(),
            }
        } else {
            let created = match &node.data {
                ResourceData::Folder(folder) => {
                    factory.create_file_data(path, folder, folder.language_for_file(path))
                }
                ResourceData::File(file) => factory.create_file_data_from(path, file),
            };
            match created {
                Ok(file) => file.language,
                Err(err) => {
                    tracing::warn!("Skipping file settings: {}", err);
                    continue;
                }
            }
        };

        if let Some(language) = language {
            records.push(SettingRecord::new(path.clone(), language.id, info.clone()));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanscope_api::{EntryKinds, FileData, InheritingDataFactory, LanguageData};

    #[test]
    fn root_entry_respects_supported_kinds() {
        let data = ConfigurationData::new(vec![
            LanguageData::new("c", ["c"]),
            LanguageData::new("asm", ["s"]).with_supported_kinds(EntryKinds::MACRO),
        ]);
        let info = Arc::new(PathInfo::default().with_include_path("/inc"));
        let records = map_entries(&InheritingDataFactory, &data, &[(ResourcePath::root(), info)]);
        let languages: Vec<&str> = records.iter().map(|r| r.language.as_str()).collect();
        assert_eq!(languages, vec!["c"]);
    }

    #[test]
    fn file_under_file_data_inherits_its_language() {
        let data = ConfigurationData::new(vec![LanguageData::new("c", ["c"])]).with_resource(
            ResourceData::File(FileData::new(
                ResourcePath::parse("gen/x.inc"),
                Some(LanguageData::new("cpp", ["inc"])),
            )),
        );
        let info = Arc::new(PathInfo::default().with_symbol("X", "1"));
        let records = map_entries(
            &InheritingDataFactory,
            &data,
            &[(ResourcePath::parse("gen/x.inc/part"), info)],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].language, "cpp");
    }
}
