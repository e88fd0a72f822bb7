use super::extension::ExtensionSet;
use super::path_info::EntryKinds;
use super::resource_path::ResourcePath;
use serde::{Deserialize, Serialize};

/// A language configured on a folder or file: which sources it compiles and
/// which setting entries it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_extensions: Vec<String>,
    #[serde(default)]
    pub supported_kinds: EntryKinds,
}

impl LanguageData {
    pub fn new<I, S>(id: impl Into<String>, source_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            source_extensions: source_extensions.into_iter().map(Into::into).collect(),
            supported_kinds: EntryKinds::ALL,
        }
    }

    pub fn with_supported_kinds(mut self, kinds: EntryKinds) -> Self {
        self.supported_kinds = kinds;
        self
    }

    pub fn extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(self.source_extensions.iter().cloned())
    }

    pub fn handles_extension(&self, ext: &str) -> bool {
        self.source_extensions.iter().any(|e| e == ext)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderData {
    pub path: ResourcePath,
    #[serde(default)]
    pub languages: Vec<LanguageData>,
}

impl FolderData {
    pub fn new(path: ResourcePath, languages: Vec<LanguageData>) -> Self {
        Self { path, languages }
    }

    /// First language whose source extensions cover the file's extension.
    pub fn language_for_file(&self, file: &ResourcePath) -> Option<&LanguageData> {
        let ext = file.file_extension();
        self.languages.iter().find(|l| l.handles_extension(ext))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub path: ResourcePath,
    #[serde(default)]
    pub language: Option<LanguageData>,
}

impl FileData {
    pub fn new(path: ResourcePath, language: Option<LanguageData>) -> Self {
        Self { path, language }
    }
}

/// Build configuration data attached to one project resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceData {
    Folder(FolderData),
    File(FileData),
}

impl ResourceData {
    pub fn path(&self) -> &ResourcePath {
        match self {
            ResourceData::Folder(f) => &f.path,
            ResourceData::File(f) => &f.path,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderData> {
        match self {
            ResourceData::Folder(f) => Some(f),
            ResourceData::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileData> {
        match self {
            ResourceData::File(f) => Some(f),
            ResourceData::Folder(_) => None,
        }
    }
}

/// All resource data of one build configuration: the root folder plus every
/// folder or file carrying its own settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationData {
    pub root: FolderData,
    #[serde(default)]
    pub resources: Vec<ResourceData>,
}

impl ConfigurationData {
    pub fn new(root_languages: Vec<LanguageData>) -> Self {
        Self {
            root: FolderData::new(ResourcePath::root(), root_languages),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, data: ResourceData) -> Self {
        self.resources.push(data);
        self
    }
}

impl Default for ConfigurationData {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_for_file_matches_extension() {
        let folder = FolderData::new(
            ResourcePath::root(),
            vec![
                LanguageData::new("c", ["c"]),
                LanguageData::new("cpp", ["cpp", "cc"]),
            ],
        );
        let lang = folder.language_for_file(&ResourcePath::parse("src/x.cc"));
        assert_eq!(lang.map(|l| l.id.as_str()), Some("cpp"));
        assert!(folder.language_for_file(&ResourcePath::parse("README")).is_none());
    }

    #[test]
    fn resource_data_is_tagged() {
        let data: ResourceData = serde_json::from_str(
            r#"{"kind":"file","path":"src/a.c","language":{"id":"c","source_extensions":["c"]}}"#,
        )
        .unwrap();
        let file = data.as_file().unwrap();
        assert_eq!(file.path, ResourcePath::parse("src/a.c"));
        assert_eq!(
            file.language.as_ref().map(|l| l.supported_kinds),
            Some(EntryKinds::ALL)
        );
    }
}
