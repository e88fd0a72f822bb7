use crate::{load_manifest, not_found};
use scanscope_api::{InheritingDataFactory, PathInfo, ResourcePath};
use scanscope_core::{MergeMode, SettingsMerger};
use std::collections::BTreeMap;
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Include paths")]
    include_paths: String,
    #[tabled(rename = "Symbols")]
    symbols: String,
}

pub fn render(
    manifest: &Path,
    discovered: &Path,
    configuration: Option<&str>,
    file_data: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let (manifest, model) = load_manifest(manifest)?;
    let cfg = match configuration {
        Some(name) => model
            .configuration_by_name(name)
            .ok_or_else(|| not_found("configuration", name))?,
        None => model
            .configurations()
            .first()
            .ok_or_else(|| not_found("configuration", "<any>"))?,
    };

    let raw = std::fs::read_to_string(discovered)?;
    let map: BTreeMap<ResourcePath, PathInfo> = serde_json::from_str(&raw)?;

    let mode = if file_data {
        MergeMode::FileData
    } else {
        manifest.discovery.merge_mode
    };
    let records = SettingsMerger::new(&InheritingDataFactory)
        .with_mode(mode)
        .merge_discovered_info(&cfg.data, &map);

    if records.is_empty() {
        return Ok(format!("No settings for configuration `{}`.", cfg.name));
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .map(|r| RecordRow {
            resource: if r.path.is_root() {
                "/".to_string()
            } else {
                r.path.to_string()
            },
            language: r.language.clone(),
            include_paths: r
                .info
                .include_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" "),
            symbols: r
                .info
                .symbols
                .iter()
                .map(|(k, v)| if v.is_empty() { k.clone() } else { format!("{k}={v}") })
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect();
    Ok(Table::new(rows).to_string())
}
