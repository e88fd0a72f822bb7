mod common;

use common::{RefusingFactory, c_project, discovered, include};
use scanscope_api::{
    ConfigurationData, EntryKinds, FileData, FolderData, InheritingDataFactory, LanguageData,
    PathInfo, ResourceData, ResourcePath, SettingRecord,
};
use scanscope_core::{MergeMode, SettingsMerger};

fn summary(records: &[SettingRecord]) -> Vec<(String, String, PathInfo)> {
    records
        .iter()
        .map(|r| (r.path.to_string(), r.language.clone(), (*r.info).clone()))
        .collect()
}

fn row(path: &str, language: &str, info: &PathInfo) -> (String, String, PathInfo) {
    (path.to_string(), language.to_string(), info.clone())
}

#[test]
fn folder_takes_the_majority_and_files_override() {
    let (a, b) = (include("/a"), include("/b"));
    let data = c_project().with_resource(ResourceData::Folder(FolderData::new(
        ResourcePath::parse("src"),
        vec![LanguageData::new("c", ["c", "h"])],
    )));
    let map = discovered(&[("src/x.c", &a), ("src/y.c", &b), ("src/z.c", &a)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&data, &map);

    assert_eq!(
        summary(&records),
        vec![row("src", "c", &a), row("src/y.c", "c", &b)]
    );
}

#[test]
fn root_majority_absorbs_an_equal_subfolder() {
    let (a, b) = (include("/a"), include("/b"));
    let map = discovered(&[("", &a), ("src/a.c", &a), ("src/b.c", &a), ("src/c.c", &b)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&c_project(), &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("src/c.c", "c", &b)]
    );
}

#[test]
fn derived_folder_equal_to_parent_produces_no_record() {
    let a = include("/a");
    let map = discovered(&[("main.c", &a), ("lib/util.c", &a), ("lib/io.c", &a)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&c_project(), &map);

    assert_eq!(summary(&records), vec![row("", "c", &a)]);
}

#[test]
fn distinct_subfolder_gets_its_own_record() {
    let (a, b) = (include("/a"), include("/b"));
    let map = discovered(&[("main.c", &a), ("lib/util.c", &b), ("lib/io.c", &b)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&c_project(), &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("lib", "c", &b)]
    );
}

#[test]
fn empty_infos_are_ignored() {
    let a = include("/a");
    let map = discovered(&[("", &PathInfo::EMPTY), ("src/a.c", &PathInfo::EMPTY), ("b.c", &a)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&c_project(), &map);

    assert_eq!(summary(&records), vec![row("", "c", &a)]);
}

#[test]
fn merging_twice_gives_the_same_records() {
    let (a, b) = (include("/a"), include("/b"));
    let map = discovered(&[("x.c", &a), ("y.c", &b), ("sub/z.c", &b), ("sub/w.h", &a)]);
    let merger = SettingsMerger::new(&InheritingDataFactory);

    let first = merger.merge_discovered_info(&c_project(), &map);
    let second = merger.merge_discovered_info(&c_project(), &map);

    assert_eq!(first, second);
}

#[test]
fn file_resource_keeps_its_language() {
    let (a, b) = (include("/a"), include("/b"));
    let data = ConfigurationData::new(vec![
        LanguageData::new("c", ["c"]),
        LanguageData::new("cpp", ["cpp"]),
    ])
    .with_resource(ResourceData::File(FileData::new(
        ResourcePath::parse("gen/table.c"),
        Some(LanguageData::new("cpp", ["c"])),
    )));
    let map = discovered(&[("main.c", &a), ("gen/table.c", &b)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&data, &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("gen/table.c", "cpp", &b)]
    );
}

#[test]
fn unclaimed_extensions_produce_nothing() {
    let a = include("/a");
    let map = discovered(&[("docs/readme.txt", &a), ("notes", &a)]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&c_project(), &map);

    assert!(records.is_empty());
}

#[test]
fn refused_folder_is_skipped_and_merge_continues() {
    let (a, b, c) = (include("/a"), include("/b"), include("/c"));
    let factory = RefusingFactory {
        refused: vec![ResourcePath::parse("lib")],
        excluded: Vec::new(),
    };
    let map = discovered(&[("main.c", &a), ("lib/x.c", &b), ("app/y.c", &c)]);

    let records = SettingsMerger::new(&factory).merge_discovered_info(&c_project(), &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("app", "c", &c)]
    );
}

#[test]
fn refused_file_override_is_skipped() {
    let (a, b) = (include("/a"), include("/b"));
    let factory = RefusingFactory {
        refused: vec![ResourcePath::parse("y.c")],
        excluded: Vec::new(),
    };
    let map = discovered(&[("x.c", &a), ("y.c", &b), ("z.c", &b), ("w.c", &a), ("v.c", &a)]);

    let records = SettingsMerger::new(&factory).merge_discovered_info(&c_project(), &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("z.c", "c", &b)]
    );
}

#[test]
fn excluded_resource_data_is_not_a_node() {
    let (a, b) = (include("/a"), include("/b"));
    let factory = RefusingFactory {
        refused: Vec::new(),
        excluded: vec![ResourcePath::parse("src")],
    };
    let data = c_project().with_resource(ResourceData::Folder(FolderData::new(
        ResourcePath::parse("src"),
        vec![LanguageData::new("c", ["c", "h"])],
    )));
    let map = discovered(&[("", &a), ("src/x.c", &a), ("src/y.c", &b), ("src/z.c", &a)]);

    let records = SettingsMerger::new(&factory).merge_discovered_info(&data, &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("src/y.c", "c", &b)]
    );
}

#[test]
fn file_data_mode_maps_entries_one_to_one() {
    let (a, b) = (include("/a"), include("/b"));
    let macros = PathInfo::default().with_symbol("NDEBUG", "1");
    let data = ConfigurationData::new(vec![
        LanguageData::new("c", ["c"]),
        LanguageData::new("asm", ["s"]).with_supported_kinds(EntryKinds::INCLUDE_PATH),
    ]);
    let map = discovered(&[
        ("", &macros),
        ("src/a.c", &a),
        ("src/b.c", &a),
        ("src/start.s", &b),
        ("src/readme.txt", &b),
    ]);

    let records = SettingsMerger::new(&InheritingDataFactory)
        .with_mode(MergeMode::FileData)
        .merge_discovered_info(&data, &map);

    assert_eq!(
        summary(&records),
        vec![
            row("", "c", &macros),
            row("src/a.c", "c", &a),
            row("src/b.c", "c", &a),
            row("src/start.s", "asm", &b),
        ]
    );
}

#[test]
fn shared_header_extension_goes_to_the_first_language() {
    let (a, b) = (include("/a"), include("/b"));
    let data = ConfigurationData::new(vec![
        LanguageData::new("c", ["c", "h"]),
        LanguageData::new("cpp", ["cpp", "h"]),
    ]);
    let map = discovered(&[
        ("a.h", &a),
        ("b.h", &a),
        ("x.c", &a),
        ("w.h", &b),
        ("y.cpp", &b),
        ("z.cpp", &b),
    ]);

    let records = SettingsMerger::new(&InheritingDataFactory).merge_discovered_info(&data, &map);

    assert_eq!(
        summary(&records),
        vec![row("", "c", &a), row("w.h", "c", &b), row("", "cpp", &b)]
    );
}
