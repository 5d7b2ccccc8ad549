//! Full generator runs over the bundled device configs

use brickgen_bindings::csharp::{CSharp, CSharpBindingsGenerator, CSharpExamplesGenerator};
use brickgen_bindings::json::{Json, JsonBindingsGenerator};
use brickgen_bindings::{fs, run, DocGenerator, GeneratorContext, ReleasedFiles, ZipGenerator};
use brickgen_core::{DeviceRegistry, Language};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Copy configs, changelog and readme of one bindings language into a scratch root
fn scratch_root(bindings: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = repo_root();

    for file in fs::list_files(&repo.join("configs")).unwrap() {
        fs::copy_file(
            &repo.join("configs").join(&file),
            &dir.path().join("configs").join(&file),
        )
        .unwrap();
    }
    for name in ["changelog.txt", "readme.txt"] {
        fs::copy_file(
            &repo.join(bindings).join(name),
            &dir.path().join(bindings).join(name),
        )
        .unwrap();
    }
    dir
}

fn context(root: &Path, bindings: &str) -> GeneratorContext {
    GeneratorContext::new(root, bindings, Language::En)
        .with_generated_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
}

fn archive_entries(archive: &Path) -> BTreeSet<String> {
    let zip = zip::ZipArchive::new(std::fs::File::open(archive).unwrap()).unwrap();
    zip.file_names().map(String::from).collect()
}

#[test]
fn test_bundled_configs_are_valid() {
    let registry = DeviceRegistry::load_dir(&repo_root().join("configs")).unwrap();

    assert_eq!(registry.len(), 8);
    assert_eq!(registry.released().count(), 6);
    assert!(registry.by_identifier(214).is_some());
    assert!(registry.by_name("DI8").is_some());

    let first = registry.devices().next().unwrap();
    assert_eq!(first.long_display_name(), "DC Brick");
    assert_eq!(first.packet("Set Acceleration").unwrap().function_id, 4);
    assert_eq!(first.packet("Get External Input Voltage").unwrap().function_id, 10);
    assert_eq!(first.examples[0].cleanups.len(), 4);

    let lrf = registry.by_name("Laser Range Finder").unwrap();
    assert_eq!(lrf.packet("Distance Reached").unwrap().function_id, 22);
    assert_eq!(lrf.packet("Get Configuration").unwrap().function_id, 26);
    let names: Vec<_> = lrf.examples.iter().map(|e| e.name.space()).collect();
    assert_eq!(names, ["Simple", "Callback", "Threshold"]);
}

#[test]
fn test_csharp_pipeline() {
    let root = scratch_root("csharp");
    let ctx = context(root.path(), "csharp");
    let registry = DeviceRegistry::load_dir(&ctx.configs_dir()).unwrap();

    let summary = run(&ctx, &registry, &mut CSharpBindingsGenerator::new()).unwrap();
    assert_eq!(summary.generated, 8);

    let summary = run(&ctx, &registry, &mut CSharpExamplesGenerator::new()).unwrap();
    assert_eq!(summary.generated, 7);

    let summary = run(&ctx, &registry, &mut DocGenerator::new(CSharp)).unwrap();
    assert_eq!(summary.generated, 6);
    assert!(ctx
        .doc_dir()
        .join("PiezoBuzzer_Bricklet_CSharp.rst")
        .is_file());

    for file in fs::list_files(&ctx.bindings_dir()).unwrap() {
        let source = std::fs::read_to_string(ctx.bindings_dir().join(&file)).unwrap();
        assert_eq!(
            source.matches('{').count(),
            source.matches('}').count(),
            "unbalanced braces in {}",
            file.display()
        );
    }

    let mut zip = ZipGenerator::new();
    run(&ctx, &registry, &mut zip).unwrap();
    let archive = zip.archive().unwrap().to_path_buf();
    assert_eq!(
        archive.file_name().unwrap().to_str().unwrap(),
        "tinkerforge_csharp_bindings_2_1_1.zip"
    );

    let released = ReleasedFiles::from_file(&ctx.released_files_path()).unwrap();
    let examples = ReleasedFiles::from_file(&ctx.released_examples_path()).unwrap();
    let mut expected: BTreeSet<String> = released.iter().map(|f| format!("source/{}", f)).collect();
    expected.extend(examples.iter().map(|f| format!("examples/{}", f)));
    expected.extend(["changelog.txt", "readme.txt", "license.txt"].map(String::from));

    let entries = archive_entries(&archive);
    assert_eq!(entries, expected);
    assert!(entries.contains("source/BrickletPiezoBuzzer.cs"));
    assert!(entries.contains("examples/bricklet/piezo_buzzer/ExampleMorseCode.cs"));
    assert!(!entries.iter().any(|e| e.contains("TNG") || e.contains("tng")));

    let checksum = std::fs::read_to_string(archive.with_extension("zip.sha256")).unwrap();
    assert!(checksum.ends_with("  tinkerforge_csharp_bindings_2_1_1.zip\n"));
}

#[test]
fn test_json_pipeline() {
    let root = scratch_root("json");
    let ctx = context(root.path(), "json");
    let registry = DeviceRegistry::load_dir(&ctx.configs_dir()).unwrap();

    run(&ctx, &registry, &mut JsonBindingsGenerator::new()).unwrap();
    run(&ctx, &registry, &mut DocGenerator::new(Json)).unwrap();

    let document =
        std::fs::read_to_string(ctx.bindings_dir().join("bricklet_moisture.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(value["bindings_version"], "1.0.1");
    assert_eq!(value["device"]["identifier"], 232);
    assert_eq!(value["device"]["constant_groups"][0]["name"], "Threshold Option");

    let mut zip = ZipGenerator::new();
    run(&ctx, &registry, &mut zip).unwrap();

    let released = ReleasedFiles::from_file(&ctx.released_files_path()).unwrap();
    assert_eq!(released.len(), 6);

    let mut expected: BTreeSet<String> = released.iter().map(|f| format!("source/{}", f)).collect();
    expected.extend(["changelog.txt", "readme.txt", "license.txt"].map(String::from));
    assert_eq!(archive_entries(zip.archive().unwrap()), expected);
}

#[test]
fn test_zip_requires_bindings_run() {
    let root = scratch_root("json");
    let ctx = context(root.path(), "json");
    let registry = DeviceRegistry::load_dir(&ctx.configs_dir()).unwrap();

    assert!(run(&ctx, &registry, &mut ZipGenerator::new()).is_err());
}
