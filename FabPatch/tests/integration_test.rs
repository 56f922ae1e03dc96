use fabpatch::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

const CLASS_BYTES: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x41, 0x7F, 0xFF];

fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn mod_jar(dir: &Path, file_name: &str, manifest: &Value) -> PathBuf {
    let path = dir.join(file_name);
    let text = serde_json::to_string(manifest).unwrap();
    write_jar(
        &path,
        &[
            ("fabric.mod.json", text.as_bytes()),
            ("com/example/CoolMod.class", CLASS_BYTES),
            ("assets/coolmod/lang/en_us.json", br#"{"item.coolmod.gem":"Gem"}"#),
        ],
    );
    path
}

fn read_entry(archive: &Path, name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    data
}

fn read_manifest(archive: &Path) -> Value {
    serde_json::from_slice(&read_entry(archive, MANIFEST_PATH)).unwrap()
}

struct Workspace {
    _temp: TempDir,
    input: PathBuf,
    output: PathBuf,
}

fn workspace() -> Workspace {
    let temp = tempdir().unwrap();
    let input = temp.path().join("mods");
    let output = temp.path().join("ready");
    fs::create_dir_all(&input).unwrap();
    Workspace {
        _temp: temp,
        input,
        output,
    }
}

#[test]
fn test_cool_mod_example() {
    let ws = workspace();
    let jar = mod_jar(
        &ws.input,
        "CoolMod.jar",
        &json!({"depends": {"minecraft": "1.20.1"}, "name": "Cool Mod"}),
    );

    let log = MemoryLog::new();
    let patcher = ModPatcher::new(&ws.output, &log);
    let outcome = patcher.patch(&jar, "1.21.3");

    let expected_output = ws.output.join("_patched_CoolMod.jar");
    assert_eq!(
        outcome,
        PatchOutcome::Patched {
            source: jar.clone(),
            output: expected_output.clone(),
            warning: None,
        }
    );
    assert_eq!(
        read_manifest(&expected_output),
        json!({"depends": {"minecraft": "1.21.3"}, "name": "[PATCHED] Cool Mod"})
    );
}

#[test]
fn test_other_entries_are_byte_identical() {
    let ws = workspace();
    let jar = mod_jar(
        &ws.input,
        "CoolMod.jar",
        &json!({"schemaVersion": 1, "id": "coolmod", "depends": {"minecraft": "~1.20", "fabricloader": ">=0.15"}, "name": "Cool Mod"}),
    );

    let log = MemoryLog::new();
    let patcher = ModPatcher::new(&ws.output, &log);
    let outcome = patcher.patch(&jar, "1.21.3");
    let output = outcome.output().unwrap().to_path_buf();

    let mut before = list_entries(&jar).unwrap();
    let mut after = list_entries(&output).unwrap();
    before.sort();
    after.sort();
    assert_eq!(before, after);

    for name in ["com/example/CoolMod.class", "assets/coolmod/lang/en_us.json"] {
        assert_eq!(read_entry(&jar, name), read_entry(&output, name), "{name}");
    }

    let manifest = read_manifest(&output);
    assert_eq!(manifest["depends"]["minecraft"], json!("1.21.3"));
    assert_eq!(manifest["depends"]["fabricloader"], json!(">=0.15"));
    assert_eq!(manifest["id"], json!("coolmod"));
    assert_eq!(manifest["schemaVersion"], json!(1));
}

#[test]
fn test_already_compatible_is_copied_verbatim() {
    let ws = workspace();
    let jar = mod_jar(&ws.input, "OtherMod.jar", &json!({"name": "Other Mod"}));

    let log = MemoryLog::new();
    let patcher = ModPatcher::new(&ws.output, &log);
    let outcome = patcher.patch(&jar, "1.21.3");

    let copy = ws.output.join("OtherMod.jar");
    assert_eq!(
        outcome,
        PatchOutcome::AlreadyCompatible {
            source: jar.clone(),
            output: copy.clone(),
        }
    );
    assert_eq!(fs::read(&jar).unwrap(), fs::read(&copy).unwrap());
    assert!(!ws.output.join("_patched_OtherMod.jar").exists());
    assert_eq!(read_manifest(&copy), json!({"name": "Other Mod"}));
}

#[test]
fn test_loose_manifest_shapes_are_already_compatible() {
    let ws = workspace();
    let log = MemoryLog::new();
    let patcher = ModPatcher::new(&ws.output, &log);

    let manifests = [
        ("NumericName.jar", r#"{"name":42}"#),
        ("StringDepends.jar", r#"{"depends":"fabricloader","name":"X"}"#),
        ("ListDepends.jar", r#"{"depends":[],"name":"X"}"#),
    ];

    for (file_name, manifest) in manifests {
        let jar = ws.input.join(file_name);
        write_jar(&jar, &[("fabric.mod.json", manifest.as_bytes())]);

        let outcome = patcher.patch(&jar, "1.21.3");
        let copy = ws.output.join(file_name);
        assert_eq!(
            outcome,
            PatchOutcome::AlreadyCompatible {
                source: jar.clone(),
                output: copy.clone(),
            },
            "{manifest}"
        );
        assert_eq!(fs::read(&jar).unwrap(), fs::read(&copy).unwrap());
        assert!(!ws.output.join(format!("_patched_{file_name}")).exists());
    }
}

#[test]
fn test_non_string_name_with_dependency_is_error() {
    let ws = workspace();
    let jar = ws.input.join("OddName.jar");
    write_jar(
        &jar,
        &[("fabric.mod.json", br#"{"depends":{"minecraft":"1.20.1"},"name":{"en":"Odd"}}"#)],
    );

    let log = MemoryLog::new();
    let outcome = ModPatcher::new(&ws.output, &log).patch(&jar, "1.21.3");

    match &outcome {
        PatchOutcome::Error { kind, .. } => assert_eq!(*kind, ErrorKind::ManifestMalformed),
        other => panic!("expected error, got {other:?}"),
    }
    assert!(!ws.output.join("_patched_OddName.jar").exists());
}

#[test]
fn test_repatch_is_idempotent() {
    let ws = workspace();
    let jar = mod_jar(
        &ws.input,
        "CoolMod.jar",
        &json!({"depends": {"minecraft": "1.20.1"}, "name": "Cool Mod"}),
    );

    let log = MemoryLog::new();
    let first = ModPatcher::new(&ws.output, &log).patch(&jar, "1.21.3");
    let first_output = first.output().unwrap().to_path_buf();

    let second_dir = ws.output.join("again");
    let second = ModPatcher::new(&second_dir, &log).patch(&first_output, "1.21.3");
    let second_output = second.output().unwrap().to_path_buf();

    assert_eq!(second_output, second_dir.join("_patched__patched_CoolMod.jar"));
    let manifest = read_manifest(&second_output);
    assert_eq!(manifest["name"], json!("[PATCHED] Cool Mod"));
    assert_eq!(manifest["depends"]["minecraft"], json!("1.21.3"));
}

#[test]
fn test_missing_name_warns_without_inventing_one() {
    let ws = workspace();
    let jar = mod_jar(
        &ws.input,
        "Nameless.jar",
        &json!({"depends": {"minecraft": "1.20.4"}}),
    );

    let log = MemoryLog::new();
    let outcome = ModPatcher::new(&ws.output, &log).patch(&jar, "1.21.3");

    assert_eq!(outcome.warning(), Some(PatchWarning::NameFieldMissing));
    let manifest = read_manifest(outcome.output().unwrap());
    assert_eq!(manifest, json!({"depends": {"minecraft": "1.21.3"}}));

    let warning = outcome.warning_message().unwrap();
    assert!(log.messages().contains(&warning));
}

#[test]
fn test_invalid_inputs_produce_errors_and_no_output() {
    let ws = workspace();

    let text_file = ws.input.join("notes.txt");
    fs::write(&text_file, "not a mod").unwrap();

    let fake_jar = ws.input.join("fake.jar");
    fs::write(&fake_jar, "definitely not a zip").unwrap();

    let no_manifest = ws.input.join("NoManifest.jar");
    write_jar(&no_manifest, &[("com/example/A.class", CLASS_BYTES)]);

    let malformed = ws.input.join("Malformed.jar");
    write_jar(&malformed, &[("fabric.mod.json", b"{\"name\": \"Broken\",")]);

    let missing = ws.input.join("Missing.jar");

    let cases = [
        (text_file, ErrorKind::InvalidArchive),
        (fake_jar, ErrorKind::InvalidArchive),
        (no_manifest, ErrorKind::ManifestMissing),
        (malformed, ErrorKind::ManifestMalformed),
        (missing, ErrorKind::InvalidArchive),
    ];

    let log = MemoryLog::new();
    let patcher = ModPatcher::new(&ws.output, &log);

    for (path, expected_kind) in &cases {
        let outcome = patcher.patch(path, "1.21.3");
        match &outcome {
            PatchOutcome::Error { kind, .. } => assert_eq!(kind, expected_kind, "{}", path.display()),
            other => panic!("expected error for {}, got {other:?}", path.display()),
        }

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(!ws.output.join(&file_name).exists());
        assert!(!ws.output.join(format!("_patched_{file_name}")).exists());
        assert!(log.messages().contains(&outcome.to_string()));
    }
}

#[test]
fn test_batch_run_with_file_log() {
    let ws = workspace();
    let patched = mod_jar(
        &ws.input,
        "a_cool.jar",
        &json!({"depends": {"minecraft": "1.20.1"}, "name": "Cool Mod"}),
    );
    let compatible = mod_jar(&ws.input, "b_other.jar", &json!({"name": "Other Mod"}));
    let broken = ws.input.join("c_broken.jar");
    fs::write(&broken, "garbage").unwrap();
    fs::write(ws.input.join("readme.txt"), "ignored").unwrap();

    let archives = find_mod_archives(&ws.input, &["jar"]);
    assert_eq!(archives, vec![patched.clone(), compatible.clone(), broken.clone()]);

    fs::create_dir_all(&ws.output).unwrap();
    let config = PatcherConfig {
        output_dir: ws.output.clone(),
        ..PatcherConfig::default()
    };
    let log = FileLog::open(config.log_path()).unwrap();
    let patcher = ModPatcher::from_config(&config, &log);

    let report = batch_patch(&patcher, &archives, "1.21.3", false, |_: &PatchProgress| {});

    assert_eq!(report.patched_count(), 1);
    assert_eq!(report.already_compatible_count(), 1);
    assert_eq!(report.error_count(), 1);
    assert!(report.has_errors());

    let sources: Vec<&Path> = report.outcomes.iter().map(PatchOutcome::source).collect();
    assert_eq!(sources, vec![patched.as_path(), compatible.as_path(), broken.as_path()]);

    let contents = fs::read_to_string(ws.output.join("patchlog.txt")).unwrap();
    let messages: Vec<&str> = contents
        .lines()
        .map(|line| line.split_once(" - ").unwrap().1)
        .collect();
    assert_eq!(messages.first().copied(), Some(format!("Starting patch for {}...", patched.display()).as_str()));
    assert_eq!(messages.last().copied(), Some("Patching completed."));
    assert!(messages.iter().any(|m| m.starts_with(&format!("Error patching {}", broken.display()))));
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let ws = workspace();
    let archives: Vec<PathBuf> = (0..8)
        .map(|i| {
            let manifest = if i % 2 == 0 {
                json!({"depends": {"minecraft": "1.20.1"}, "name": format!("Mod {i}")})
            } else {
                json!({"name": format!("Mod {i}")})
            };
            mod_jar(&ws.input, &format!("mod{i}.jar"), &manifest)
        })
        .collect();

    let log = MemoryLog::new();
    let sequential = batch_patch(
        &ModPatcher::new(ws.output.join("seq"), &log),
        &archives,
        "1.21.3",
        false,
        |_: &PatchProgress| {},
    );
    let parallel = batch_patch(
        &ModPatcher::new(ws.output.join("par"), &log),
        &archives,
        "1.21.3",
        true,
        |_: &PatchProgress| {},
    );

    let kinds = |report: &BatchReport| -> Vec<(PathBuf, bool)> {
        report
            .outcomes
            .iter()
            .map(|o| (o.source().to_path_buf(), matches!(o, PatchOutcome::Patched { .. })))
            .collect()
    };
    assert_eq!(kinds(&sequential), kinds(&parallel));
    assert_eq!(parallel.patched_count(), 4);
    assert_eq!(parallel.already_compatible_count(), 4);

    for outcome in parallel.patched() {
        let manifest = read_manifest(outcome.output().unwrap());
        assert_eq!(manifest["depends"]["minecraft"], json!("1.21.3"));
    }
}

#[test]
fn test_extract_and_repack_tree() {
    let temp = tempdir().unwrap();
    let jar = temp.path().join("tree.jar");
    write_jar(
        &jar,
        &[("fabric.mod.json", b"{}"), ("data/a.txt", b"alpha"), ("data/b/c.txt", b"gamma")],
    );

    let tree = extract(&jar).unwrap();
    assert_eq!(tree.entry_count(), 3);
    assert_eq!(fs::read(tree.join("data/b/c.txt")).unwrap(), b"gamma");

    let out = temp.path().join("out.jar");
    let written = repack(&tree, &out).unwrap();
    assert_eq!(written, 3);
    assert_eq!(read_entry(&out, "data/a.txt"), b"alpha");
}
