use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn manifest_table_is_extracted() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(
        &manifest,
        r#"
[tool.black]
line-length = 100

[tool.turbomypy]
cache_dir = "/tmp/caches/{branch_name}"
pre_commands = ["make stubs", "make protos"]
sqlite_cache = false
"#,
    )
    .unwrap();

    let config = TurboConfig::from_manifest(&manifest).unwrap();
    assert_eq!(config.cache_dir.as_deref(), Some("/tmp/caches/{branch_name}"));
    assert_eq!(config.pre_commands(), vec!["make stubs", "make protos"]);
    assert!(!config.sqlite_cache);
    // Unset speed flags keep their defaults
    assert!(config.fine_grained_cache);
    assert!(config.fast_module_lookup);
}

#[test]
fn manifest_without_table_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(&manifest, "[tool.black]\nline-length = 100\n").unwrap();

    let config = TurboConfig::from_manifest(&manifest).unwrap();
    assert!(config.cache_dir.is_none());
    assert!(config.pre_commands().is_empty());
    assert!(config.sqlite_cache);
}

#[test]
fn malformed_manifest_is_an_error() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(&manifest, "[tool.turbomypy\ncache_dir = ").unwrap();

    assert!(TurboConfig::from_manifest(&manifest).is_err());
}

#[test]
fn single_pre_command_spelling() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(
        &manifest,
        "[tool.turbomypy]\npre_command = \"make stubs\"\n",
    )
    .unwrap();

    let config = TurboConfig::from_manifest(&manifest).unwrap();
    assert_eq!(config.pre_commands(), vec!["make stubs"]);
}

#[test]
fn pre_commands_list_wins_over_single_spelling() {
    let config = TurboConfig {
        pre_command: Some("echo single".into()),
        pre_commands: Some(vec!["echo first".into(), "echo second".into()]),
        ..Default::default()
    };

    assert_eq!(config.pre_commands(), vec!["echo first", "echo second"]);
}

#[test]
fn default_cache_template_is_used_when_unset() {
    let config = TurboConfig::default();
    assert_eq!(config.cache_dir_template(), DEFAULT_CACHE_DIR);
}

#[test]
fn pyproject_walk_stops_at_repo_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    let nested = root.join("pkg").join("sub");
    fs::create_dir_all(&nested).unwrap();

    // Manifest above the repo root must not be picked up
    fs::write(dir.path().join("pyproject.toml"), "").unwrap();
    assert_eq!(find_pyproject(&nested, &root), None);

    // Manifest at the repo root is the last candidate
    fs::write(root.join("pyproject.toml"), "").unwrap();
    assert_eq!(
        find_pyproject(&nested, &root),
        Some(root.join("pyproject.toml"))
    );

    // A nearer manifest shadows the root one
    fs::write(nested.join("pyproject.toml"), "").unwrap();
    assert_eq!(
        find_pyproject(&nested, &root),
        Some(nested.join("pyproject.toml"))
    );
}

#[test]
fn mypy_ini_walk_matches_pyproject_walk() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    let nested = root.join("pkg");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_mypy_ini(&nested, &root), None);

    fs::write(root.join("mypy.ini"), "[mypy]\n").unwrap();
    assert_eq!(find_mypy_ini(&nested, &root), Some(root.join("mypy.ini")));
}
