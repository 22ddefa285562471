use labcert_cli::config::{load_config, migrate, save_config, LabcertConfig, CURRENT_VERSION};
use labcert_core::models::department::Department;
use labcert_view::view::Layout;
use serde_json::json;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, LabcertConfig::default());
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = LabcertConfig {
        department: Some(Department::Microbiology),
        layout: Layout::PerPool,
        ..LabcertConfig::default()
    };
    config.visible_columns.set("flock", false).unwrap();
    config.default_filters.companies = vec!["Acme".to_string()];

    save_config(&config, &path).unwrap();
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(load_config(&path).unwrap(), config);
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config(&LabcertConfig::default(), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn v0_hidden_columns_become_visible_columns() {
    let v0 = json!({
        "layout": "per_pool",
        "hidden_columns": ["flock", "certificate", "not_a_column"]
    });
    let migrated = migrate(v0, 0).unwrap();

    assert_eq!(migrated["config_version"], 1);
    assert!(migrated.get("hidden_columns").is_none());
    assert_eq!(migrated["visible_columns"]["flock"], false);
    assert_eq!(migrated["visible_columns"]["certificate"], false);
    assert_eq!(migrated["visible_columns"]["status"], true);
    assert!(migrated["visible_columns"].get("not_a_column").is_none());

    let config: LabcertConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(config.layout, Layout::PerPool);
    assert!(!config.visible_columns.is_visible("flock"));
    assert!(config.visible_columns.is_visible("age"));
}

#[test]
fn v0_file_is_migrated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "department": "SER", "hidden_columns": ["pool"] }"#).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.department, Some(Department::Serology));
    assert!(!config.visible_columns.is_visible("pool"));
}

#[test]
fn newer_config_version_is_rejected() {
    let err = migrate(json!({ "config_version": 7 }), 7).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn unknown_visible_column_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "config_version": 1, "visible_columns": { "favourite_colour": true } }"#,
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("favourite_colour"));
}
