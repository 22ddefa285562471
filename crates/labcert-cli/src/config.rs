use std::path::{Path, PathBuf};

use labcert_core::models::department::Department;
use labcert_export::columns::VisibleColumns;
use labcert_view::filter::ViewFilters;
use labcert_view::view::Layout;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabcertConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Department the tables open on when none is given.
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(default)]
    pub layout: Layout,
    /// Added in v1, replacing the v0 `hidden_columns` list.
    #[serde(default)]
    pub visible_columns: VisibleColumns,
    /// Filters applied before any given on the command line.
    #[serde(default)]
    pub default_filters: ViewFilters,
}

impl Default for LabcertConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            department: None,
            layout: Layout::default(),
            visible_columns: VisibleColumns::default(),
            default_filters: ViewFilters::default(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("labcert"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or the defaults when there is no file yet.
pub fn load_config(path: &Path) -> eyre::Result<LabcertConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(LabcertConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: LabcertConfig = serde_json::from_value(migrated)?;
    config.visible_columns.validate()?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update labcert."
        ));
    }

    // v0 → v1: the `hidden_columns` list becomes the `visible_columns` mapping
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

        let mut visible = VisibleColumns::default();
        let hidden = obj.remove("hidden_columns").unwrap_or_default();
        for key in hidden.as_array().into_iter().flatten() {
            let Some(key) = key.as_str() else {
                tracing::warn!(%key, "ignoring non-string hidden column");
                continue;
            };
            if visible.set(key, false).is_err() {
                tracing::warn!(key, "ignoring unknown hidden column");
            }
        }

        obj.entry("visible_columns")
            .or_insert(serde_json::to_value(&visible)?);
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (hidden_columns → visible_columns)");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

/// Write the config to `path` atomically, stamped with the current version.
pub fn save_config(config: &LabcertConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
