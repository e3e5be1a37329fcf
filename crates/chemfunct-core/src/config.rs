//! Layered TOML configuration.
//!
//! Two optional files are read, project over user:
//!
//! - `chemfunct.toml` in the working directory
//! - `<config_dir>/chemfunct/config.toml`
//!
//! A database path given on the command line or in `CHEMFUNCT_DB` beats both.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::model::DEFAULT_ID_PREFIX;

/// Environment variable naming the database file.
pub const DB_ENV_VAR: &str = "CHEMFUNCT_DB";
/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "chemfunct.toml";

/// Contents of one config file. Every key is optional so layers can merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyConfig {
    #[serde(default)]
    pub id_prefix: Option<String>,
}

/// Settings after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub db_path: Option<PathBuf>,
    pub id_prefix: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

/// Read `path` if it exists; a missing file is an empty layer.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigFile>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// # Errors
///
/// See [`load_config_file`].
pub fn load_project_config(project_root: &Path) -> Result<ConfigFile> {
    load_config_file(&project_root.join(PROJECT_CONFIG_FILE))
}

/// # Errors
///
/// See [`load_config_file`].
pub fn load_user_config() -> Result<ConfigFile> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    load_config_file(&config_dir.join("chemfunct/config.toml"))
}

/// Load both files and apply the command-line and environment overrides.
///
/// # Errors
///
/// Returns an error if a config file is unreadable or invalid.
pub fn resolve_config(project_root: &Path, cli_db: Option<&Path>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let env_db = env::var_os(DB_ENV_VAR).map(PathBuf::from);
    merge(project, user, cli_db.map(Path::to_path_buf), env_db)
}

fn merge(
    project: ConfigFile,
    user: ConfigFile,
    cli_db: Option<PathBuf>,
    env_db: Option<PathBuf>,
) -> Result<EffectiveConfig> {
    let db_path = cli_db
        .or(env_db)
        .or(project.database.path)
        .or(user.database.path);

    let id_prefix = project
        .taxonomy
        .id_prefix
        .or(user.taxonomy.id_prefix)
        .unwrap_or_else(|| DEFAULT_ID_PREFIX.to_string());

    if id_prefix.is_empty() {
        bail!("taxonomy.id_prefix must not be empty");
    }

    Ok(EffectiveConfig { db_path, id_prefix })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(db: Option<&str>, prefix: Option<&str>) -> ConfigFile {
        ConfigFile {
            database: DatabaseConfig {
                path: db.map(PathBuf::from),
            },
            taxonomy: TaxonomyConfig {
                id_prefix: prefix.map(str::to_string),
            },
        }
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(dir.path()).expect("load should succeed");
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn project_config_parses() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"
[database]
path = "data/functional_use.db"

[taxonomy]
id_prefix = "cat:"
"#,
        )
        .expect("write config");

        let cfg = load_project_config(dir.path()).expect("load should succeed");
        assert_eq!(cfg, file(Some("data/functional_use.db"), Some("cat:")));
    }

    #[test]
    fn invalid_config_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[database\npath = 1")
            .expect("write config");

        let err = load_project_config(dir.path()).unwrap_err();
        assert!(format!("{err}").contains(PROJECT_CONFIG_FILE), "{err}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[database]\nfile = \"x.db\"\n",
        )
        .expect("write config");

        assert!(load_project_config(dir.path()).is_err());
    }

    #[test]
    fn cli_beats_env_beats_files() {
        let project = file(Some("project.db"), None);
        let user = file(Some("user.db"), None);

        let cfg = merge(
            project.clone(),
            user.clone(),
            Some(PathBuf::from("cli.db")),
            Some(PathBuf::from("env.db")),
        )
        .expect("merge");
        assert_eq!(cfg.db_path, Some(PathBuf::from("cli.db")));

        let cfg = merge(project.clone(), user.clone(), None, Some(PathBuf::from("env.db")))
            .expect("merge");
        assert_eq!(cfg.db_path, Some(PathBuf::from("env.db")));

        let cfg = merge(project, user, None, None).expect("merge");
        assert_eq!(cfg.db_path, Some(PathBuf::from("project.db")));
    }

    #[test]
    fn project_prefix_overrides_user_prefix() {
        let cfg = merge(file(None, Some("p_")), file(Some("user.db"), Some("u_")), None, None)
            .expect("merge");
        assert_eq!(cfg.id_prefix, "p_");
        assert_eq!(cfg.db_path, Some(PathBuf::from("user.db")));

        let cfg = merge(ConfigFile::default(), ConfigFile::default(), None, None).expect("merge");
        assert_eq!(cfg, EffectiveConfig::default());
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(merge(file(None, Some("")), ConfigFile::default(), None, None).is_err());
    }
}
