//! # nbstack Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the optional `nbstack.toml` settings and resolves the
//! project directory every wrapped command runs in. Nothing here is required:
//! with no config files present the defaults reproduce the standard NetBox +
//! Nautobot layout (`docker compose`, services `netbox` and `nautobot`,
//! `scripts/backup.sh`, `scripts/restore.sh`, `.env`).
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `nbstack.toml` in the project directory
//! 2. User-specific `config.toml` in the platform config dir (`~/.config/nbstack/` on Linux)
//! 3. Default values defined in the code
//!
//! The project directory is `--project-dir` when given, otherwise the nearest
//! ancestor of the working directory that holds a Compose file, otherwise the
//! working directory itself. The search stops at a `.git` directory.
//!
//! ## Examples
//!
//! ```rust
//! let project_dir = config::resolve_project_dir(args.project_dir.as_deref())?;
//! let cfg = config::load_config(&project_dir)?;
//! let program = &cfg.compose.program;
//! ```
//!
use crate::core::error::{Result, StackError};
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Resolved configuration: every setting has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Env file holding the stack secrets, relative to the project directory.
    pub env_file: String,
    pub compose: ComposeConfig,
    pub services: ServicesConfig,
    pub scripts: ScriptsConfig,
}

/// How the container orchestrator is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Container CLI; `compose` is passed as its first argument.
    pub program: String,
    /// Number of log lines shown before `logs` starts following.
    pub log_tail: u32,
}

/// Compose service names of the two applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub netbox: String,
    pub nautobot: String,
}

/// Backup and restore scripts (can use ~). Relative paths resolve against the
/// project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptsConfig {
    pub backup: String,
    pub restore: String,
}

/// One TOML file as written. A missing key is `None`, so a value that happens
/// to equal the default still counts as set.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    env_file: Option<String>,
    #[serde(default)]
    compose: ComposeLayer,
    #[serde(default)]
    services: ServicesLayer,
    #[serde(default)]
    scripts: ScriptsLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ComposeLayer {
    program: Option<String>,
    log_tail: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ServicesLayer {
    netbox: Option<String>,
    nautobot: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ScriptsLayer {
    backup: Option<String>,
    restore: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        merge_configs(None, None)
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Config::default().compose
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Config::default().services
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Config::default().scripts
    }
}

fn default_env_file() -> String {
    ".env".to_string()
}
fn default_program() -> String {
    "docker".to_string()
}
fn default_log_tail() -> u32 {
    200
}
fn default_netbox_service() -> String {
    "netbox".to_string()
}
fn default_nautobot_service() -> String {
    "nautobot".to_string()
}
fn default_backup_script() -> String {
    "scripts/backup.sh".to_string()
}
fn default_restore_script() -> String {
    "scripts/restore.sh".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = "nbstack.toml";

/// File names that mark a directory as the stack's project root.
const COMPOSE_FILENAMES: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Loads, merges, expands and validates the configuration for `project_dir`.
pub fn load_config(project_dir: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(project_dir)?;
    let mut merged = merge_configs(user_config, project_config);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    let Some(proj_dirs) = ProjectDirs::from("org", "nbstack", "nbstack") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config(project_dir: &Path) -> Result<Option<ConfigFile>> {
    let path = project_dir.join(PROJECT_CONFIG_FILENAME);
    if path.is_file() {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No {} in {}", PROJECT_CONFIG_FILENAME, project_dir.display());
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win over user values, which win over the defaults.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let user = user.unwrap_or_default();
    let project = project.unwrap_or_default();
    Config {
        env_file: project
            .env_file
            .or(user.env_file)
            .unwrap_or_else(default_env_file),
        compose: ComposeConfig {
            program: project
                .compose
                .program
                .or(user.compose.program)
                .unwrap_or_else(default_program),
            log_tail: project
                .compose
                .log_tail
                .or(user.compose.log_tail)
                .unwrap_or_else(default_log_tail),
        },
        services: ServicesConfig {
            netbox: project
                .services
                .netbox
                .or(user.services.netbox)
                .unwrap_or_else(default_netbox_service),
            nautobot: project
                .services
                .nautobot
                .or(user.services.nautobot)
                .unwrap_or_else(default_nautobot_service),
        },
        scripts: ScriptsConfig {
            backup: project
                .scripts
                .backup
                .or(user.scripts.backup)
                .unwrap_or_else(default_backup_script),
            restore: project
                .scripts
                .restore
                .or(user.scripts.restore)
                .unwrap_or_else(default_restore_script),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    config.scripts.backup = shellexpand::tilde(&config.scripts.backup).into_owned();
    config.scripts.restore = shellexpand::tilde(&config.scripts.restore).into_owned();
    config.env_file = shellexpand::tilde(&config.env_file).into_owned();
    debug!(
        "Expanded script paths: backup={}, restore={}",
        config.scripts.backup, config.scripts.restore
    );
}

fn validate_config(config: &Config) -> Result<()> {
    let non_empty = [
        ("env_file", &config.env_file),
        ("compose.program", &config.compose.program),
        ("services.netbox", &config.services.netbox),
        ("services.nautobot", &config.services.nautobot),
        ("scripts.backup", &config.scripts.backup),
        ("scripts.restore", &config.scripts.restore),
    ];
    for (name, value) in non_empty {
        if value.trim().is_empty() {
            return Err(StackError::Config(format!("'{}' cannot be empty.", name)).into());
        }
    }
    for (name, service) in [
        ("services.netbox", &config.services.netbox),
        ("services.nautobot", &config.services.nautobot),
    ] {
        if service.chars().any(char::is_whitespace) {
            return Err(StackError::Config(format!(
                "Invalid service name for '{}': '{}'. Service names cannot contain whitespace.",
                name, service
            ))
            .into());
        }
    }
    if config.compose.log_tail == 0 {
        return Err(StackError::Config("'compose.log_tail' must be at least 1.".into()).into());
    }
    Ok(())
}

/// Resolves `path` against the project directory unless it is already absolute.
pub fn resolve_in(project_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

/// Picks the directory the stack commands run in.
pub fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            return Err(StackError::Config(format!(
                "Project directory '{}' does not exist or is not a directory.",
                dir.display()
            ))
            .into());
        }
        return Ok(dir.to_path_buf());
    }
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_compose_root(&current_dir).unwrap_or(current_dir))
}

fn find_compose_root(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if COMPOSE_FILENAMES.iter().any(|name| dir.join(name).is_file()) {
            debug!("Found compose file in {}", dir.display());
            return Some(dir.to_path_buf());
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping compose file search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn layer(toml_content: &str) -> ConfigFile {
        toml::from_str(toml_content).expect("Failed to parse TOML")
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let file = layer(
            r#"
            env_file = "stack.env"

            [compose]
            program = "podman"

            [services]
            nautobot = "nautobot-web"
        "#,
        );
        assert_eq!(file.compose.log_tail, None);

        let config = merge_configs(None, Some(file));
        assert_eq!(config.env_file, "stack.env");
        assert_eq!(config.compose.program, "podman");
        assert_eq!(config.compose.log_tail, 200); // Default
        assert_eq!(config.services.netbox, "netbox"); // Default
        assert_eq!(config.services.nautobot, "nautobot-web");
        assert_eq!(config.scripts, ScriptsConfig::default());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result: std::result::Result<ConfigFile, _> =
            toml::from_str("[compose]\nbinary = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_project_over_user() {
        let user = layer("[compose]\nprogram = \"podman\"\nlog_tail = 50\n");
        let project = layer(
            r#"
            [compose]
            log_tail = 500

            [services]
            netbox = "netbox-app"
        "#,
        );

        let merged = merge_configs(Some(user), Some(project));
        assert_eq!(merged.compose.program, "podman"); // Not set by the project
        assert_eq!(merged.compose.log_tail, 500);
        assert_eq!(merged.services.netbox, "netbox-app");
        assert_eq!(merged.services.nautobot, "nautobot");
    }

    #[test]
    fn test_project_can_restore_default_value() {
        let user = layer("[compose]\nprogram = \"podman\"\nlog_tail = 50\n");
        let project = layer("[compose]\nprogram = \"docker\"\nlog_tail = 200\n");

        let merged = merge_configs(Some(user), Some(project));
        assert_eq!(merged.compose.program, "docker");
        assert_eq!(merged.compose.log_tail, 200);
    }

    #[test]
    fn test_merge_without_project() {
        let user = layer("env_file = \"user.env\"\n");
        let merged = merge_configs(Some(user), None);
        assert_eq!(merged.env_file, "user.env");
        assert_eq!(merged.compose, ComposeConfig::default());
        assert_eq!(merge_configs(None, None), Config::default());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            scripts: ScriptsConfig {
                backup: "~/bin/backup.sh".into(),
                restore: "/opt/stack/restore.sh".into(),
            },
            ..Default::default()
        };
        expand_config_paths(&mut config);

        let home = directories::BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(
            config.scripts.backup,
            home.join("bin/backup.sh").to_string_lossy()
        );
        assert_eq!(config.scripts.restore, "/opt/stack/restore.sh");
    }

    #[test]
    fn test_validate_config_invalid_values() {
        let empty_program = Config {
            compose: ComposeConfig {
                program: " ".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&empty_program).unwrap_err();
        assert!(err.to_string().contains("'compose.program' cannot be empty"));

        let bad_service = Config {
            services: ServicesConfig {
                netbox: "net box".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&bad_service).is_err());

        let zero_tail = Config {
            compose: ComposeConfig {
                log_tail: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&zero_tail).is_err());

        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_load_project_config_file() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[scripts]\nbackup = \"tools/backup.sh\"\n",
        )
        .unwrap();

        let loaded = load_project_config(temp_dir.path()).unwrap().unwrap();
        assert_eq!(loaded.scripts.backup.as_deref(), Some("tools/backup.sh"));
        assert!(load_project_config(&temp_dir.path().join("missing"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_compose_root_from_subdirectory() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        let nested = temp_dir.path().join("scripts").join("lib");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_compose_root(&nested).as_deref(),
            Some(temp_dir.path())
        );
    }

    #[test]
    fn test_find_compose_root_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("compose.yaml"), "services: {}\n").unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(find_compose_root(&repo), None);
    }

    #[test]
    fn test_resolve_project_dir_explicit() {
        let temp_dir = tempdir().unwrap();
        assert_eq!(
            resolve_project_dir(Some(temp_dir.path())).unwrap(),
            temp_dir.path()
        );
        assert!(resolve_project_dir(Some(&temp_dir.path().join("nope"))).is_err());
    }

    #[test]
    fn test_resolve_in() {
        let project = Path::new("/srv/stack");
        assert_eq!(
            resolve_in(project, "scripts/backup.sh"),
            PathBuf::from("/srv/stack/scripts/backup.sh")
        );
        assert_eq!(
            resolve_in(project, "/usr/local/bin/restore"),
            PathBuf::from("/usr/local/bin/restore")
        );
    }
}
