//! Settings loading and merging.
//!
//! Settings are loaded in the following order (later sources override earlier ones):
//! 1. **Defaults** - table output, working directory as project root
//! 2. **User settings** - `~/.modelctl/config.toml`
//! 3. **Project settings** - `./.modelctl/config.toml`
//! 4. **CLI arguments** - applied by the command handlers

use crate::errors::SettingsError;
use crate::settings::types::{CliSettings, OutputFormat, OutputSettings, ProjectSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SETTINGS_DIR: &str = ".modelctl";
const SETTINGS_FILE: &str = "config.toml";

/// Load settings from the user and project files.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read or parsed, or if the
/// merged settings are invalid. Missing files are not errors.
pub fn load_hierarchy() -> Result<CliSettings, SettingsError> {
    let home = dirs::home_dir().ok_or_else(|| SettingsError::MissingDirectory {
        what: "home directory".to_string(),
    })?;
    let cwd = std::env::current_dir()?;
    load_hierarchy_from(&home, &cwd)
}

/// [`load_hierarchy`] with explicit home and working directories.
pub fn load_hierarchy_from(home: &Path, cwd: &Path) -> Result<CliSettings, SettingsError> {
    let mut settings = CliSettings::default();

    for path in [settings_path(home), settings_path(cwd)] {
        if let Some(file_settings) = load_settings_file(&path)? {
            debug!(event = "core.settings.file_loaded", path = %path.display());
            settings = merge_settings(settings, file_settings);
        }
    }

    validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings, falling back to defaults when they are unusable.
///
/// The error is returned alongside so the caller can tell the user.
pub fn load_or_default() -> (CliSettings, Option<SettingsError>) {
    match load_hierarchy() {
        Ok(settings) => (settings, None),
        Err(e) => {
            warn!(
                event = "core.settings.load_failed",
                error = %e,
                "Settings load failed, using defaults"
            );
            (CliSettings::default(), Some(e))
        }
    }
}

fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Read one settings file. `Ok(None)` when it does not exist.
pub fn load_settings_file(path: &Path) -> Result<Option<CliSettings>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Merge two settings, with `override_settings` taking precedence field by field.
pub fn merge_settings(base: CliSettings, override_settings: CliSettings) -> CliSettings {
    CliSettings {
        project: ProjectSettings {
            root: override_settings.project.root.or(base.project.root),
        },
        output: OutputSettings {
            format: override_settings.output.format.or(base.output.format),
        },
    }
}

pub fn validate_settings(settings: &CliSettings) -> Result<(), SettingsError> {
    if let Some(format) = &settings.output.format {
        OutputFormat::parse(format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, content: &str) {
        let settings_dir = dir.join(SETTINGS_DIR);
        fs::create_dir_all(&settings_dir).unwrap();
        fs::write(settings_dir.join(SETTINGS_FILE), content).unwrap();
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let settings = load_hierarchy_from(home.path(), cwd.path()).unwrap();
        assert_eq!(settings, CliSettings::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_settings(
            home.path(),
            "[project]\nroot = \"/srv/models\"\n\n[output]\nformat = \"json\"\n",
        );
        write_settings(cwd.path(), "[output]\nformat = \"yaml\"\n");

        let settings = load_hierarchy_from(home.path(), cwd.path()).unwrap();
        assert_eq!(settings.project.root, Some(PathBuf::from("/srv/models")));
        assert_eq!(settings.output_format(), OutputFormat::Yaml);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_settings(cwd.path(), "[output\nformat = ");

        let err = load_hierarchy_from(home.path(), cwd.path()).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_settings(home.path(), "[output]\nformat = \"xml\"\n");

        let err = load_hierarchy_from(home.path(), cwd.path()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidOutputFormat { .. }));
    }

    #[test]
    fn test_merge_settings_keeps_base_when_unset() {
        let base = CliSettings {
            project: ProjectSettings {
                root: Some(PathBuf::from("a")),
            },
            output: OutputSettings {
                format: Some("json".to_string()),
            },
        };
        let merged = merge_settings(base.clone(), CliSettings::default());
        assert_eq!(merged, base);
    }
}
