//! Documentation settings checked into a repository.
//!
//! A repository opts into documentation editing with a `documentation.yaml` (or
//! `documentation.yml`) file at its root:
//!
//! ```yaml
//! basePath: docs
//! landingPage: index.md
//! ```

use std::path::{Path, PathBuf};

use docviewer_engine::DocumentationDto;
use serde::Deserialize;
use thiserror::Error;

const SETTINGS_FILES: [&str; 2] = ["documentation.yaml", "documentation.yml"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {name}: {source}")]
    Yaml {
        name: String,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentationSettings {
    pub base_path: String,
    pub landing_page: String,
}

impl DocumentationSettings {
    pub fn from_yaml(name: &str, content: &str) -> Result<Self, SettingsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Option<Self> =
            serde_yaml::from_str(content).map_err(|source| SettingsError::Yaml {
                name: name.to_string(),
                source,
            })?;
        Ok(settings.unwrap_or_default())
    }
}

/// The parts of a repository the settings are resolved from.
pub trait RepositorySource {
    /// Names of the files at the repository root.
    fn root_files(&self) -> Result<Vec<String>, SettingsError>;

    fn read_file(&self, name: &str) -> Result<String, SettingsError>;

    fn default_branch(&self) -> Option<String>;
}

/// A repository checked out on the local disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    fallback_branch: Option<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback_branch: None,
        }
    }

    /// Branch reported when the checkout has no readable `HEAD`.
    pub fn with_fallback_branch(mut self, branch: impl Into<String>) -> Self {
        self.fallback_branch = Some(branch.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn head_branch(&self) -> Option<String> {
        let head = std::fs::read_to_string(self.root.join(".git").join("HEAD")).ok()?;
        head.trim()
            .strip_prefix("ref: refs/heads/")
            .filter(|branch| !branch.is_empty())
            .map(str::to_string)
    }
}

impl RepositorySource for DirectorySource {
    fn root_files(&self) -> Result<Vec<String>, SettingsError> {
        let io_error = |source| SettingsError::Io {
            name: self.root.display().to_string(),
            source,
        };
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            if entry.file_type().map_err(io_error)?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, name: &str) -> Result<String, SettingsError> {
        std::fs::read_to_string(self.root.join(name)).map_err(|source| SettingsError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn default_branch(&self) -> Option<String> {
        self.head_branch().or_else(|| self.fallback_branch.clone())
    }
}

/// Reads the repository's documentation settings.
///
/// Returns `None` when the repository has no usable settings: no settings file or
/// both variants at once, no default branch, or settings that fail validation.
pub fn resolve_documentation(
    source: &impl RepositorySource,
) -> Result<Option<DocumentationDto>, SettingsError> {
    let files = source.root_files()?;
    let present: Vec<&str> = SETTINGS_FILES
        .into_iter()
        .filter(|name| files.iter().any(|file| file == name))
        .collect();
    let name = match present.as_slice() {
        [name] => *name,
        [] => {
            log::trace!("No documentation settings found");
            return Ok(None);
        }
        _ => {
            log::warn!(
                "Found both {} and {}, ignoring documentation settings",
                SETTINGS_FILES[0],
                SETTINGS_FILES[1]
            );
            return Ok(None);
        }
    };

    let Some(branch_name) = source.default_branch() else {
        log::trace!("Repository has no default branch");
        return Ok(None);
    };

    let settings = DocumentationSettings::from_yaml(name, &source.read_file(name)?)?;
    if !is_valid_base_path(&settings.base_path) {
        log::trace!("Invalid base path {:?} in {name}", settings.base_path);
        return Ok(None);
    }
    if !is_valid_landing_page(&settings.landing_page) {
        log::trace!("Invalid landing page {:?} in {name}", settings.landing_page);
        return Ok(None);
    }

    Ok(Some(DocumentationDto::new(
        branch_name,
        settings.base_path,
        settings.landing_page,
    )))
}

fn is_valid_base_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains("//")
        && !path.chars().any(char::is_control)
        && !path.split(['/', '\\']).any(|segment| segment == "..")
}

fn is_valid_landing_page(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
        && name.ends_with(".md")
}
