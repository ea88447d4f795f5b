use crate::models::DocumentationDto;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid repository directory: {0}")]
    InvalidRepositoryDir(String),
}

/// The landing page relative to the repository root.
pub fn landing_page_path(dto: &DocumentationDto) -> RelativePathBuf {
    RelativePath::new(dto.base_path.trim_start_matches('/'))
        .join(&dto.landing_page)
        .normalize()
}

/// Read a markdown document and return its content
pub fn read_document(relative_path: &RelativePath, repository_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(repository_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write a markdown document, creating missing parent directories
pub fn write_document(
    relative_path: &RelativePath,
    repository_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(repository_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }
    log::debug!("Writing {} bytes to {}", content.len(), absolute_path.display());
    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Markdown files below `base_path`, relative to the repository root and sorted
pub fn scan_documentation(
    repository_root: &Path,
    base_path: &RelativePath,
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_repository_dir(repository_root)?;
    let dir = base_path.to_path(repository_root);
    if !dir.is_dir() {
        return Err(IoError::NotFound(dir));
    }

    let mut files = Vec::new();
    scan_directory_recursive(&dir, &mut files)?;
    let mut documents: Vec<RelativePathBuf> = files
        .iter()
        .filter_map(|file| file.strip_prefix(repository_root).ok())
        .filter_map(|file| RelativePathBuf::from_path(file).ok())
        .collect();
    documents.sort();
    Ok(documents)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }
    Ok(())
}

pub fn validate_repository_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidRepositoryDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}
