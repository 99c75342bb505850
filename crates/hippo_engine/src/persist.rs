use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::validate_artifact_name;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("directory already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("invalid file name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Create the project directory `{base}/{name}`. An existing directory is
/// an error: a second scaffold would overwrite work in progress.
pub fn create_project_dir(base: &Path, name: &str) -> Result<PathBuf, PersistError> {
    let name = validate_artifact_name(name)?;
    let target = base.join(name);
    match fs::create_dir(&target) {
        Ok(()) => Ok(target),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            Err(PersistError::AlreadyExists(target))
        }
        Err(err) => Err(PersistError::Io(err)),
    }
}

/// Writes artifacts into one explicit directory. Content goes to a temp file
/// first and is renamed over the target, so a failed write leaves nothing
/// behind and re-running a scrape replaces earlier output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let filename = validate_artifact_name(filename)?;
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    /// Create `{dir}/{name}`; an existing directory is reused.
    pub fn create_dir(&self, name: &str) -> Result<PathBuf, PersistError> {
        let name = validate_artifact_name(name)?;
        let target = self.dir.join(name);
        match fs::create_dir(&target) {
            Ok(()) => Ok(target),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => {
                Ok(target)
            }
            Err(err) => Err(PersistError::Io(err)),
        }
    }

    /// Writer for the subdirectory `name`. Nothing is created on disk.
    pub fn subdir(&self, name: &str) -> Result<ArtifactWriter, PersistError> {
        let name = validate_artifact_name(name)?;
        Ok(ArtifactWriter::new(self.dir.join(name)))
    }
}
