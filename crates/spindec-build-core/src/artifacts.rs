//! Source and build-artifact enumeration
//!
//! Both listings are non-recursive and sorted by file name, so the compiler
//! sees sources in the same order a shell glob would produce.

use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// File suffixes treated as Fortran sources
const SOURCE_SUFFIXES: &[&str] = &["f", "for", "f90", "f95", "f03", "f08"];

/// Kind of build output found in the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The linked program
    CompiledBinary,
    /// Fortran `.mod` interface file
    ModuleFile,
    /// `.o` object file
    ObjectFile,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::CompiledBinary => "binary",
            ArtifactKind::ModuleFile => "module",
            ArtifactKind::ObjectFile => "object",
        };
        f.write_str(label)
    }
}

/// A build output on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Classify `path` by file name; `None` for anything that is not ours
    pub fn classify(path: &Path, binary_name: &str) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let kind = if name == binary_name {
            ArtifactKind::CompiledBinary
        } else {
            match path.extension().and_then(|e| e.to_str()) {
                Some("mod") => ArtifactKind::ModuleFile,
                Some("o") => ArtifactKind::ObjectFile,
                _ => return None,
            }
        };

        Some(Self {
            path: path.to_path_buf(),
            kind,
        })
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// List Fortran sources directly inside `dir`
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut sources: Vec<PathBuf> = files_in(dir)?
        .into_iter()
        .filter(|path| is_fortran_source(path))
        .collect();
    sources.sort();
    Ok(sources)
}

/// List build artifacts directly inside `dir`
///
/// A missing directory yields an empty list.
pub fn list_artifacts(dir: &Path, binary_name: &str) -> Result<Vec<Artifact>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut artifacts: Vec<Artifact> = files_in(dir)?
        .iter()
        .filter_map(|path| Artifact::classify(path, binary_name))
        .collect();
    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(artifacts)
}

fn is_fortran_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SOURCE_SUFFIXES.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Regular files (and symlinks to them) directly inside `dir`
fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}
