//! Relative/absolute path pairs

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// A directory or file inside a project, known both relative to its root and
/// as an absolute path.
///
/// Only constructible from a root, so `abs` always resolves `rel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectPath {
    rel: PathBuf,
    abs: PathBuf,
}

impl ProjectPath {
    /// Resolve `rel` against `root`
    pub fn new(root: &Path, rel: impl Into<PathBuf>) -> Self {
        let rel = rel.into();
        let abs = resolve_path(root, &rel);
        Self { rel, abs }
    }

    /// Path relative to the owning root
    pub fn rel(&self) -> &Path {
        &self.rel
    }

    /// Absolute path
    pub fn abs(&self) -> &Path {
        &self.abs
    }

    /// A path below this one, still expressed relative to the original root
    pub fn child(&self, rel: impl AsRef<Path>) -> Self {
        Self {
            rel: self.rel.join(rel.as_ref()),
            abs: normalize(&self.abs.join(rel.as_ref())),
        }
    }

    /// Whether `abs` is the resolution of `rel` against `root`
    pub fn is_consistent_with(&self, root: &Path) -> bool {
        resolve_path(root, &self.rel) == self.abs
    }
}

/// Lexically resolve `rel` against `root`.
///
/// An absolute `rel` is kept as is. `.` components are dropped and `..`
/// components pop the preceding segment; the filesystem is never consulted.
pub fn resolve_path(root: &Path, rel: &Path) -> PathBuf {
    if rel.is_absolute() {
        normalize(rel)
    } else {
        normalize(&root.join(rel))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
