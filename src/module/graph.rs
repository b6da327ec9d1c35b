use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use crate::errors::errors::ErrorImpl;

use super::module::Module;

/// Every module of one compilation, addressed by index.
///
/// Indices are handed out in insertion order and stay valid for the
/// lifetime of the graph.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    paths: HashMap<PathBuf, usize>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        ModuleGraph::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ModuleGraph {
            modules: Vec::with_capacity(capacity),
            paths: HashMap::with_capacity(capacity),
        }
    }

    /// Adds a module and returns its index. A module whose path is already
    /// present is not added twice.
    pub fn add(&mut self, mut module: Module) -> usize {
        let path = normalize(module.get_path());
        if let Some(&idx) = self.paths.get(&path) {
            tracing::warn!(path = %path.display(), "module added twice");
            return idx;
        }

        let idx = self.modules.len();
        module.set_idx(idx);
        self.paths.insert(path, idx);
        self.modules.push(module);
        idx
    }

    pub fn get(&self, idx: usize) -> Option<&Module> {
        self.modules.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Module> {
        self.modules.get_mut(idx)
    }

    pub fn by_path(&self, path: &Path) -> Option<usize> {
        self.paths.get(&normalize(path)).copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Finds the module an import of `path` inside module `importer` refers
    /// to.
    ///
    /// The path is taken relative to the directory of the importing file.
    /// If it does not name a module of the graph as written, it is
    /// canonicalized and looked up again, so symlinks and differently
    /// spelled paths still match.
    pub fn resolve_import(&self, importer: usize, path: &str) -> Result<usize, ErrorImpl> {
        let base = self
            .get(importer)
            .and_then(|module| module.get_path().parent())
            .unwrap_or_else(|| Path::new(""));
        let joined = base.join(path);

        if let Some(idx) = self.by_path(&joined) {
            return Ok(idx);
        }

        let canonical = joined.canonicalize().map_err(|error| ErrorImpl::ImportError {
            path: joined.display().to_string(),
            reason: error.to_string(),
        })?;

        self.by_path(&canonical)
            .ok_or_else(|| ErrorImpl::ModuleNotCompiled {
                path: canonical.display().to_string(),
            })
    }
}

/// Lexically removes `.` and `..` components.
///
/// Does not touch the filesystem, so it also works for modules that only
/// exist in memory.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
