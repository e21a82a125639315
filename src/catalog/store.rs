use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::catalog::model::ComponentDescriptor;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::schema::validate::validate_component;

/// Conventional file name of a descriptor: `<id>.json`.
pub fn component_file_name(id: &str) -> String {
    format!("{id}.json")
}

/// Schema-validate `descriptor` and serialize it as pretty JSON ready to be written.
pub fn prepare_for_save(descriptor: &ComponentDescriptor) -> QuizSceneResult<String> {
    let value =
        serde_json::to_value(descriptor).map_err(|e| QuizSceneError::serde(e.to_string()))?;
    let report = validate_component(&value);
    if !report.is_valid() {
        return Err(QuizSceneError::validation(format!(
            "component '{}' is invalid: {}",
            descriptor.id,
            report.messages().join("; ")
        )));
    }
    let mut text =
        serde_json::to_string_pretty(&value).map_err(|e| QuizSceneError::serde(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Persistence sink for accepted descriptors.
pub trait ComponentStore: Send + Sync {
    /// Persist `descriptor`.
    fn store(&self, descriptor: &ComponentDescriptor) -> QuizSceneResult<()>;
}

/// Writes each descriptor to `<dir>/<id>.json`.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a descriptor with `id` is written to.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(component_file_name(id))
    }
}

impl ComponentStore for DirectoryStore {
    fn store(&self, descriptor: &ComponentDescriptor) -> QuizSceneResult<()> {
        if descriptor.id.is_empty() || descriptor.id.contains(['/', '\\']) || descriptor.id == ".."
        {
            return Err(QuizSceneError::catalog(format!(
                "component id '{}' is not usable as a file name",
                descriptor.id
            )));
        }
        let text = prepare_for_save(descriptor)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create catalog dir {}", self.dir.display()))?;
        let path = self.path_for(&descriptor.id);
        std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "component saved");
        Ok(())
    }
}

/// Read and validate every `*.json` descriptor in `dir`, sorted by file name.
pub(crate) fn read_component_dir(dir: &Path) -> QuizSceneResult<Vec<ComponentDescriptor>> {
    let mut paths = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read catalog dir {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read catalog dir {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            crate::schema::decode_component_str(&text)
                .map_err(|e| QuizSceneError::catalog(format!("{}: {e}", path.display())))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
