use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Vertex + fragment source for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    label: String,
    vertex: String,
    fragment: String,
}

impl ProgramSource {
    pub fn new(label: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads both stages from disk. The label is `"<vertex file>+<fragment file>"`.
    pub fn from_files(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<Self> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        let vertex = fs::read_to_string(vertex_path)
            .with_context(|| format!("failed to read vertex shader {}", vertex_path.display()))?;
        let fragment = fs::read_to_string(fragment_path)
            .with_context(|| format!("failed to read fragment shader {}", fragment_path.display()))?;

        let label = format!("{}+{}", file_name(vertex_path), file_name(fragment_path));
        log::debug!("loaded shader sources {label}");

        Ok(Self::new(label, vertex, fragment))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
