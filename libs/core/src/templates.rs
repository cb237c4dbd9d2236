//! Named message-template storage.

use crate::error::WebhookError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves named templates from a fixed directory. Templates are static JSON
/// documents in outbound-message shape with `"{{name}}"` placeholder fields.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the named template, appending `.json` when the name has no
    /// suffix. Load or parse failures surface as the generic template-render
    /// failure; the underlying cause stays in the local logs.
    pub fn load(&self, name: &str) -> Result<Value, WebhookError> {
        let file = if name.ends_with(".json") {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}.json"))
        };
        let raw = fs::read_to_string(&file).map_err(|err| {
            tracing::error!(template = %name, path = %file.display(), error = %err, "failed to read template");
            WebhookError::internal("failed to render template")
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            tracing::error!(template = %name, path = %file.display(), error = %err, "failed to parse template");
            WebhookError::internal("failed to render template")
        })
    }
}
