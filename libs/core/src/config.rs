//! Process configuration.
//!
//! Built once at startup and passed by reference into the verification
//! handler, dispatcher, and sender; no module-level mutable state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com";

/// Secrets and locations the webhook needs. Field names in the settings file
/// are camelCase (`verifyToken`, `accessToken`, `pageToken`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Shared secret echoed back during the GET verification handshake.
    pub verify_token: String,
    /// Shared secret callers must present on POST callbacks.
    pub access_token: String,
    /// Page token authorizing outbound sends against the Graph API.
    pub page_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl WebhookConfig {
    /// Loads configuration from the JSON settings file named by
    /// `PAGEBOT_SETTINGS` when it exists, falling back to individual env vars.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var("PAGEBOT_SETTINGS") {
            let path = Path::new(&path);
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self {
            verify_token: env::var("VERIFY_TOKEN").unwrap_or_default(),
            access_token: env::var("ACCESS_TOKEN").unwrap_or_default(),
            page_token: env::var("PAGE_TOKEN").unwrap_or_default(),
            api_base: env::var("GRAPH_API_BASE").unwrap_or_else(|_| default_api_base()),
            templates_dir: env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_templates_dir()),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse settings {}", path.display()))
    }
}
