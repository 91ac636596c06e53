//! Physical storage configuration.

use serde::{Deserialize, Serialize};

/// Settings for the on-disk mirror and upload policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; per-user trees live under `<root>/root/<user-id>/`.
    #[serde(default = "default_root_directory")]
    pub root_directory: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Allowed MIME types. `*` allows everything, `image/*` allows a family.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Directory for temporary archives. Falls back to the system temp dir.
    #[serde(default)]
    pub temp_directory: Option<String>,
}

impl StorageConfig {
    /// Create a configuration rooted at the given directory with default limits.
    pub fn with_root(root_directory: impl Into<String>) -> Self {
        Self {
            root_directory: root_directory.into(),
            ..Self::default()
        }
    }

    /// Check a MIME type against the allow list.
    pub fn is_mime_allowed(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|allowed| {
            let allowed = allowed.trim().to_ascii_lowercase();
            if allowed == "*" || allowed == "*/*" {
                return true;
            }
            match allowed.strip_suffix("/*") {
                Some(family) => mime_type
                    .split_once('/')
                    .is_some_and(|(prefix, _)| prefix == family),
                None => allowed == mime_type,
            }
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_directory: default_root_directory(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_mime_types(),
            temp_directory: None,
        }
    }
}

fn default_root_directory() -> String {
    "./storage/files".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec!["*".to_string()]
}
