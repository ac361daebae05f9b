use anyhow::Context;
use std::path::Path;

use super::DocSkeleton;
use crate::tree::is_yaml;

/// Load a document skeleton from a `.yaml`/`.yml` or JSON file.
pub fn load_skeleton(file_path: impl AsRef<Path>) -> anyhow::Result<DocSkeleton> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read OpenAPI skeleton {}", file_path.display()))?;
    let doc = if is_yaml(file_path) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(doc)
}
