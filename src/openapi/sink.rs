use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::{project, DocSkeleton};
use crate::config::RouteTreeConfig;
use crate::tree::{is_yaml, RouteNode};

/// Destination for generated documents
///
/// Publishing never fails from the caller's point of view: a sink reports its
/// own failures.
pub trait DocumentationSink {
    fn publish(&self, doc: &DocSkeleton, target: &Path);
}

/// Writes documents to disk: YAML for `.yaml`/`.yml` targets, pretty JSON
/// otherwise. Parent directories are created as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

impl FileSink {
    /// Write `doc` to `target`, reporting failures to the caller
    pub fn write(doc: &DocSkeleton, target: &Path) -> anyhow::Result<()> {
        let rendered = if is_yaml(target) {
            serde_yaml::to_string(doc)?
        } else {
            serde_json::to_string_pretty(doc)?
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(target, rendered)
            .with_context(|| format!("failed to write {}", target.display()))?;
        Ok(())
    }
}

impl DocumentationSink for FileSink {
    fn publish(&self, doc: &DocSkeleton, target: &Path) {
        match Self::write(doc, target) {
            Ok(()) => info!(
                target = %target.display(),
                paths = doc.paths.len(),
                "Finished writing OpenAPI document"
            ),
            Err(err) => error!(
                target = %target.display(),
                error = %format!("{err:#}"),
                "Failed to write OpenAPI document"
            ),
        }
    }
}

/// Emits the document as a single `info` event instead of writing it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DocumentationSink for LogSink {
    fn publish(&self, doc: &DocSkeleton, target: &Path) {
        match serde_json::to_string(doc) {
            Ok(json) => info!(target = %target.display(), document = %json, "OpenAPI document"),
            Err(err) => error!(error = %err, "Failed to render OpenAPI document"),
        }
    }
}

/// Project `nodes` into `doc` and hand the result to `sink`.
///
/// Returns the projected document whether or not publishing succeeded.
pub fn generate(
    doc: &DocSkeleton,
    nodes: &[RouteNode],
    sink: &dyn DocumentationSink,
    target: &Path,
) -> DocSkeleton {
    let document = project(doc, nodes);
    sink.publish(&document, target);
    document
}

/// [`generate`] to a file at the configured default location
pub fn generate_to_default(
    doc: &DocSkeleton,
    nodes: &[RouteNode],
    config: &RouteTreeConfig,
) -> DocSkeleton {
    generate(doc, nodes, &FileSink, &config.openapi_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Capture {
        published: RefCell<Vec<(PathBuf, DocSkeleton)>>,
    }

    impl DocumentationSink for Capture {
        fn publish(&self, doc: &DocSkeleton, target: &Path) {
            self.published
                .borrow_mut()
                .push((target.to_path_buf(), doc.clone()));
        }
    }

    #[test]
    fn test_generate_publishes_projected_document() {
        let sink = Capture::default();
        let doc = DocSkeleton::new("3.0.0", json!({"title": "t", "version": "1"}));
        let out = generate(&doc, &[RouteNode::new("/a")], &sink, Path::new("out.json"));
        let published = sink.published.borrow();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, PathBuf::from("out.json"));
        assert_eq!(published[0].1, out);
        assert!(out.paths.contains_key("/a"));
    }

    #[test]
    fn test_file_sink_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be overwritten by a file
        let doc = DocSkeleton::new("3.0.0", json!({}));
        FileSink.publish(&doc, dir.path());
        assert!(dir.path().is_dir());
    }
}
