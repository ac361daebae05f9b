use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

use crate::config::RouteTreeConfig;
use crate::lint::{has_errors, lint_routes, render_lint_issues, LintSeverity};
use crate::openapi::{load_skeleton, project, DocSkeleton, FileSink};
use crate::tree::{build_registry, build_response_registry, load_manifest};

/// Command-line interface for route manifests
#[derive(Parser)]
#[command(name = "routetree")]
#[command(about = "Inspect, document and lint declarative route trees", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the named routes a manifest produces
    Routes {
        /// Path to the route manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Print the registry as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build a URL for a named route
    Reverse {
        #[arg(short, long)]
        manifest: PathBuf,

        /// Fully-qualified route name, e.g. `pets-dogs`
        name: String,

        /// Parameter value as `name=value`; repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print declared response codes per route and method
    Responses {
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Generate an OpenAPI document from a manifest
    Openapi {
        #[arg(short, long)]
        manifest: PathBuf,

        /// Skeleton document (info, servers, tags, extra paths)
        #[arg(short, long)]
        doc: Option<PathBuf>,

        /// Output file; `.yaml`/`.yml` selects YAML (default: ROUTETREE_OPENAPI_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the document as JSON instead of writing a file
        #[arg(long, default_value_t = false, conflicts_with = "output")]
        stdout: bool,
    },
    /// Lint a route manifest
    ///
    /// Checks for:
    /// - nodes without a path
    /// - colliding route names
    /// - malformed placeholders and identifiers
    /// - repeated parameter names
    /// - methods without handlers
    Lint {
        #[arg(short, long)]
        manifest: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn default_skeleton() -> DocSkeleton {
    DocSkeleton::new(
        "3.0.0",
        json!({ "title": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }),
    )
}

/// Execute `cli`, writing command output to `out`
pub fn run_cli(cli: &Cli, config: &RouteTreeConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes { manifest, json } => {
            let registry = build_registry(&load_manifest(manifest)?);
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&registry)?)?;
                return Ok(());
            }
            for def in registry.iter() {
                if def.parameters().is_empty() {
                    writeln!(out, "{}\t{}", def.name(), def.path())?;
                } else {
                    writeln!(
                        out,
                        "{}\t{}\t[{}]",
                        def.name(),
                        def.path(),
                        def.parameters().join(", ")
                    )?;
                }
            }
            Ok(())
        }
        Commands::Reverse {
            manifest,
            name,
            params,
        } => {
            let registry = build_registry(&load_manifest(manifest)?);
            let def = registry
                .get(name)
                .ok_or_else(|| anyhow!("unknown route name '{name}'"))?;
            let url = def.try_reverse(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            writeln!(out, "{url}")?;
            Ok(())
        }
        Commands::Responses { manifest } => {
            let registry = build_response_registry(&load_manifest(manifest)?);
            writeln!(out, "{}", serde_json::to_string_pretty(&registry)?)?;
            Ok(())
        }
        Commands::Openapi {
            manifest,
            doc,
            output,
            stdout,
        } => {
            let nodes = load_manifest(manifest)?;
            let skeleton = match doc {
                Some(path) => load_skeleton(path)?,
                None => default_skeleton(),
            };
            let document = project(&skeleton, &nodes);
            if *stdout {
                writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
                return Ok(());
            }
            let target = output.as_ref().unwrap_or(&config.openapi_output);
            FileSink::write(&document, target)?;
            writeln!(
                out,
                "wrote {} path(s) to {}",
                document.paths.len(),
                target.display()
            )?;
            Ok(())
        }
        Commands::Lint {
            manifest,
            fail_on_error,
            errors_only,
        } => {
            let mut issues = lint_routes(&load_manifest(manifest)?);
            if *errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            write!(out, "{}", render_lint_issues(&issues)).context("failed to write report")?;
            if *fail_on_error && has_errors(&issues) {
                bail!("lint found errors in {}", manifest.display());
            }
            Ok(())
        }
    }
}
