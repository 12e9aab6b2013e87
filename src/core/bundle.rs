//! The bundle run: classify, load, assemble, write, and optionally rewrite
//! the sources in place.

use anyhow::Result;
use indexmap::IndexSet;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::cli::{AppContext, BundleArgs};
use crate::core::assemble::{AssembleOptions, AssembledDocument, SourceUnit, assemble};
use crate::core::classify::{Classifier, Role};
use crate::core::transpile::transpile_text;
use crate::error::BundleError;
use crate::infra::config::{Config, load_config};
use crate::infra::io::{load_text, write_atomic};

/// Validated bundle request; built before any I/O happens.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub name: String,
    pub output: PathBuf,
    pub files: Vec<PathBuf>,
    pub hack: bool,
    pub undo: bool,
}

impl TryFrom<BundleArgs> for BundleRequest {
    type Error = BundleError;

    fn try_from(args: BundleArgs) -> Result<Self, Self::Error> {
        let name = args
            .name
            .filter(|n| !n.is_empty())
            .ok_or(BundleError::MissingArgument("--name"))?;
        let output = args
            .output
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(BundleError::MissingArgument("--output"))?;

        Ok(Self {
            name,
            output,
            files: args.files,
            hack: args.hack,
            undo: args.undo,
        })
    }
}

/// What a run produced, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub declarations: usize,
    pub definitions: usize,
    pub skipped: usize,
    pub bytes: usize,
    /// Source files rewritten (or that would be, under dry-run) by `--undo`
    pub rewritten: Vec<PathBuf>,
}

/// CLI entry point for the default command.
pub fn run(args: BundleArgs, config_path: Option<&Path>, ctx: &AppContext) -> Result<()> {
    // Argument errors must surface before config or source I/O
    let req = BundleRequest::try_from(args)?;
    let cfg = load_config(config_path)?;

    let report = execute(&req, &cfg, ctx)?;

    if !ctx.quiet {
        print_summary(&req, &report, ctx);
    }
    Ok(())
}

/// Perform a validated request against a loaded configuration.
#[instrument(skip_all, fields(name = %req.name, output = %req.output.display()))]
pub fn execute(req: &BundleRequest, cfg: &Config, ctx: &AppContext) -> Result<BundleReport> {
    let classifier = Classifier::from_config(&cfg.classify)?;

    let kept = classifier.partition(&req.files);
    let skipped = req.files.len() - kept.len();

    let units = kept
        .into_iter()
        .map(|(path, role)| Ok(SourceUnit::new(path, role, load_text(path)?)))
        .collect::<Result<Vec<_>>>()?;

    let doc = assemble(&req.name, &units, AssembleOptions { rewrite: req.hack });
    let text = doc.render();

    if ctx.dry_run {
        info!(bytes = text.len(), "dry run; bundle not written");
    } else {
        write_atomic(&req.output, text.as_bytes())?;
        info!(bytes = text.len(), "bundle written");
    }

    let rewritten = if req.undo {
        rewrite_in_place(&units, ctx)?
    } else {
        Vec::new()
    };

    Ok(report_for(&doc, skipped, text.len(), rewritten))
}

/// Overwrite each distinct bundled source with its transpiled text.
///
/// Every file gets a fresh context. The originals are not backed up.
fn rewrite_in_place(units: &[SourceUnit], ctx: &AppContext) -> Result<Vec<PathBuf>> {
    // One write per path, in first-seen order
    let mut seen: IndexSet<&Path> = IndexSet::with_capacity(units.len());

    for unit in units {
        let path = unit.path.as_path();
        if !seen.insert(path) {
            continue;
        }

        let rewritten = transpile_text(&unit.text);
        let changed = unit
            .text
            .split('\n')
            .zip(rewritten.split('\n'))
            .filter(|(a, b)| a != b)
            .count();

        if ctx.dry_run {
            info!(path = %path.display(), changed, "dry run; source not rewritten");
        } else {
            write_atomic(path, rewritten.as_bytes())?;
            info!(path = %path.display(), changed, "source rewritten in place");
        }
    }

    Ok(seen.into_iter().map(Path::to_path_buf).collect())
}

fn report_for(
    doc: &AssembledDocument,
    skipped: usize,
    bytes: usize,
    rewritten: Vec<PathBuf>,
) -> BundleReport {
    BundleReport {
        declarations: doc.declarations.len(),
        definitions: doc.definitions.len(),
        skipped,
        bytes,
        rewritten,
    }
}

fn print_summary(req: &BundleRequest, report: &BundleReport, ctx: &AppContext) {
    let line = format!(
        "{} {} and {} into {} ({} bytes)",
        if ctx.dry_run { "Would bundle" } else { "Bundled" },
        plural(report.declarations, Role::Interface),
        plural(report.definitions, Role::Implementation),
        req.output.display(),
        report.bytes
    );

    if ctx.no_color {
        println!("{}{line}", if ctx.dry_run { "DRY RUN: " } else { "✓ " });
    } else if ctx.dry_run {
        println!("{}", format!("DRY RUN: {line}").yellow());
    } else {
        println!("{} {line}", "✓".green());
    }

    if report.skipped > 0 {
        println!("  skipped {} file(s) with unrecognized suffixes", report.skipped);
    }
    for path in &report.rewritten {
        let verb = if ctx.dry_run { "would rewrite" } else { "rewrote" };
        println!("  {verb} {}", path.display());
    }
}

fn plural(n: usize, role: Role) -> String {
    format!("{n} {role} unit{}", if n == 1 { "" } else { "s" })
}
