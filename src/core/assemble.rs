//! Bundle assembly: guard generation, source markers and section layout.
//!
//! The rendered bundle is a single header. Interface units sit inside an
//! include guard; implementation units sit inside `#ifdef NAME_IMPLEMENTATION`
//! with a second include guard of their own. Each unit is preceded by a
//! `#line` marker so compiler diagnostics point back at the original file.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::classify::Role;
use crate::core::transpile::{TranspileContext, transpile_text_with};

/// One classified, loaded source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit
{
    pub path: PathBuf,
    pub role: Role,
    pub text: String,
}

impl SourceUnit
{
    pub fn new(
        path: impl Into<PathBuf>,
        role: Role,
        text: impl Into<String>,
    ) -> Self
    {
        Self { path: path.into(), role, text: text.into() }
    }

    pub fn interface(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self
    {
        Self::new(path, Role::Interface, text)
    }

    pub fn implementation(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self
    {
        Self::new(path, Role::Implementation, text)
    }
}

/// Preprocessor tokens derived from the bundle name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guards
{
    /// Include guard around the declaration section, `_NAME_HPP_`
    pub outer: String,
    /// Macro requesting the definitions, `NAME_IMPLEMENTATION`
    pub conditional: String,
    /// Include guard inside the conditional block, `_NAME_CPP_`
    pub inner: String,
}

impl Guards
{
    pub fn for_name(name: &str) -> Self
    {
        let upper = name.to_ascii_uppercase();

        if !upper
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            warn!(name, "bundle name is not a valid preprocessor identifier");
        }

        Self {
            outer: format!("_{upper}_HPP_"),
            conditional: format!("{upper}_IMPLEMENTATION"),
            inner: format!("_{upper}_CPP_"),
        }
    }
}

/// A unit's text preceded by its `#line` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedUnit
{
    pub marker: String,
    pub text: String,
}

impl MarkedUnit
{
    fn new(
        path: &Path,
        text: String,
    ) -> Self
    {
        Self { marker: line_marker(path), text }
    }
}

/// `#line 1 "<path>"` with the path escaped as a C string literal.
pub fn line_marker(path: &Path) -> String
{
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len() + 2);

    for c in raw.chars()
    {
        match c
        {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }

    format!("#line 1 \"{escaped}\"")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions
{
    /// Apply the line transpiler to unit text (one context across the bundle)
    pub rewrite: bool,
}

/// The bundle before serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument
{
    pub guards: Guards,
    pub declarations: Vec<MarkedUnit>,
    pub definitions: Vec<MarkedUnit>,
}

/// Build the bundle document from classified units, preserving input order per section.
pub fn assemble(
    name: &str,
    units: &[SourceUnit],
    opts: AssembleOptions,
) -> AssembledDocument
{
    let guards = Guards::for_name(name);

    let interface = units
        .iter()
        .filter(|u| u.role == Role::Interface);
    let implementation = units
        .iter()
        .filter(|u| u.role == Role::Implementation);

    // Rendered order; scaffolding lines never match a rewrite rule, so this is
    // the same as rewriting the rendered bundle in one pass
    let mut ctx = TranspileContext::new();
    let mut mark = |u: &SourceUnit| {
        let text = if opts.rewrite
        {
            transpile_text_with(&mut ctx, &u.text)
        }
        else
        {
            u.text
                .clone()
        };
        MarkedUnit::new(&u.path, text)
    };

    let declarations: Vec<MarkedUnit> = interface
        .map(&mut mark)
        .collect();
    let definitions: Vec<MarkedUnit> = implementation
        .map(&mut mark)
        .collect();

    debug!(
        name,
        declarations = declarations.len(),
        definitions = definitions.len(),
        rewrite = opts.rewrite,
        "assembled bundle"
    );

    AssembledDocument { guards, declarations, definitions }
}

impl AssembledDocument
{
    /// Serialize to the final bundle text.
    pub fn render(&self) -> String
    {
        let g = &self.guards;
        let body: usize = self
            .declarations
            .iter()
            .chain(&self.definitions)
            .map(|u| u.marker.len() + u.text.len() + 2)
            .sum();
        let mut out = String::with_capacity(body + 256);

        out.push_str(&format!("#ifndef {0}\n#define {0}\n\n", g.outer));
        push_units(&mut out, &self.declarations);
        out.push_str(&format!("#endif /* {} */\n\n", g.outer));

        out.push_str(&format!("#ifdef {}\n\n", g.conditional));
        out.push_str(&format!("#ifndef {0}\n#define {0}\n\n", g.inner));
        push_units(&mut out, &self.definitions);
        out.push_str(&format!("#endif /* {} */\n\n", g.inner));
        out.push_str(&format!("#endif /* {} */\n", g.conditional));

        out
    }
}

fn push_units(
    out: &mut String,
    units: &[MarkedUnit],
)
{
    for unit in units
    {
        out.push_str(&unit.marker);
        out.push('\n');
        out.push_str(&unit.text);
        if !unit
            .text
            .is_empty()
            && !unit
                .text
                .ends_with('\n')
        {
            out.push('\n');
        }
    }
}

impl fmt::Display for AssembledDocument
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        f.write_str(&self.render())
    }
}
