//! Line-oriented rewrite of `let`/`var`/`func`/`init` declarations into C++
//! declaration syntax.
//!
//! The transpiler is best-effort: every line produces exactly one output line,
//! and lines no rule recognizes are passed through byte-for-byte. The only
//! state carried between lines is the most recently declared class name,
//! which initializer lines borrow as their constructor name.

pub mod rules;

pub use rules::{LineMatch, Mutability, match_line};

use std::borrow::Cow;

use tracing::{debug, warn};

/// Cross-line state for one transpiler invocation.
///
/// Create a fresh context per independent line sequence (per file, or per
/// whole bundle). Carrying a context over is an explicit caller decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileContext
{
    enclosing_type: Option<String>,
}

impl TranspileContext
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Name of the most recent `class` declaration seen, if any.
    pub fn enclosing_type(&self) -> Option<&str>
    {
        self.enclosing_type
            .as_deref()
    }

    /// Rewrite a single line, updating the enclosing type on `class` lines.
    ///
    /// A trailing `\r` is detached before matching and re-attached after, so
    /// CRLF input keeps its line endings.
    pub fn rewrite_line<'a>(
        &mut self,
        line: &'a str,
    ) -> Cow<'a, str>
    {
        let (body, eol) = match line.strip_suffix('\r')
        {
            Some(body) => (body, "\r"),
            None => (line, ""),
        };

        let Some(found) = match_line(body)
        else
        {
            return Cow::Borrowed(line);
        };

        let rewritten = match found
        {
            LineMatch::Binding { indent, mutability, name, expr } =>
            {
                format!("{indent}{} {name} = {expr};", mutability.qualifier())
            }
            LineMatch::CallInit { indent, name, ty, args } => format!("{indent}{ty} {name}({args});"),
            LineMatch::Field { indent, name, ty } => format!("{indent}{ty} {name};"),
            LineMatch::StaticField { indent, name, ty } => format!("{indent}static {ty} {name};"),
            LineMatch::Function { indent, name, params, ret, semi } =>
            {
                format!("{indent}{ret} {name}({}){semi}", convert_params(params))
            }
            LineMatch::Initializer { indent, params, trailing } =>
            {
                let Some(owner) = self.enclosing_type()
                else
                {
                    warn!(line = body, "initializer outside of any class; left unchanged");
                    return Cow::Borrowed(line);
                };
                format!("{indent}{owner}({}){trailing}", convert_params(params))
            }
            LineMatch::TypeDecl { name } =>
            {
                debug!(class = name, "entering class");
                self.enclosing_type = Some(name.to_string());
                return Cow::Borrowed(line);
            }
        };

        Cow::Owned(rewritten + eol)
    }
}

/// Convert a raw `name: Type, other: Type` parameter list to `Type name, Type other`.
///
/// Untouched unless the text contains a `:`. The split is flat on `", "`, so a
/// parameter whose own type contains `", "` (e.g. `Map<K, V>`) is split too.
pub fn convert_params(raw: &str) -> Cow<'_, str>
{
    if !raw.contains(':')
    {
        return Cow::Borrowed(raw);
    }

    let converted = raw
        .split(", ")
        .map(|frag| match frag.split_once(':')
        {
            Some((name, ty)) => format!("{} {}", ty.trim(), name.trim()),
            None => frag.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    Cow::Owned(converted)
}

/// Rewrite an ordered sequence of lines with a fresh context.
pub fn transpile<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    transpile_with(&mut TranspileContext::new(), lines)
}

/// Rewrite an ordered sequence of lines, threading `ctx` through them.
pub fn transpile_with<I, S>(
    ctx: &mut TranspileContext,
    lines: I,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| {
            ctx.rewrite_line(line.as_ref())
                .into_owned()
        })
        .collect()
}

/// Rewrite a whole text with a fresh context, preserving every `\n`.
pub fn transpile_text(text: &str) -> String
{
    transpile_text_with(&mut TranspileContext::new(), text)
}

/// Rewrite a whole text, threading `ctx` through its lines.
pub fn transpile_text_with(
    ctx: &mut TranspileContext,
    text: &str,
) -> String
{
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for (i, line) in text
        .split('\n')
        .enumerate()
    {
        if i > 0
        {
            out.push('\n');
        }
        out.push_str(&ctx.rewrite_line(line));
    }

    out
}
