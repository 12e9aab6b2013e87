//! Shell completion scripts for the `amalgam` binary.
//!
//! Scripts are rendered in memory and saved through [`write_atomic`], the
//! same way bundles are written.

use anyhow::{Result, anyhow};
use clap::CommandFactory;
use clap_complete::{Generator, Shell as CompletionShell, generate};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};
use crate::infra::write_atomic;

const BIN_NAME: &str = "amalgam";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Completion script for `shell`.
pub fn render(shell: Shell) -> Vec<u8> {
    let mut buf = Vec::new();
    generate(CompletionShell::from(shell), &mut Cli::command(), BIN_NAME, &mut buf);
    buf
}

/// File name the shell expects the script under (`_amalgam` for zsh).
pub fn script_name(shell: Shell) -> String {
    CompletionShell::from(shell).file_name(BIN_NAME)
}

pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let script = render(args.shell);

    if args.stdout {
        io::stdout().write_all(&script)?;
        return Ok(());
    }

    let dir = args
        .out_dir
        .ok_or_else(|| anyhow!("--out-dir is required unless --stdout is set"))?;
    let path: PathBuf = dir.join(script_name(args.shell));
    debug!(path = %path.display(), bytes = script.len(), "completion script");

    if ctx.dry_run {
        if !ctx.quiet {
            println!("DRY RUN: Would write {} ({} bytes)", path.display(), script.len());
        }
        return Ok(());
    }

    write_atomic(&path, &script)?;

    if !ctx.quiet {
        if ctx.no_color {
            println!("✓ Wrote {}", path.display());
        } else {
            println!("{} Wrote {}", "✓".green(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(shell: Shell, out_dir: Option<PathBuf>) -> CompletionsArgs {
        CompletionsArgs { shell, out_dir, stdout: false }
    }

    #[test]
    fn script_names_follow_shell_conventions() {
        assert_eq!(script_name(Shell::Zsh), "_amalgam");
        assert_eq!(script_name(Shell::Bash), "amalgam.bash");
        assert_eq!(script_name(Shell::Fish), "amalgam.fish");
    }

    #[test]
    fn rendered_script_offers_bundle_flags() {
        let script = String::from_utf8(render(Shell::Fish)).unwrap();
        assert!(script.contains("hack"));
        assert!(script.contains("undo"));
        assert!(script.contains("completions"));
    }

    #[test]
    fn writes_script_under_conventional_name() {
        let dir = tempdir().unwrap();
        let ctx = AppContext { quiet: true, no_color: true, dry_run: false };

        run(args(Shell::Zsh, Some(dir.path().join("comp"))), &ctx).unwrap();

        let written = std::fs::read(dir.path().join("comp/_amalgam")).unwrap();
        assert_eq!(written, render(Shell::Zsh));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let ctx = AppContext { quiet: true, no_color: true, dry_run: true };

        run(args(Shell::Bash, Some(dir.path().join("comp"))), &ctx).unwrap();
        assert!(!dir.path().join("comp").exists());
    }

    #[test]
    fn missing_destination_is_an_error() {
        let ctx = AppContext { quiet: true, no_color: true, dry_run: false };
        let err = run(args(Shell::Bash, None), &ctx).unwrap_err();
        assert!(err.to_string().contains("--out-dir"));
    }
}
