//! **amalgam** - Build-time source amalgamator for single-file C/C++ libraries
//!
//! Concatenates headers and sources into one include-guarded bundle with
//! `#line` markers, optionally rewriting `let`/`var`/`func`/`init`
//! declarations into C++ declaration syntax on the way.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Error taxonomy and exit codes
pub mod error;

/// Core processing pipeline
pub mod core {
    /// Path classification into interface and implementation units
    pub mod classify;
    pub use classify::{Classifier, Role};

    /// Line-oriented declaration rewriter
    pub mod transpile;
    pub use transpile::{TranspileContext, transpile, transpile_text};

    /// Guarded bundle assembly with source markers
    pub mod assemble;
    pub use assemble::{AssembleOptions, AssembledDocument, Guards, SourceUnit, assemble};

    /// End-to-end bundle run (classify, load, assemble, write, rewrite in place)
    pub mod bundle;
    pub use bundle::run as bundle_run;
}

/// Infrastructure - Configuration and file I/O
pub mod infra {
    /// Configuration management with TOML support and env overrides
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// Source loading and atomic writes
    pub mod io;
    pub use io::{load_text, write_atomic};
}

// Strategic re-exports for clean CLI interface
pub use crate::cli::{AppContext, Cli, Commands};
pub use crate::core::{AssembleOptions, AssembledDocument, SourceUnit, assemble, bundle_run, transpile, transpile_text};
pub use crate::error::BundleError;
pub use crate::infra::{Config, load_config};
