//! Error taxonomy for exit-code mapping.
//!
//! Configuration problems are typed so `main` can exit with status 2 before
//! any file is touched; I/O failures travel as `anyhow::Error` with path
//! context and exit with status 1.

/// Configuration errors detected before or while setting up a run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BundleError
{
    /// A required command-line argument was not supplied
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A suffix appears in both the declaration and definition sets
    #[error("suffix {0:?} is configured as both declaration and definition")]
    OverlappingSuffix(String),

    /// An empty string was configured as a suffix
    #[error("empty suffix in classification sets")]
    EmptySuffix,
}

impl BundleError
{
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32
    {
        match self
        {
            BundleError::MissingArgument(_)
            | BundleError::OverlappingSuffix(_)
            | BundleError::EmptySuffix => 2,
        }
    }
}

/// Exit status for any error surfaced from a run.
pub fn exit_code_for(err: &anyhow::Error) -> i32
{
    err.downcast_ref::<BundleError>()
        .map_or(1, BundleError::exit_code)
}
