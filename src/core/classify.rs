//! Path classification into interface and implementation units.

use std::path::Path;

use tracing::debug;

use crate::error::BundleError;
use crate::infra::config::ClassifyConfig;

/// Which section of the bundle a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role
{
    /// Declarations; emitted in the include-guarded header section
    Interface,
    /// Definitions; emitted in the conditionally compiled section
    Implementation,
}

impl std::fmt::Display for Role
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            Role::Interface => write!(f, "interface"),
            Role::Implementation => write!(f, "implementation"),
        }
    }
}

/// Maps file names to roles using two disjoint suffix sets.
#[derive(Debug, Clone)]
pub struct Classifier
{
    // (suffix, role), longest suffix first
    suffixes: Vec<(String, Role)>,
}

impl Classifier
{
    /// Build a classifier, rejecting empty suffixes and suffixes present in both sets.
    pub fn new(
        declaration: &[String],
        definition: &[String],
    ) -> Result<Self, BundleError>
    {
        let mut suffixes: Vec<(String, Role)> =
            Vec::with_capacity(declaration.len() + definition.len());

        for (set, role) in [(declaration, Role::Interface), (definition, Role::Implementation)]
        {
            for suffix in set
            {
                if suffix.is_empty()
                {
                    return Err(BundleError::EmptySuffix);
                }
                if suffixes
                    .iter()
                    .any(|(s, r)| s == suffix && *r != role)
                {
                    return Err(BundleError::OverlappingSuffix(suffix.clone()));
                }
                suffixes.push((suffix.clone(), role));
            }
        }

        // Stable sort keeps configured order among equal lengths
        suffixes.sort_by(|a, b| {
            b.0.len()
                .cmp(&a.0.len())
        });

        Ok(Self { suffixes })
    }

    pub fn from_config(cfg: &ClassifyConfig) -> Result<Self, BundleError>
    {
        Self::new(&cfg.declaration, &cfg.definition)
    }

    /// Role for `path`, or `None` if no configured suffix matches its file name.
    pub fn classify(
        &self,
        path: &Path,
    ) -> Option<Role>
    {
        let name = path
            .file_name()?
            .to_string_lossy();

        self.suffixes
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix.as_str()))
            .map(|(_, role)| *role)
    }

    /// Classify every path, keeping input order and dropping unknown ones.
    pub fn partition<'p, P>(
        &self,
        paths: &'p [P],
    ) -> Vec<(&'p Path, Role)>
    where
        P: AsRef<Path>,
    {
        paths
            .iter()
            .filter_map(|p| {
                let path = p.as_ref();
                match self.classify(path)
                {
                    Some(role) =>
                    {
                        debug!(path = %path.display(), %role, "classified");
                        Some((path, role))
                    }
                    None =>
                    {
                        debug!(path = %path.display(), "no matching suffix; not bundled");
                        None
                    }
                }
            })
            .collect()
    }
}
