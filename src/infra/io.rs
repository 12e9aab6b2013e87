use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Read a source file as UTF-8 text.
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "loaded");
    Ok(text)
}

/// Replace `path` with `data` through a temp file in the same directory.
///
/// Missing parent directories are created. Existing permissions are kept;
/// a new file gets 0644 on unix.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    #[cfg(unix)]
    let perms = Some(
        fs::metadata(path)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| std::os::unix::fs::PermissionsExt::from_mode(0o644)),
    );
    #[cfg(not(unix))]
    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    // Write the content fully
    tmp.write_all(data)
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;

    if let Some(perms) = perms {
        fs::set_permissions(tmp.path(), perms).context("set temp permissions")?;
    }

    // Atomically replace the destination
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    // fsync parent dir to ensure durability on Unix
    #[cfg(unix)]
    {
        if let Ok(parent) = fs::File::open(dir) {
            let _ = parent.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/out/lisp.hpp");

        write_atomic(&out, b"first").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "first");

        write_atomic(&out, b"second").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "second");

        // No temp files left behind
        let entries = fs::read_dir(out.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let out = dir.path().join("tool.sh");
        fs::write(&out, "old").unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o755)).unwrap();

        write_atomic(&out, b"new").unwrap();
        let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let out = dir.path().join("dist/lisp.hpp");

        write_atomic(&out, b"x").unwrap();
        let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_load_text_missing_file_names_path() {
        let err = load_text("definitely/not/here.hpp").unwrap_err();
        assert!(format!("{err:#}").contains("definitely/not/here.hpp"));
    }
}
