//! Canonical output layout for scenariogen artifacts.
//!
//! Local layout: `<root>/<kind dir>/<squad slug>/<slug>[_<n>].txt`.
//! The remote repository mirrors everything below `<root>`.

use anyhow::{Context, Result, bail};
use scenariogen_schema::{ArtifactKind, TargetLocation};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// How many times `write_new` re-resolves after losing a race for a name.
const MAX_CREATE_ATTEMPTS: usize = 16;

/// `<root>/<kind dir>/<squad>`
pub fn artifact_dir(root: &Path, kind: ArtifactKind, squad_slug: &str) -> PathBuf {
    root.join(kind.root_dir()).join(squad_slug)
}

/// Repository-relative folder for an artifact, always with forward slashes.
pub fn remote_folder(kind: ArtifactKind, squad_slug: &str) -> String {
    format!("{}/{}", kind.root_dir(), squad_slug)
}

/// Repository-relative path of a resolved file.
pub fn remote_path(kind: ArtifactKind, squad_slug: &str, file_name: &str) -> String {
    format!("{}/{}", remote_folder(kind, squad_slug), file_name)
}

/// Finds a file name in `directory` that does not exist yet.
///
/// Tries `<base>.<ext>`, then `<base>_1.<ext>`, `<base>_2.<ext>`, and so on.
/// Any directory entry counts as taken, dangling symlinks included.
/// The check is not atomic; pair it with [`write_new`].
pub fn resolve(directory: &Path, base_slug: &str, ext: &str) -> String {
    let mut candidate = format!("{base_slug}.{ext}");
    let mut counter: u64 = 1;
    while is_taken(&directory.join(&candidate)) {
        candidate = format!("{base_slug}_{counter}.{ext}");
        counter += 1;
    }
    candidate
}

fn is_taken(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Resolves the full target location for an artifact.
pub fn resolve_location(
    root: &Path,
    kind: ArtifactKind,
    squad_slug: &str,
    base_slug: &str,
) -> TargetLocation {
    let directory = artifact_dir(root, kind, squad_slug);
    let file_name = resolve(&directory, base_slug, kind.extension());
    TargetLocation {
        directory,
        base_name: base_slug.to_string(),
        file_name,
    }
}

/// Creates the target directory and any missing parents.
pub fn ensure_dir(location: &TargetLocation) -> Result<()> {
    std::fs::create_dir_all(&location.directory)
        .with_context(|| format!("create {:?}", location.directory))
}

/// Writes `content` to a file that did not exist before.
///
/// The file is created exclusively. If another writer took the resolved
/// name in the meantime, the next free suffix is resolved and tried.
/// Returns the location actually written.
pub fn write_new(location: &TargetLocation, content: &str) -> Result<TargetLocation> {
    let mut current = location.clone();
    let ext = Path::new(&location.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("txt")
        .to_string();

    for _ in 0..MAX_CREATE_ATTEMPTS {
        let path = current.path();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                fill(file, &path, content.as_bytes())?;
                return Ok(current);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::warn!(
                    path = %path.display(),
                    "file appeared after resolution, picking next name"
                );
                current.file_name = resolve(&current.directory, &current.base_name, &ext);
            }
            Err(e) => return Err(e).with_context(|| format!("create {path:?}")),
        }
    }

    bail!(
        "could not create a unique file for {:?} in {:?} after {MAX_CREATE_ATTEMPTS} attempts",
        location.base_name,
        location.directory
    )
}

/// Writes a freshly created file. On failure the partial file is removed
/// so its name is free again.
fn fill(mut file: impl Write, path: &Path, content: &[u8]) -> Result<()> {
    let written = file.write_all(content).and_then(|()| file.flush());
    if let Err(e) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "could not remove partially written file"
            );
        }
        return Err(e).with_context(|| format!("write {path:?}"));
    }
    Ok(())
}
