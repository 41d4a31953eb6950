use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use derive_more::derive::{Display, Error};
use tempfile::NamedTempFile;

pub const DEFAULT_FILE_NAME: &str = "dilauncher_automations.json";

#[derive(Debug, Display, Error)]
pub enum ArtifactWriteError {
    #[display("Error serializing automations")]
    Serialize(serde_json::Error),

    #[display("Error writing automations to {}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[display("Automation writer task failed")]
    Join(tokio::task::JoinError),
}

//Relative overrides are placed below the output directory
pub fn resolve_path(output_dir: &Path, path_override: Option<&Path>) -> PathBuf {
    match path_override {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => output_dir.join(path),
        None => output_dir.join(DEFAULT_FILE_NAME),
    }
}

//Content lands in a temp file next to the target and is renamed into place,
//so readers see either the old file or the complete new one
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<(), ArtifactWriteError> {
    let io_error = |source: std::io::Error| ArtifactWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(content).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_and_override_paths() {
        let dir = Path::new("/var/lib/car-bridge");

        assert_eq!(resolve_path(dir, None), dir.join("dilauncher_automations.json"));
        assert_eq!(resolve_path(dir, Some(Path::new("custom.json"))), dir.join("custom.json"));
        assert_eq!(
            resolve_path(dir, Some(Path::new("/tmp/other.json"))),
            PathBuf::from("/tmp/other.json")
        );
    }

    #[test]
    fn writes_and_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_atomically(&path, b"[1]").unwrap();
        write_atomically(&path, b"[1,2]").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,2]");
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn failing_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("out.json");

        let result = write_atomically(&path, b"[]");

        assert!(matches!(result, Err(ArtifactWriteError::Io { .. })));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
