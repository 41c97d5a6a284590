use std::fs;
use std::io;
use std::path::Path;

/// Trait for the physical move of a file or directory into the library.
pub trait Mover {
    /// Move source to destination.
    ///
    /// # Errors
    /// Returns `io::Error` if the operation fails.
    fn move_file(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Logs operations without touching the filesystem.
pub struct DryRunMover;

/// Renames in place, falling back to copy+remove for plain files when the
/// destination is on another filesystem.
pub struct NativeMover;

impl Mover for NativeMover {
    fn move_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Source does not exist: {}", source.display()),
            ));
        }

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(rename_err) if source.is_file() => {
                tracing::debug!(
                    "rename failed ({rename_err}), copying {} -> {}",
                    source.display(),
                    destination.display()
                );
                fs::copy(source, destination)?;
                fs::remove_file(source)?;
                Ok(())
            }
            Err(rename_err) => Err(rename_err),
        }
    }
}

impl Mover for DryRunMover {
    fn move_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
        tracing::info!(
            "[DRY-RUN] Would move: {} -> {}",
            source.display(),
            destination.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_mover_success() {
        let mover = DryRunMover;
        let source = PathBuf::from("/source/file.mkv");
        let dest = PathBuf::from("/dest/file.mkv");

        assert!(mover.move_file(&source, &dest).is_ok());
    }

    #[test]
    fn test_mover_trait_object() {
        let mover: &dyn Mover = &DryRunMover;
        assert!(
            mover
                .move_file(Path::new("/a.mkv"), Path::new("/b.mkv"))
                .is_ok()
        );
    }

    #[test]
    fn test_native_mover_moves_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.mkv");
        let dest = temp_dir.path().join("dest/source.mkv");
        fs::write(&source, "content").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();

        let mover = NativeMover;
        mover.move_file(&source, &dest).unwrap();

        assert!(!source.exists(), "source should be gone");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "content");
    }

    #[test]
    fn test_native_mover_renames_directory() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("group");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("sub/file.mkv"), "x").unwrap();
        let dest = temp_dir.path().join("_UNKNOWN_group");

        let mover = NativeMover;
        mover.move_file(&source, &dest).unwrap();

        assert!(!source.exists());
        assert!(dest.join("sub/file.mkv").exists());
    }

    #[test]
    fn test_native_mover_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.mkv");
        let dest = temp_dir.path().join("dest.mkv");

        let mover = NativeMover;
        let err = mover.move_file(&source, &dest).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
