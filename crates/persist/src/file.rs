//! Level files: a pretty-printed JSON snapshot sealed with a SHA-256 digest.

use crate::PersistError;
use crate::snapshot::LevelSnapshot;
use levelforge_kernel::Level;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// On-disk layout of a saved level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    /// Hex SHA-256 of the compact JSON encoding of `level`.
    pub sha256: String,
    pub level: LevelSnapshot,
}

impl LevelFile {
    /// Wrap a snapshot with its digest.
    pub fn seal(level: LevelSnapshot) -> Result<Self, PersistError> {
        let sha256 = digest(&level)?;
        Ok(Self { sha256, level })
    }

    /// Check the stored digest against the contents.
    pub fn verify(&self) -> Result<(), PersistError> {
        let actual = digest(&self.level)?;
        if actual != self.sha256 {
            return Err(PersistError::IntegrityMismatch {
                expected: self.sha256.clone(),
                actual,
            });
        }
        Ok(())
    }
}

/// Write `level` to `path` and clear its unsaved flag. Returns the digest.
pub fn save_level(path: impl AsRef<Path>, level: &mut Level) -> Result<String, PersistError> {
    let path = path.as_ref();
    let file = LevelFile::seal(LevelSnapshot::capture(level))?;
    serde_json::to_writer_pretty(std::fs::File::create(path)?, &file)?;
    level.mark_saved();
    tracing::info!(path = %path.display(), entities = file.level.len(), "saved level");
    Ok(file.sha256)
}

/// Read and verify a level file, then rebuild the level.
pub fn load_level(path: impl AsRef<Path>) -> Result<Level, PersistError> {
    let path = path.as_ref();
    let file: LevelFile = serde_json::from_reader(std::fs::File::open(path)?)?;
    file.verify()?;
    let level = file.level.restore()?;
    tracing::info!(path = %path.display(), entities = level.entity_count(), "loaded level");
    Ok(level)
}

fn digest(level: &LevelSnapshot) -> Result<String, PersistError> {
    let bytes = serde_json::to_vec(level)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use levelforge_common::{EntityKind, Transform};

    fn edited_level() -> Level {
        let mut level = Level::new();
        let button = level
            .spawn(EntityKind::Button, Transform::at(Vec3::new(2.0, 0.0, 0.5)))
            .unwrap();
        let platform = level
            .spawn(
                EntityKind::MovingPlatform,
                Transform::at(Vec3::new(-3.0, 1.0, 0.0)),
            )
            .unwrap();
        level.pair(button, platform);
        level.mark_unsaved();
        level
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("level.json");
        let mut level = edited_level();

        let digest = save_level(&path, &mut level).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(!level.is_unsaved());

        let loaded = load_level(&path).unwrap();
        assert_eq!(LevelSnapshot::capture(&loaded), LevelSnapshot::capture(&level));
    }

    #[test]
    fn tampered_file_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("level.json");
        let mut level = edited_level();
        save_level(&path, &mut level).unwrap();

        let mut file: LevelFile =
            serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        file.level.player_start.scale = 3.0;
        serde_json::to_writer_pretty(std::fs::File::create(&path).unwrap(), &file).unwrap();

        match load_level(&path) {
            Err(PersistError::IntegrityMismatch { expected, .. }) => {
                assert_eq!(expected, file.sha256);
            }
            other => panic!("expected IntegrityMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load_level(tmp.path().join("absent.json"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }

    #[test]
    fn seal_is_deterministic() {
        let snapshot = LevelSnapshot::capture(&edited_level());
        let a = LevelFile::seal(snapshot.clone()).unwrap();
        let b = LevelFile::seal(snapshot).unwrap();
        assert_eq!(a.sha256, b.sha256);
        a.verify().unwrap();
    }
}
