//! Backup service - zip archives of the entry store
//!
//! An archive holds a `metadata.json` record, the configuration file when
//! present, and every file under the three entry directories, stored with
//! paths relative to the data root so the archive is portable.
//!
//! # Key Points
//! - Archives are written to a temp path and renamed, so a crash never
//!   leaves a truncated file under a backup name.
//! - A restore snapshots the current state first (`pre_restore_*`), then
//!   replaces the entry directories with the archive contents.
//! - A version mismatch in metadata is logged, never fatal.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{Error, Result};

const ENTRY_DIRS: [&str; 3] = ["questions", "answers", "thoughts"];
const CONFIG_FILE: &str = "config.yaml";
const BACKUP_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Metadata record stored as `metadata.json` inside every archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub name: String,
    pub timestamp: String,
    pub version: String,
    pub directories: Vec<String>,
}

/// One listed backup.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub name: String,
    pub timestamp: String,
    pub version: String,
    pub size: u64,
    pub path: PathBuf,
}

/// Manages zip backups of the data root.
pub struct BackupService {
    storage_dir: PathBuf,
    backup_dir: PathBuf,
    version: String,
}

impl BackupService {
    /// Create a backup service for the given data root. Ensures the
    /// `backups/` directory exists.
    pub fn new(storage_dir: &Path) -> Result<Self> {
        let backup_dir = storage_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(|e| {
            Error::Backup(format!("failed to create {}: {e}", backup_dir.display()))
        })?;

        Ok(Self {
            storage_dir: storage_dir.to_path_buf(),
            backup_dir,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Path an archive with the given name would live at.
    pub fn backup_path(&self, name: &str) -> PathBuf {
        self.backup_dir.join(format!("{name}.zip"))
    }

    /// Create a backup of the current data.
    ///
    /// Without a name, derives one from the current timestamp. An archive
    /// with the resolved name already existing is an error; the existing
    /// archive is left intact.
    pub fn create_backup(&self, name: Option<&str>) -> Result<PathBuf> {
        let timestamp = Utc::now().format(BACKUP_NAME_FORMAT).to_string();
        let name = match name {
            Some(n) => n.to_string(),
            None => format!("backup_{timestamp}"),
        };
        let backup_file = self.backup_path(&name);

        if backup_file.exists() {
            return Err(Error::Backup(format!("backup already exists: {name}")));
        }

        let metadata = BackupMetadata {
            name: name.clone(),
            timestamp,
            version: self.version.clone(),
            directories: ENTRY_DIRS.iter().map(|d| d.to_string()).collect(),
        };

        let tmp_path = self.backup_dir.join(format!(".{name}.zip.tmp"));
        let result = self.write_archive(&tmp_path, &metadata);
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Backup(format!("failed to create backup: {e}")));
        }

        fs::rename(&tmp_path, &backup_file)
            .map_err(|e| Error::Backup(format!("failed to create backup: {e}")))?;

        tracing::info!(backup = %backup_file.display(), "backup created");
        Ok(backup_file)
    }

    fn write_archive(&self, path: &Path, metadata: &BackupMetadata) -> anyhow::Result<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default();

        zip.start_file("metadata.json", options)?;
        zip.write_all(&serde_json::to_vec_pretty(metadata)?)?;

        let config_file = self.storage_dir.join(CONFIG_FILE);
        if config_file.exists() {
            zip.start_file(CONFIG_FILE, options)?;
            zip.write_all(&fs::read(&config_file)?)?;
        }

        for dir_name in ENTRY_DIRS {
            let dir_path = self.storage_dir.join(dir_name);
            if !dir_path.exists() {
                continue;
            }
            for file_path in collect_files(&dir_path)? {
                let relative = file_path.strip_prefix(&self.storage_dir)?;
                zip.start_file(zip_entry_name(relative), options)?;
                zip.write_all(&fs::read(&file_path)?)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Restore data from a backup archive.
    ///
    /// Validates the archive first, snapshots the current state, then
    /// replaces the entry directories with the archive contents.
    pub fn restore_backup(&self, backup_path: &Path) -> Result<()> {
        if !backup_path.exists() {
            return Err(Error::Backup(format!(
                "backup file not found: {}",
                backup_path.display()
            )));
        }

        let file = File::open(backup_path)
            .map_err(|e| Error::Backup(format!("failed to open backup: {e}")))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| Error::Backup(format!("invalid backup file: {e}")))?;

        let metadata = read_metadata(&mut archive)
            .map_err(|e| Error::Backup(format!("invalid backup file: {e}")))?;

        if metadata.version != self.version {
            tracing::warn!(
                archive_version = %metadata.version,
                current_version = %self.version,
                "restoring backup created by a different version"
            );
        }
        tracing::info!(name = %metadata.name, timestamp = %metadata.timestamp, "restoring backup");

        // Snapshot current state before anything is deleted. The millisecond
        // suffix keeps the reserved name family collision-free.
        let snapshot_name = Utc::now()
            .format("pre_restore_%Y%m%d_%H%M%S_%3f")
            .to_string();
        let snapshot = self.create_backup(Some(&snapshot_name))?;

        for dir_name in ENTRY_DIRS {
            let dir_path = self.storage_dir.join(dir_name);
            if dir_path.exists() {
                fs::remove_dir_all(&dir_path)
                    .map_err(|e| Error::Backup(format!("failed to clear {dir_name}: {e}")))?;
            }
        }

        archive
            .extract(&self.storage_dir)
            .map_err(|e| Error::Backup(format!("failed to restore backup: {e}")))?;

        tracing::info!(
            backup = %backup_path.display(),
            snapshot = %snapshot.display(),
            "backup restored"
        );
        Ok(())
    }

    /// List available backups, most recent first.
    ///
    /// Archives whose metadata cannot be read are skipped with a warning;
    /// this also covers files truncated by a crashed `create_backup`.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| Error::Backup(format!("failed to read backup directory: {e}")))?;

        let mut backups = Vec::new();
        for dir_entry in entries {
            let dir_entry =
                dir_entry.map_err(|e| Error::Backup(format!("failed to list backups: {e}")))?;
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }

            match read_backup_info(&path) {
                Ok(info) => backups.push(info),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping invalid backup file");
                }
            }
        }

        backups.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(backups)
    }
}

fn read_backup_info(path: &Path) -> anyhow::Result<BackupInfo> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut archive = ZipArchive::new(file)?;
    let metadata = read_metadata(&mut archive)?;

    Ok(BackupInfo {
        name: metadata.name,
        timestamp: metadata.timestamp,
        version: metadata.version,
        size,
        path: path.to_path_buf(),
    })
}

fn read_metadata(archive: &mut ZipArchive<File>) -> anyhow::Result<BackupMetadata> {
    let mut entry = archive.by_name("metadata.json")?;
    let mut raw = String::new();
    entry.read_to_string(&mut raw)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Recursively collect regular files under a directory.
fn collect_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if path.is_dir() {
            files.extend(collect_files(&path)?);
        } else {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Zip entry names always use forward slashes.
fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::Storage;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn seeded_store(dir: &Path) -> Storage {
        let storage = Storage::open(dir).unwrap();
        storage
            .store_question(
                "What is a lifetime?",
                "alice",
                Utc::now(),
                Uuid::new_v4(),
                None,
            )
            .unwrap();
        storage
            .store_thought(
                "Borrowing beats copying",
                "alice",
                Utc::now(),
                Uuid::new_v4(),
                None,
                &["rust".to_string()],
            )
            .unwrap();
        storage
    }

    fn entry_file_bytes(dir: &Path) -> Vec<(String, Vec<u8>)> {
        ENTRY_DIRS
            .iter()
            .map(|d| {
                let path = dir.join(d).join(format!("{d}.csv"));
                (d.to_string(), fs::read(&path).unwrap())
            })
            .collect()
    }

    /// Write a zip by hand, bypassing `create_backup`.
    fn write_raw_backup(path: &Path, metadata: Option<&str>) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        if let Some(metadata) = metadata {
            zip.start_file("metadata.json", options).unwrap();
            zip.write_all(metadata.as_bytes()).unwrap();
        }
        zip.start_file("questions/questions.csv", options).unwrap();
        zip.write_all(b"uuid,timestamp,username,content,session_uuid\n")
            .unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_create_backup_default_name() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let service = BackupService::new(dir.path()).unwrap();

        let path = service.create_backup(None).unwrap();
        assert!(path.exists());
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup_"));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let service = BackupService::new(dir.path()).unwrap();

        let first = service.create_backup(Some("weekly")).unwrap();
        let err = service.create_backup(Some("weekly")).unwrap_err();
        assert!(matches!(err, Error::Backup(_)));

        // The first archive is intact and listed.
        assert!(first.exists());
        let listed = service.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "weekly");
    }

    #[test]
    fn test_backup_restore_round_trip() {
        let dir = tempdir().unwrap();
        let storage = seeded_store(dir.path());
        let before = entry_file_bytes(dir.path());

        let service = BackupService::new(dir.path()).unwrap();
        let backup = service.create_backup(Some("snapshot")).unwrap();

        // Mutate the store so restore actually has work to do.
        storage
            .store_question("Extra question", "bob", Utc::now(), Uuid::new_v4(), None)
            .unwrap();
        assert_ne!(before, entry_file_bytes(dir.path()));

        service.restore_backup(&backup).unwrap();
        assert_eq!(before, entry_file_bytes(dir.path()));
    }

    #[test]
    fn test_restore_creates_pre_restore_snapshot() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let service = BackupService::new(dir.path()).unwrap();
        let backup = service.create_backup(Some("snapshot")).unwrap();

        service.restore_backup(&backup).unwrap();

        let listed = service.list_backups().unwrap();
        assert!(listed.iter().any(|b| b.name.starts_with("pre_restore_")));
    }

    #[test]
    fn test_restore_missing_file_fails() {
        let dir = tempdir().unwrap();
        let service = BackupService::new(dir.path()).unwrap();
        let err = service
            .restore_backup(&dir.path().join("nope.zip"))
            .unwrap_err();
        assert!(matches!(err, Error::Backup(_)));
    }

    #[test]
    fn test_restore_corrupt_archive_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let before = entry_file_bytes(dir.path());

        let service = BackupService::new(dir.path()).unwrap();
        let bogus = dir.path().join("backups").join("bogus.zip");
        fs::write(&bogus, b"this is not a zip archive").unwrap();

        let err = service.restore_backup(&bogus).unwrap_err();
        assert!(matches!(err, Error::Backup(_)));
        assert_eq!(before, entry_file_bytes(dir.path()));
    }

    #[test]
    fn test_restore_without_metadata_fails() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let before = entry_file_bytes(dir.path());

        let service = BackupService::new(dir.path()).unwrap();
        let path = dir.path().join("backups").join("no_meta.zip");
        write_raw_backup(&path, None);

        let err = service.restore_backup(&path).unwrap_err();
        assert!(err.to_string().contains("invalid backup file"));
        assert_eq!(before, entry_file_bytes(dir.path()));
    }

    #[test]
    fn test_version_mismatch_does_not_block_restore() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let service = BackupService::new(dir.path()).unwrap();

        let path = dir.path().join("backups").join("old_version.zip");
        write_raw_backup(
            &path,
            Some(
                r#"{"name":"old_version","timestamp":"20200101_000000","version":"0.0.1","directories":["questions","answers","thoughts"]}"#,
            ),
        );

        service.restore_backup(&path).unwrap();
        let questions = fs::read_to_string(
            dir.path().join("questions").join("questions.csv"),
        )
        .unwrap();
        assert_eq!(questions, "uuid,timestamp,username,content,session_uuid\n");
    }

    #[test]
    fn test_list_backups_sorted_by_recency() {
        let dir = tempdir().unwrap();
        let service = BackupService::new(dir.path()).unwrap();

        for (name, ts) in [
            ("t1", "20240101_000001"),
            ("t3", "20240101_000003"),
            ("t2", "20240101_000002"),
        ] {
            let metadata = format!(
                r#"{{"name":"{name}","timestamp":"{ts}","version":"0.2.0","directories":["questions","answers","thoughts"]}}"#
            );
            write_raw_backup(&service.backup_path(name), Some(&metadata));
        }

        let names: Vec<_> = service
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_list_skips_unparsable_archives() {
        let dir = tempdir().unwrap();
        seeded_store(dir.path());
        let service = BackupService::new(dir.path()).unwrap();
        service.create_backup(Some("good")).unwrap();
        fs::write(service.backup_path("junk"), b"truncated").unwrap();

        let listed = service.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "good");
    }

    #[test]
    fn test_empty_store_backup_has_metadata() {
        let dir = tempdir().unwrap();
        Storage::open(dir.path()).unwrap();
        let service = BackupService::new(dir.path()).unwrap();

        let path = service.create_backup(None).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let metadata = read_metadata(&mut archive).unwrap();
        assert_eq!(metadata.directories, vec!["questions", "answers", "thoughts"]);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));

        // Headers only, one CSV per entry kind plus metadata.
        let names: Vec<_> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"metadata.json".to_string()));
        assert!(names.contains(&"questions/questions.csv".to_string()));
        assert!(names.contains(&"answers/answers.csv".to_string()));
        assert!(names.contains(&"thoughts/thoughts.csv".to_string()));
    }
}
