use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;

const SESSION_LOG: &str = "count.txt";
const TOTAL_FILE: &str = "total.txt";

/// On-disk storage for count snapshots.
///
/// Two files in the data directory: an append-only session log where every
/// save adds one `"<timestamp>, <count>"` line, and a total file holding the
/// lifetime count as a single decimal integer.
pub struct CountStore {
    session_path: PathBuf,
    total_path: PathBuf,
}

impl CountStore {
    pub fn new(config: &Config) -> Result<Self> {
        let data_dir = match config.data_dir() {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        Self::at(&data_dir)
    }

    pub fn at(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("failed to create data directory {}", data_dir.display())
        })?;

        Ok(Self {
            session_path: data_dir.join(SESSION_LOG),
            total_path: data_dir.join(TOTAL_FILE),
        })
    }

    /// Append one `"<timestamp>, <count>"` line to the session log.
    ///
    /// The file is opened and closed on every call; no handle is kept
    /// between saves.
    pub fn append_session(&self, timestamp: DateTime<Local>, count: u64) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.session_path)
            .with_context(|| {
                format!("failed to open session log {}", self.session_path.display())
            })?;

        writeln!(
            file,
            "{}, {}",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            count
        )
        .context("failed to write session log entry")?;

        Ok(())
    }

    /// Read the lifetime total, creating the file with `0` if it is missing.
    pub fn load_total(&self) -> Result<u64> {
        if !self.total_path.exists() {
            self.save_total(0)?;
            return Ok(0);
        }

        let contents = fs::read_to_string(&self.total_path)
            .with_context(|| format!("failed to read total file {}", self.total_path.display()))?;

        contents.trim().parse().with_context(|| {
            format!(
                "total file {} does not contain a number",
                self.total_path.display()
            )
        })
    }

    /// Overwrite the total file with a new lifetime count.
    pub fn save_total(&self, total: u64) -> Result<()> {
        fs::write(&self.total_path, total.to_string())
            .with_context(|| format!("failed to write total file {}", self.total_path.display()))
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "keytally", "keytally")
        .context("failed to get project directories")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (CountStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::at(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn save_appends_one_line_per_call() {
        let (store, dir) = store();

        store.append_session(Local::now(), 5).unwrap();
        let contents = fs::read_to_string(dir.path().join(SESSION_LOG)).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains(", 5"));

        store.append_session(Local::now(), 8).unwrap();
        let contents = fs::read_to_string(dir.path().join(SESSION_LOG)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(", 5"));
        assert!(lines[1].ends_with(", 8"));
    }

    #[test]
    fn session_line_carries_the_timestamp() {
        let (store, dir) = store();
        let now = Local::now();

        store.append_session(now, 3).unwrap();

        let contents = fs::read_to_string(dir.path().join(SESSION_LOG)).unwrap();
        assert!(contents.starts_with(&now.format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn missing_total_file_is_created_as_zero() {
        let (store, dir) = store();

        assert_eq!(store.load_total().unwrap(), 0);

        let contents = fs::read_to_string(dir.path().join(TOTAL_FILE)).unwrap();
        assert_eq!(contents.trim(), "0");
    }

    #[test]
    fn existing_total_is_read_back() {
        let (store, dir) = store();

        fs::write(dir.path().join(TOTAL_FILE), "42").unwrap();
        assert_eq!(store.load_total().unwrap(), 42);
    }

    #[test]
    fn save_total_overwrites() {
        let (store, _dir) = store();

        store.save_total(10).unwrap();
        store.save_total(25).unwrap();
        assert_eq!(store.load_total().unwrap(), 25);
    }

    #[test]
    fn garbage_total_is_an_error() {
        let (store, dir) = store();

        fs::write(dir.path().join(TOTAL_FILE), "not a number").unwrap();
        assert!(store.load_total().is_err());
    }
}
