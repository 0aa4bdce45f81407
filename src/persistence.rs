//! Snapshot persistence for a sealed [`PointIndex`].
//!
//! A snapshot is a magic header, a version byte, then the bincode encoding of
//! the index. Writes go to a sibling `.tmp` file that atomically replaces the
//! previous snapshot. Loaded indexes are re-validated before use.

use crate::error::{BkdError, Result};
use crate::tree::PointIndex;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_MAGIC: &[u8] = b"SPATIO_BKD";
const SNAPSHOT_VERSION: u8 = 1;

/// A snapshot location on disk.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    path: PathBuf,
}

impl IndexSnapshot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<PointIndex> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader
            .read_exact(&mut magic)
            .map_err(|_| BkdError::InvalidFormat)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(BkdError::InvalidFormat);
        }

        let mut version = [0u8; 1];
        reader
            .read_exact(&mut version)
            .map_err(|_| BkdError::InvalidFormat)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(BkdError::InvalidFormat);
        }

        let index: PointIndex = bincode::deserialize_from(&mut reader)?;
        index.validate()?;

        log::info!(
            "Loaded snapshot {} ({} points, {} nodes)",
            self.path.display(),
            index.len(),
            index.nodes().len()
        );
        Ok(index)
    }

    pub fn save(&self, index: &PointIndex) -> Result<()> {
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;
        bincode::serialize_into(&mut writer, index)?;

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        log::debug!(
            "Wrote snapshot {} ({} points)",
            self.path.display(),
            index.len()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
        Ok(())
    }
}

pub fn save<P: AsRef<Path>>(index: &PointIndex, path: P) -> Result<()> {
    IndexSnapshot::new(path).save(index)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<PointIndex> {
    IndexSnapshot::new(path).load()
}
