//! League files in JSON Lines format.
//!
//! Rows in every league file are referenced by id from other files, so a
//! line that does not parse fails the whole read. Dropping it would let the
//! next id collide with the lost row.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{StorageConfig, StorageError};

/// The league's entity files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Season,
    Game,
    Attendance,
}

impl EntityType {
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Season => "seasons.jsonl",
            EntityType::Game => "games.jsonl",
            EntityType::Attendance => "attendances.jsonl",
        }
    }
}

/// One JSONL file holding rows of `T`.
pub struct JsonlFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonlFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl<T: DeserializeOwned> JsonlFile<T> {
    /// Read every row. A missing file is an empty league; blank lines are
    /// ignored; any other unparseable line is a [`StorageError::Corrupt`].
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut rows = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let row = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            rows.push(row);
        }

        debug!("Read {} rows from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}

impl<T: Serialize> JsonlFile<T> {
    /// Append rows at the end of the file.
    pub fn append(&self, rows: &[T]) -> Result<(), StorageError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        write_rows(&mut writer, rows)?;
        writer.flush()?;

        debug!("Appended {} rows to {:?}", rows.len(), self.path);
        Ok(())
    }

    /// Replace the file contents.
    ///
    /// Rows go to a sibling temp file which is then renamed over the
    /// original, so readers see either the old rows or the new ones.
    pub fn replace(&self, rows: &[T]) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let tmp = self.path.with_extension("jsonl.tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        write_rows(&mut writer, rows)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        info!("Rewrote {:?} with {} rows", self.path, rows.len());
        Ok(())
    }
}

fn write_rows<W: Write, T: Serialize>(writer: &mut W, rows: &[T]) -> Result<(), StorageError> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
