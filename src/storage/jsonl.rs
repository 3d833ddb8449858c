//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::StorageError;

/// Entity types kept in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Fighter,
    Event,
    Bout,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Fighter => "fighters.jsonl",
            EntityType::Event => "events.jsonl",
            EntityType::Bout => "bouts.jsonl",
        }
    }

    /// Collection name used by the list endpoints.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityType::Fighter => "fighters",
            EntityType::Event => "events",
            EntityType::Bout => "bouts",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn write_lines(&self, file: File, entities: &[T]) -> Result<usize, StorageError> {
        let mut writer = BufWriter::new(file);
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;
        Ok(entities.len())
    }

    /// Append entities to the end of the file.
    pub fn append(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let count = self.write_lines(file, entities)?;

        debug!("Appended {} entities to {:?}", count, self.path);
        Ok(count)
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let count = self.write_lines(File::create(&self.path)?, entities)?;

        info!("Wrote {} entities to {:?}", count, self.path);
        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every entity. A missing file reads as empty; the first malformed
    /// line aborts the read.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        self.read_with(|line, e| {
            Err(StorageError::Malformed {
                path: self.path.clone(),
                line,
                source: e,
            })
        })
    }

    /// Read every entity, logging and skipping lines that fail to parse.
    pub fn read_lenient(&self) -> Result<Vec<T>, StorageError> {
        self.read_with(|line, e| {
            warn!("Failed to parse line {} in {:?}: {}", line, self.path, e);
            Ok(())
        })
    }

    fn read_with<F>(&self, mut on_error: F) -> Result<Vec<T>, StorageError>
    where
        F: FnMut(usize, serde_json::Error) -> Result<(), StorageError>,
    {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => on_error(index + 1, e)?,
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Find the first entity matching a predicate.
    pub fn find<F>(&self, predicate: F) -> Result<Option<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read_all()?.into_iter().find(predicate))
    }
}
