//! Import saved API list responses into the local snapshot.
//!
//! Each collection is read from `<source>/<collection>/page-<N>.json`, one file
//! per page exactly as the list endpoint returned it. Pages are followed
//! through their `next` links starting at page 1.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Bout, EntityId, Event, Fighter};
use crate::pagination::{collection_url, Page};
use crate::storage::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Errors raised while importing saved pages.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse page {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Page {page} of {collection} is linked but missing at {path}")]
    MissingPage {
        collection: &'static str,
        page: u32,
        path: PathBuf,
    },

    #[error("Page {page} of {collection} links back to page {next}")]
    PageLoop {
        collection: &'static str,
        page: u32,
        next: u32,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An entity stored in the snapshot, keyed by its server-assigned ID.
pub trait Record: Serialize + DeserializeOwned {
    const ENTITY: EntityType;

    fn record_id(&self) -> &EntityId;
}

impl Record for Fighter {
    const ENTITY: EntityType = EntityType::Fighter;

    fn record_id(&self) -> &EntityId {
        &self.fighter_id
    }
}

impl Record for Event {
    const ENTITY: EntityType = EntityType::Event;

    fn record_id(&self) -> &EntityId {
        &self.event_id
    }
}

impl Record for Bout {
    const ENTITY: EntityType = EntityType::Bout;

    fn record_id(&self) -> &EntityId {
        &self.bout_id
    }
}

/// Outcome of importing one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub collection: &'static str,
    pub pages: usize,
    pub records: usize,
    pub added: usize,
    pub updated: usize,
}

/// Saved file for one page of a collection.
pub fn page_file(source: &Path, collection: &str, page: u32) -> PathBuf {
    source.join(collection).join(format!("page-{}.json", page))
}

fn read_page<T: DeserializeOwned>(path: &Path) -> Result<Page<T>, ImportError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every record of a collection plus the number of pages read.
///
/// A collection without a saved first page yields nothing.
pub fn read_collection<T: Record>(source: &Path) -> Result<(Vec<T>, usize), ImportError> {
    let collection = T::ENTITY.collection();
    let mut records = Vec::new();
    let mut pages = 0;
    let mut expected = 0;
    let mut page = 1;

    loop {
        let path = page_file(source, collection, page);
        if !path.exists() {
            if page == 1 {
                debug!("No saved pages for {} under {:?}", collection, source);
                break;
            }
            return Err(ImportError::MissingPage {
                collection,
                page,
                path,
            });
        }

        let body: Page<T> = read_page(&path)?;
        debug!(
            "Read {} with {} records",
            collection_url(Some(page), collection),
            body.results.len()
        );

        if page == 1 && !body.results.is_empty() {
            let per_page = u32::try_from(body.results.len()).unwrap_or(u32::MAX);
            debug!(
                "{} lists {} records over {} pages",
                collection,
                body.count,
                body.page_count(per_page)
            );
        }
        if page > 1 && body.previous_page() != Some(page - 1) {
            warn!(
                "{} page {} does not link back to page {}",
                collection,
                page,
                page - 1
            );
        }

        pages += 1;
        expected = body.count;
        let next = body.next_page();
        records.extend(body.results);

        match next {
            Some(n) if n <= page => {
                return Err(ImportError::PageLoop {
                    collection,
                    page,
                    next: n,
                })
            }
            Some(n) => page = n,
            None => break,
        }
    }

    if pages > 0 && records.len() as u64 != expected {
        warn!(
            "{} reports {} records but {} were saved",
            collection,
            expected,
            records.len()
        );
    }

    Ok((records, pages))
}

/// Merge one collection's saved pages into its JSONL file.
///
/// An imported record replaces the stored record with the same ID in place;
/// new records go at the end. When nothing is replaced the file is only
/// appended to. Stored lines that fail to parse are skipped with a warning
/// and dropped if the file is rewritten.
pub fn import_collection<T: Record>(
    source: &Path,
    storage: &StorageConfig,
) -> Result<ImportSummary, ImportError> {
    let collection = T::ENTITY.collection();
    let (imported, pages) = read_collection::<T>(source)?;
    let records = imported.len();

    let path = storage.path_for(T::ENTITY);
    let mut stored: Vec<T> = JsonlReader::new(path.clone()).read_lenient()?;
    let original_len = stored.len();

    let mut positions: HashMap<EntityId, usize> = stored
        .iter()
        .enumerate()
        .map(|(i, r)| (r.record_id().clone(), i))
        .collect();

    let (mut added, mut updated) = (0, 0);
    for record in imported {
        match positions.get(record.record_id()).copied() {
            Some(i) => {
                if i < original_len {
                    updated += 1;
                }
                stored[i] = record;
            }
            None => {
                positions.insert(record.record_id().clone(), stored.len());
                stored.push(record);
                added += 1;
            }
        }
    }

    let writer = JsonlWriter::new(path);
    if updated == 0 {
        writer.append(&stored[original_len..])?;
    } else {
        writer.write_all(&stored)?;
    }

    info!(
        "Imported {} {} from {} pages ({} new, {} updated)",
        records, collection, pages, added, updated
    );

    Ok(ImportSummary {
        collection,
        pages,
        records,
        added,
        updated,
    })
}

/// Import fighters, events and bouts saved under `source`.
pub fn import_all(
    source: &Path,
    storage: &StorageConfig,
) -> Result<Vec<ImportSummary>, ImportError> {
    if !source.is_dir() {
        return Err(ImportError::SourceNotFound(source.to_path_buf()));
    }

    Ok(vec![
        import_collection::<Fighter>(source, storage)?,
        import_collection::<Event>(source, storage)?,
        import_collection::<Bout>(source, storage)?,
    ])
}
