//! Backing documents: the durable blob a table is saved into.
//!
//! A [`DocumentStore`] knows nothing about records. It reads and writes whole
//! documents identified by a table name, and every call acquires and releases
//! its own handles, so nothing stays open between operations.
//!
//! - [`JsonFileStore`] keeps one `<table>.json` file per table in a directory.
//! - [`MemoryStore`] keeps documents in process memory, for ephemeral tables
//! and tests.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use log::{debug, warn};

use super::errors::{StoreError, StoreResult};

const DOCUMENT_EXTENSION: &str = "json";
const TEMPORARY_EXTENSION: &str = "json.tmp";

/// Storage for whole table documents.
pub trait DocumentStore: Send + Sync + Debug {
    /// Human readable location of the document, for messages.
    fn location(&self, table_name: &str) -> String;

    fn exists(&self, table_name: &str) -> StoreResult<bool>;

    /// Read the full document. A missing document is
    /// [`StoreError::TableNotFound`].
    fn read(&self, table_name: &str) -> StoreResult<Vec<u8>>;

    /// Replace the full document, creating it if needed.
    fn write(&self, table_name: &str, contents: &[u8]) -> StoreResult<()>;

    /// Delete the document. Returns `false` if there was nothing to delete.
    fn remove(&self, table_name: &str) -> StoreResult<bool>;

    /// Names of all stored tables, sorted.
    fn list(&self) -> StoreResult<Vec<String>>;
}

pub fn validate_table_name(table_name: &str) -> StoreResult<()> {
    //! A table name has to map onto exactly one document, so it must be
    //! non-empty and free of path separators.

    let invalid = table_name.is_empty()
        || table_name == "."
        || table_name == ".."
        || table_name.contains(['/', '\\', '\0']);

    if invalid {
        Err(StoreError::InvalidTableName(table_name.to_string()))
    } else {
        Ok(())
    }
}

/// Documents as `<root>/<table>.json` files.
///
/// Writes land in a `<table>.json.tmp` sibling first and are renamed over the
/// document once flushed, so a reader never sees half a document. The root
/// directory is never created here; a missing root is an I/O error.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, table_name: &str) -> StoreResult<PathBuf> {
        validate_table_name(table_name)?;
        Ok(self
            .root
            .join(format!("{}.{}", table_name, DOCUMENT_EXTENSION)))
    }

    fn write_through_temporary(temporary: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(temporary)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

impl DocumentStore for JsonFileStore {
    fn location(&self, table_name: &str) -> String {
        self.root
            .join(format!("{}.{}", table_name, DOCUMENT_EXTENSION))
            .display()
            .to_string()
    }

    fn exists(&self, table_name: &str) -> StoreResult<bool> {
        let path = self.document_path(table_name)?;

        match fs::metadata(&path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn read(&self, table_name: &str) -> StoreResult<Vec<u8>> {
        let path = self.document_path(table_name)?;

        fs::read(&path).map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                StoreError::TableNotFound(table_name.to_string())
            } else {
                StoreError::io(&path, e)
            }
        })
    }

    fn write(&self, table_name: &str, contents: &[u8]) -> StoreResult<()> {
        let path = self.document_path(table_name)?;
        let temporary = path.with_extension(TEMPORARY_EXTENSION);

        if let Err(e) = Self::write_through_temporary(&temporary, contents) {
            let _ = fs::remove_file(&temporary);
            return Err(StoreError::io(&temporary, e));
        }

        if let Err(e) = fs::rename(&temporary, &path) {
            let _ = fs::remove_file(&temporary);
            return Err(StoreError::io(&path, e));
        }

        debug!("wrote {} byte(s) to {}", contents.len(), path.display());
        Ok(())
    }

    fn remove(&self, table_name: &str) -> StoreResult<bool> {
        let path = self.document_path(table_name)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                warn!("data path {} does not exist", self.root.display());
                return Ok(vec![]);
            }
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut names = vec![];
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            let is_document = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXTENSION);

            if let Some(name) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|_| is_document)
            {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Documents kept in process memory. They vanish with the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl DocumentStore for MemoryStore {
    fn location(&self, table_name: &str) -> String {
        format!("memory:{}", table_name)
    }

    fn exists(&self, table_name: &str) -> StoreResult<bool> {
        validate_table_name(table_name)?;
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.contains_key(table_name))
    }

    fn read(&self, table_name: &str) -> StoreResult<Vec<u8>> {
        validate_table_name(table_name)?;
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        documents
            .get(table_name)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))
    }

    fn write(&self, table_name: &str, contents: &[u8]) -> StoreResult<()> {
        validate_table_name(table_name)?;
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        documents.insert(table_name.to_string(), contents.to_vec());
        Ok(())
    }

    fn remove(&self, table_name: &str) -> StoreResult<bool> {
        validate_table_name(table_name)?;
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.remove(table_name).is_some())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.keys().cloned().collect())
    }
}
