use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::config::StoreConfig;

use super::document::{DocumentStore, JsonFileStore, validate_table_name};
use super::errors::{StoreError, StoreResult};
use super::table::Table;

/// The factory that hands out [`Table`] objects.
///
/// A [`Database`] owns the configuration shared by its tables: where their
/// documents live and how they are written. Changing the data path only
/// affects tables created or opened afterwards; handles that are already open
/// keep the store they were opened with.
///
/// Nothing here is process-wide. Two databases with different data paths can
/// live side by side, which is what the tests rely on.
///
/// A database built over a custom store with [`Database::with_store`] has no
/// data path until one is set.
#[derive(Debug)]
pub struct Database {
    data_path: Option<PathBuf>,
    pretty: bool,
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(config: StoreConfig) -> Database {
        //! Create a database that keeps `<table>.json` documents under the
        //! configured data path.

        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&config.data_path));

        Database {
            data_path: Some(config.data_path),
            pretty: config.pretty,
            store,
        }
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Database {
        //! Create a database over a custom document store, such as
        //! [`super::MemoryStore`].
        //!
        //! Setting a data path later switches back to JSON files.

        Database {
            data_path: None,
            pretty: false,
            store,
        }
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    pub fn set_data_path(&mut self, data_path: impl Into<PathBuf>) {
        //! Point subsequently created and opened tables at another directory.

        let data_path = data_path.into();
        self.store = Arc::new(JsonFileStore::new(&data_path));
        self.data_path = Some(data_path);
    }

    pub fn set_pretty(&mut self, pretty: bool) {
        self.pretty = pretty;
    }

    pub fn ensure_data_path(&self) -> StoreResult<()> {
        //! Create the data directory if it is missing. Tables never do this
        //! on their own.
        //!
        //! A database without a data path has nothing to create.

        match &self.data_path {
            Some(data_path) => {
                fs::create_dir_all(data_path).map_err(|e| StoreError::io(data_path, e))
            }
            None => Ok(()),
        }
    }

    pub fn create_table(&self, name: &str, overwrite: bool) -> StoreResult<Table> {
        //! Allocate an empty table and open it.
        //!
        //! An existing table is kept as is unless `overwrite` is set.

        Ok(Table::create(name, Arc::clone(&self.store), overwrite)?.with_pretty(self.pretty))
    }

    pub fn open_table(&self, name: &str) -> StoreResult<Table> {
        Ok(Table::open(name, Arc::clone(&self.store))?.with_pretty(self.pretty))
    }

    pub fn table_exists(&self, name: &str) -> StoreResult<bool> {
        self.store.exists(name)
    }

    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        //! Get a sorted list of all tables in the data path.

        self.store.list()
    }

    pub fn drop_table(&self, name: &str) -> StoreResult<bool> {
        //! Delete the document of a table.
        //!
        //! Open handles on the table are not told about it; their next save
        //! writes the document again.
        //!
        //! Returns `false` if there was no such table.

        validate_table_name(name)?;
        let dropped = self.store.remove(name)?;
        if dropped {
            info!("dropped table '{}'", name);
        }

        Ok(dropped)
    }
}
