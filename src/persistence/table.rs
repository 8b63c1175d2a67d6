use std::fmt::Display;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::Value;
use ulid::Generator;

use super::document::{DocumentStore, validate_table_name};
use super::errors::{StoreError, StoreResult};
use super::record::{Record, RecordId, project};

/// Records of a table keyed by their identifiers, in insertion order.
pub type Rows = IndexMap<RecordId, Record>;

/// One named table, cached in memory and mirrored to its backing document.
///
/// Every mutation rewrites the whole document before returning, so the cache
/// and the document only differ between a change and its save. Reads are
/// served from the cache; [`Table::load`] is the only path that reads the
/// document.
///
/// # Issues
/// - Two handles on the same table do not coordinate. Whichever saves last
/// overwrites the other's changes.
/// - A failed save keeps the change in memory; the next successful save
/// flushes it.
pub struct Table {
    name: String,
    store: Arc<dyn DocumentStore>,
    rows: Rows,
    ids: Generator,
    pretty: bool,
}

impl Table {
    pub fn create(
        name: &str,
        store: Arc<dyn DocumentStore>,
        overwrite: bool,
    ) -> StoreResult<Table> {
        //! Allocate an empty document for `name` and open it.
        //!
        //! An existing document is left untouched unless `overwrite` is set,
        //! in which case it is replaced by an empty one.

        validate_table_name(name)?;

        if store.exists(name)? {
            if overwrite {
                warn!("overwriting table '{}' at {}", name, store.location(name));
                store.write(name, &encode(name, &Rows::new(), false)?)?;
            } else {
                debug!("table '{}' exists already, leaving it untouched", name);
            }
        } else {
            store.write(name, &encode(name, &Rows::new(), false)?)?;
            info!("created table '{}' at {}", name, store.location(name));
        }

        Table::open(name, store)
    }

    pub fn open(name: &str, store: Arc<dyn DocumentStore>) -> StoreResult<Table> {
        //! Open an existing table and load its document into memory.
        //!
        //! Fails with [`StoreError::TableNotFound`] when there is no document
        //! and [`StoreError::Decode`] when it is not a mapping of records.

        validate_table_name(name)?;

        let mut table = Table {
            name: name.to_string(),
            store,
            rows: Rows::new(),
            ids: Generator::new(),
            pretty: false,
        };
        table.load(true)?;

        Ok(table)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Table {
        //! Save the document indented instead of compact.

        self.pretty = pretty;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> String {
        self.store.location(&self.name)
    }

    pub fn load(&mut self, force_refresh: bool) -> StoreResult<&Rows> {
        //! Return the cached records, reading the document first if the cache
        //! is empty or `force_refresh` is set.
        //!
        //! A read replaces the cache wholesale.

        if self.rows.is_empty() || force_refresh {
            let contents = self.store.read(&self.name)?;
            self.rows = decode(&self.name, &contents)?;
            debug!(
                "loaded {} record(s) from table '{}'",
                self.rows.len(),
                self.name
            );
        }

        Ok(&self.rows)
    }

    fn save(&self) -> StoreResult<()> {
        let contents = encode(&self.name, &self.rows, self.pretty)?;
        self.store.write(&self.name, &contents)?;
        debug!("saved {} record(s) to table '{}'", self.rows.len(), self.name);

        Ok(())
    }

    pub fn add_record(&mut self, record: Record) -> StoreResult<RecordId> {
        //! Store `record` under a fresh identifier and save the table.
        //!
        //! Identifiers from one handle strictly increase, even within the
        //! same millisecond.
        //!
        //! Returns the new identifier.

        let id = RecordId::from(self.ids.generate().map_err(|_| StoreError::IdExhausted)?);
        debug!("generated identifier {} in table '{}'", id, self.name);

        self.rows.insert(id.clone(), record);
        self.save()?;

        Ok(id)
    }

    pub fn get_record(&mut self, id: impl AsRef<str>) -> StoreResult<Option<&Record>> {
        //! Look a record up by identifier. An absent identifier is
        //! [`None`], not an error.
        //!
        //! The document is only read when the cache is empty.

        if self.rows.is_empty() {
            self.load(false)?;
        }

        Ok(self.rows.get(id.as_ref()))
    }

    pub fn edit_record(&mut self, id: impl AsRef<str>, record: Record) -> StoreResult<()> {
        //! Replace the record stored under `id` as a whole, then save.
        //!
        //! Editing an absent identifier fails with
        //! [`StoreError::RecordNotFound`] and changes nothing.

        let id = id.as_ref();
        match self.rows.get_mut(id) {
            Some(existing) => *existing = record,
            None => return Err(StoreError::RecordNotFound(RecordId::from(id))),
        }

        self.save()
    }

    pub fn delete_record(&mut self, id: impl AsRef<str>) -> StoreResult<bool> {
        //! Remove the record stored under `id` and save, whether or not it
        //! was there.
        //!
        //! Returns `true` if a record was removed.

        let removed = self.rows.shift_remove(id.as_ref()).is_some();
        self.save()?;

        Ok(removed)
    }

    pub fn fetch<S: AsRef<str>>(&self, columns: &[S]) -> Rows {
        //! Project every cached record onto `columns`, keyed by the original
        //! identifiers. Never touches the document.

        self.rows
            .iter()
            .map(|(id, record)| (id.clone(), project(record, columns)))
            .collect()
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.rows.keys().cloned().collect()
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.rows.contains_key(id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|(id, record)| format!("{} | {}", id, Value::Object(record.clone())))
            .collect();

        write!(f, "{}", rows.join("\n"))
    }
}

fn encode(table: &str, rows: &Rows, pretty: bool) -> StoreResult<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(rows)
    } else {
        serde_json::to_vec(rows)
    };

    encoded.map_err(|source| StoreError::Encode {
        table: table.to_string(),
        source,
    })
}

fn decode(table: &str, contents: &[u8]) -> StoreResult<Rows> {
    //! Decode a document into records.
    //!
    //! The top level must be an object of objects. An empty array counts as
    //! an empty table, since some writers emit `[]` for an empty mapping.

    let malformed = |reason: String| StoreError::Decode {
        table: table.to_string(),
        reason,
    };

    let document: Value =
        serde_json::from_slice(contents).map_err(|e| malformed(e.to_string()))?;

    match document {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(id, value)| match value {
                Value::Object(record) => Ok((RecordId::from(id), record)),
                other => Err(malformed(format!(
                    "record '{}' is {}, expected an object",
                    id,
                    json_type(&other)
                ))),
            })
            .collect(),
        Value::Array(items) if items.is_empty() => {
            warn!("table '{}' is stored as an empty array, reading it as empty", table);
            Ok(Rows::new())
        }
        other => Err(malformed(format!(
            "document is {}, expected an object of records",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
