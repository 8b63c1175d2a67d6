//! Persistence as JSON tables needs the following components
//! - Record (schema-less mapping of field names to JSON values)
//! - Document (the durable blob a table is saved into, one per table name)
//! - Table (the in-memory cache of one document, saved on every mutation)
//! - Database (the factory that knows where documents live)
//!

//  All modules of this lib
mod database;
mod document;
mod errors;
mod record;
mod table;

//  External API
pub use database::Database;
pub use document::{DocumentStore, JsonFileStore, MemoryStore, validate_table_name};
pub use errors::{ErrorKind, StoreError, StoreResult};
pub use record::{Record, RecordId, project};
pub use table::{Rows, Table};
