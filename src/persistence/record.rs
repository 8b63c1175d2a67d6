use std::borrow::Borrow;
use std::fmt::Display;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ulid::Ulid;

/// A schema-less record. Field order is kept as inserted so a table reads
/// back the way it was written.
pub type Record = Map<String, Value>;

/// The key a record is stored under inside a table.
///
/// Identifiers generated by this crate are ULIDs, so they sort by creation
/// time. Identifiers read back from a document are kept verbatim, whatever
/// format the writer used.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn created_at(&self) -> Option<SystemTime> {
        //! The creation time encoded in the identifier.
        //!
        //! Returns [`None`] for identifiers that are not ULIDs.

        Ulid::from_string(&self.0).ok().map(|ulid| ulid.datetime())
    }
}

impl From<Ulid> for RecordId {
    fn from(ulid: Ulid) -> RecordId {
        RecordId(ulid.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> RecordId {
        RecordId(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> RecordId {
        RecordId(id.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn project<S: AsRef<str>>(record: &Record, columns: &[S]) -> Record {
    //! Reduce a record to the fields named in `columns`.
    //!
    //! Columns the record does not have are skipped rather than filled with
    //! nulls, and the source record's field order is kept.

    record
        .iter()
        .filter(|(field, _)| columns.iter().any(|column| column.as_ref() == field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}
