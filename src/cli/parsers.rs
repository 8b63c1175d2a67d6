//! The place where the CLI and record parsers are defined.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::cli::messages::{highlight_argument, system_message};
use crate::persistence::Record;

#[derive(Parser, Debug)]
#[command(name = "ferrum-store")]
#[command(about = "A Rust-powered JSON record store", long_about = None)]
pub struct CliParser {
    /// Directory holding the table documents (overrides FERRUM_DATA_PATH).
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Write documents indented (overrides FERRUM_PRETTY_JSON).
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty table, keeping an existing one unless told otherwise.
    Create {
        table: String,

        #[arg(long)]
        overwrite: bool,
    },

    /// Add a record given as a JSON object.
    Add { table: String, record: String },

    /// Show a single record.
    Get { table: String, id: String },

    /// Replace a record with a JSON object.
    Edit {
        table: String,
        id: String,
        record: String,
    },

    /// Delete a record.
    Delete { table: String, id: String },

    /// Show only the given columns of every record.
    Fetch {
        table: String,

        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Show every record of a table.
    List { table: String },

    /// List the tables in the data path.
    Tables,

    /// Delete a table document.
    Drop { table: String },
}

pub fn parse_record(input: &str) -> Result<Record, String> {
    //! Parse a record argument. Only JSON objects make records.

    let value: Value = serde_json::from_str(input).map_err(|e| {
        system_message(
            "parser",
            format!("Error parsing record: {}", highlight_argument(&e.to_string())),
        )
    })?;

    match value {
        Value::Object(record) => Ok(record),
        _ => Err(system_message(
            "parser",
            format!(
                "A record must be a JSON object, got {}.",
                highlight_argument(input)
            ),
        )),
    }
}
