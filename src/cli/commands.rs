//! This module is where all the commands are executed.
//!
//! Ferrum store command line syntax:
//!
//! - ferrum-store create <table> [--overwrite]
//! - ferrum-store add <table> <json>
//! - ferrum-store get <table> <id>
//! - ferrum-store edit <table> <id> <json>
//! - ferrum-store delete <table> <id>
//! - ferrum-store fetch <table> <column>*
//! - ferrum-store list <table>
//! - ferrum-store tables
//! - ferrum-store drop <table>
//!
//! Here * means one or more values separated by spaces.

use std::fmt::Display;

use crate::cli::messages::{format_time, highlight_argument, record_line, system_message};
use crate::cli::parsers::{Command, parse_record};
use crate::persistence::{Database, RecordId, StoreError};

/// The executor that runs one parsed [`Command`] against a [`Database`].
///
/// Each command opens the table it needs, does its work and lets the handle
/// go, so every invocation reads the document fresh.
pub struct CommandExecutor<'a> {
    command: Command,
    database: &'a Database,
}

/// What a command produced: the lines to print and how many records it
/// touched, when that makes sense.
pub struct CommandResult {
    pub lines: Vec<String>,
    pub n_rows_processed: Option<usize>,
}

impl Display for CommandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

impl CommandResult {
    fn message(line: String, n_rows_processed: Option<usize>) -> CommandResult {
        CommandResult {
            lines: vec![line],
            n_rows_processed,
        }
    }
}

fn store_error(error: StoreError) -> String {
    system_message("store", highlight_argument(&error.to_string()))
}

impl<'a> CommandExecutor<'a> {
    pub fn new(command: Command, database: &'a Database) -> CommandExecutor<'a> {
        CommandExecutor { command, database }
    }

    pub fn execute(self) -> Result<CommandResult, String> {
        //! Run the command.
        //!
        //! Returns the printable result, or a formatted error message.

        let database = self.database;

        match self.command {
            Command::Create { table, overwrite } => {
                database.ensure_data_path().map_err(store_error)?;
                let table = database
                    .create_table(&table, overwrite)
                    .map_err(store_error)?;

                Ok(CommandResult::message(
                    system_message(
                        "store",
                        format!(
                            "Table '{}' is ready at '{}' with {} record(s).",
                            highlight_argument(table.name()),
                            table.location(),
                            table.len()
                        ),
                    ),
                    Some(table.len()),
                ))
            }
            Command::Add { table, record } => {
                let record = parse_record(&record)?;
                let mut table = database.open_table(&table).map_err(store_error)?;
                let id = table.add_record(record).map_err(store_error)?;

                Ok(CommandResult::message(id.to_string(), Some(1)))
            }
            Command::Get { table, id } => {
                let id = RecordId::from(id);
                let mut table = database.open_table(&table).map_err(store_error)?;
                let record = table.get_record(&id).map_err(store_error)?.cloned();

                match record {
                    Some(record) => {
                        let mut lines = vec![record_line(&id, &record)];
                        if let Some(created_at) = id.created_at() {
                            lines.push(system_message(
                                "store",
                                format!(
                                    "Created at '{}'.",
                                    highlight_argument(&format_time(created_at))
                                ),
                            ));
                        }

                        Ok(CommandResult {
                            lines,
                            n_rows_processed: Some(1),
                        })
                    }
                    None => Ok(CommandResult::message(
                        system_message(
                            "store",
                            format!(
                                "No record '{}' in table '{}'.",
                                highlight_argument(id.as_str()),
                                table.name()
                            ),
                        ),
                        Some(0),
                    )),
                }
            }
            Command::Edit { table, id, record } => {
                let record = parse_record(&record)?;
                let mut table = database.open_table(&table).map_err(store_error)?;
                table.edit_record(&id, record).map_err(store_error)?;

                Ok(CommandResult::message(
                    system_message(
                        "store",
                        format!("Record '{}' replaced.", highlight_argument(&id)),
                    ),
                    Some(1),
                ))
            }
            Command::Delete { table, id } => {
                let mut table = database.open_table(&table).map_err(store_error)?;
                let removed = table.delete_record(&id).map_err(store_error)?;

                let message = if removed {
                    format!("Record '{}' deleted.", highlight_argument(&id))
                } else {
                    format!("Record '{}' was not present.", highlight_argument(&id))
                };

                Ok(CommandResult::message(
                    system_message("store", message),
                    Some(usize::from(removed)),
                ))
            }
            Command::Fetch { table, columns } => {
                let table = database.open_table(&table).map_err(store_error)?;
                let projection = table.fetch(columns.as_slice());

                Ok(CommandResult {
                    lines: projection
                        .iter()
                        .map(|(id, record)| record_line(id, record))
                        .collect(),
                    n_rows_processed: Some(projection.len()),
                })
            }
            Command::List { table } => {
                let table = database.open_table(&table).map_err(store_error)?;

                Ok(CommandResult {
                    lines: table
                        .rows()
                        .iter()
                        .map(|(id, record)| record_line(id, record))
                        .collect(),
                    n_rows_processed: Some(table.len()),
                })
            }
            Command::Tables => {
                let names = database.table_names().map_err(store_error)?;
                let n_tables = names.len();

                Ok(CommandResult {
                    lines: names,
                    n_rows_processed: Some(n_tables),
                })
            }
            Command::Drop { table } => {
                let dropped = database.drop_table(&table).map_err(store_error)?;

                let message = if dropped {
                    format!("Table '{}' dropped.", highlight_argument(&table))
                } else {
                    format!("Table '{}' does not exist.", highlight_argument(&table))
                };

                Ok(CommandResult::message(system_message("store", message), None))
            }
        }
    }
}
