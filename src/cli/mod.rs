//! The command line front end. It parses one command, runs it against a
//! [`Database`] built from the environment and the global flags, and prints
//! what came back.

use crate::{
    cli::{
        commands::CommandExecutor,
        parsers::CliParser,
    },
    config::StoreConfig,
    persistence::Database,
};

mod colors;
mod commands;
mod messages;
pub mod parsers;

pub use commands::CommandResult;
pub use parsers::{Command, parse_record};

pub fn database_from(parser: &CliParser, mut config: StoreConfig) -> Database {
    //! Build the database, letting the command line flags win over the
    //! environment.

    if let Some(data_path) = &parser.data_path {
        config.data_path = data_path.clone();
    }
    config.pretty |= parser.pretty;

    Database::new(config)
}

pub fn execute(command: Command, database: &Database) -> Result<CommandResult, String> {
    CommandExecutor::new(command, database).execute()
}

pub fn run_client(parser: CliParser) -> Result<(), String> {
    let database = database_from(&parser, StoreConfig::from_env());
    if let Some(data_path) = database.data_path() {
        log::debug!("using data path {}", data_path.display());
    }

    let result = execute(parser.command, &database)?;
    if !result.lines.is_empty() {
        println!("{}", result);
    }

    if let Some(n_rows) = result.n_rows_processed {
        log::info!("{} row(s) processed", n_rows);
    }

    Ok(())
}
