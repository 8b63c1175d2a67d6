//! General message formatting functions for prettifying the CLI.
//! Includes basic utility functions such as:
//!
//! - Highlight Text (make the text ferrum red but not bold)
//! - Record lines (identifier followed by the record as JSON)
//! - System message formatting functions that produce the same
//! format messages.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use colored::Colorize;
use serde_json::Value;

use crate::cli::colors::{FERRUM_RED, ID_GREY};
use crate::persistence::{Record, RecordId};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the ferrum red
    //! color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(FERRUM_RED))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Format a message according to the command line theme.
    //!
    //! Takes in a source name (like 'store') and the message as a
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:6}", source_name.color(FERRUM_RED).bold());

    format!("[{}] {}", source_formatted, message)
}

pub fn record_line(id: &RecordId, record: &Record) -> String {
    //! One record per line: the identifier, then the record as compact JSON.

    format!(
        "{} | {}",
        id.as_str().color(ID_GREY),
        Value::Object(record.clone())
    )
}

pub fn format_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
