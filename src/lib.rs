//! A tiny record store where every table is one JSON document on disk.
//!
//! - [`persistence`] holds the table store, its backing documents and the
//! [`persistence::Database`] factory that hands tables out.
//! - [`config`] resolves the data directory from the environment.
//! - [`cli`] is the command line front end used by the `ferrum-store` binary.

pub mod cli;
pub mod config;
pub mod persistence;
