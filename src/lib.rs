//! Reader, validator and MCP server for static documentation search indexes.
//!
//! A documentation generator writes its search index as `search_index.js`: a variable
//! assignment holding `{"docs": [...]}`, one record per indexed location. This crate
//! loads such files, checks their structure, groups entries by page, and serves the
//! result to MCP clients and the command line.

pub mod cache;
pub mod cli;
pub mod config;
pub mod digest;
pub mod discovery;
pub mod error;
pub mod index;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use config::Config;
pub use error::LoadError;
pub use index::{Category, DocEntry, Location, PageIndex, SearchIndex, ValidationReport};
pub use state::{IndexState, LoadedIndex};
