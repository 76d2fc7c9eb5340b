#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

#[cfg(feature = "json")]
mod bind;
pub mod errors;
pub mod format;
pub mod metadata;
pub mod parsed;
mod registry;
mod rewrite;
mod scanner;
pub mod selector;
#[cfg(feature = "testing")]
pub mod testing;

// Re-export main types
pub use format::{Dialect, PlaceholderFormat};
pub use metadata::{AccessMode, Cardinality, DataType, RowType, ValueKind, parse_column_types};
pub use parsed::{Parameter, Parameters, ParsedQuery, ParsedSql, QueryToken};
pub use scanner::parse_sql;
pub use selector::{Identifier, Segment, Selector, is_valid_selector};

// Re-export errors
pub use errors::{Error, ParseError};
