//! Structured file primitives for the BTG translator
//!
//! Reads and writes JSON documents whose top level is an object, with
//! locked write-to-temp-then-rename semantics on the write side.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{read_structured_file, write_atomic, write_structured_file};

/// A structured document: a JSON object keyed by field name.
pub type Mapping = serde_json::Map<String, serde_json::Value>;
