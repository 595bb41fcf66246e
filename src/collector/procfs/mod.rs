//! Parsers for the Linux `/proc` filesystem.
//!
//! [`parser`] holds pure string-in, struct-out functions, one per file grammar.
//! [`ProcParser`] adds path resolution, I/O error classification and unit
//! conversion on top of them.

pub mod parser;
mod paths;
mod proc_parser;

pub use parser::{LOOPBACK_INTERFACE, LoopbackPolicy, ParseError};
pub use paths::ProcPaths;
pub use proc_parser::ProcParser;
