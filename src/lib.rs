//! Command-line parameter parsing with dependency and exclusion rules.
//!
//! This crate turns a set of parameter definitions (short/long names, value
//! type, multiplicity, defaults, inter-parameter rules) plus a token stream
//! into typed recorded values and leftover positional arguments, or into a
//! precise error naming the offending parameter. Definitions are registered
//! one by one or compiled from a compact bracket grammar such as
//! `[s:|size:][f*|file*]`.
//!
//! The main entry point is [`CommandLine`], which owns a
//! [`ParameterRegistry`] together with the state recorded by parsing. The
//! crate never reads the process argument vector itself; callers hand
//! `parse` an explicit token sequence.

pub mod definition;
pub mod error;
pub mod grammar;
pub mod registry;
pub mod value;

mod command_line;
mod parser;
mod rules;

pub use command_line::CommandLine;
pub use definition::{ParameterDefinition, ParameterOptions, ParameterType};
pub use error::{Error, Result};
pub use registry::{ParameterId, ParameterRegistry};
pub use value::{RecordedValues, Value};
