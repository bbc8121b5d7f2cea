//! Request language front end: parsing, validation and query text generation.

pub use ast::{QueryNode, ValueSpec, Walk};
pub use codegen::codegen;
pub use parser::{parse, Rule};

pub mod error;

mod ast;
mod checker;
mod codegen;
mod parser;
