//! `{{OOP|...}}` template support: maps a procedural function onto a class
//! method and/or field.

pub mod parser;
pub mod tokenizer;

pub use parser::{FunctionOop, OopBinding, OopField, OopParser, parse_oop};
pub use tokenizer::{OopToken, OopTokenKind, tokenize_oop};
