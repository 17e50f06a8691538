//! Function signatures: tokenizer, parser and overload expansion.
//!
//! `parse_signature` is the usual entry point; the submodules are public so
//! single passes can be driven directly.

pub mod expand;
pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod types;

pub use expand::expand_signature;
pub use parser::{SignatureParser, parse_signature};
pub use token::{SignatureToken, TokenKind};
pub use tokenizer::tokenize;
pub use types::{
    FunctionArgument, FunctionArgumentValues, FunctionReturnTypes, FunctionSignature,
    FunctionType, GenericType,
};
