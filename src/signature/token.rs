//! Token kinds produced by the signature tokenizer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tokens::Token;

/// Lexical role of a signature fragment.
///
/// Every fragment starts as either a literal delimiter kind or `Undefined`;
/// later passes narrow `Undefined` down to a concrete kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    ReturnType,
    FunctionName,
    /// `(`
    ArgumentStart,
    /// `)`
    ArgumentEnd,
    ArgumentType,
    ArgumentName,
    /// `[`
    OptionalStart,
    /// `]`
    OptionalEnd,
    /// `=`
    EqualSign,
    DefaultValue,
    /// `,`
    CommaSign,
    /// `/` or `|`
    TypeUnionSign,
    /// `...` after the function name
    VarargsSign,
    /// `...` before the function name
    VarargsReturnSign,
    Undefined,
}

impl TokenKind {
    /// Kinds that end an argument position or a default value.
    pub const SEPARATORS: [TokenKind; 4] = [
        TokenKind::CommaSign,
        TokenKind::ArgumentEnd,
        TokenKind::OptionalEnd,
        TokenKind::OptionalStart,
    ];

    /// Classify a raw fragment by its literal text.
    pub fn from_literal(value: &str) -> TokenKind {
        match value {
            "=" => TokenKind::EqualSign,
            "[" => TokenKind::OptionalStart,
            "]" => TokenKind::OptionalEnd,
            "," => TokenKind::CommaSign,
            "(" => TokenKind::ArgumentStart,
            ")" => TokenKind::ArgumentEnd,
            "/" | "|" => TokenKind::TypeUnionSign,
            "..." => TokenKind::VarargsSign,
            "\"" => TokenKind::DefaultValue,
            _ => TokenKind::Undefined,
        }
    }

    pub fn is_separator(&self) -> bool {
        Self::SEPARATORS.contains(self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::ReturnType => "ReturnType",
            TokenKind::FunctionName => "FunctionName",
            TokenKind::ArgumentStart => "ArgumentStart",
            TokenKind::ArgumentEnd => "ArgumentEnd",
            TokenKind::ArgumentType => "ArgumentType",
            TokenKind::ArgumentName => "ArgumentName",
            TokenKind::OptionalStart => "OptionalStart",
            TokenKind::OptionalEnd => "OptionalEnd",
            TokenKind::EqualSign => "EqualSign",
            TokenKind::DefaultValue => "DefaultValue",
            TokenKind::CommaSign => "CommaSign",
            TokenKind::TypeUnionSign => "TypeUnionSign",
            TokenKind::VarargsSign => "VarargsSign",
            TokenKind::VarargsReturnSign => "VarargsReturnSign",
            TokenKind::Undefined => "Undefined",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "returntype" | "return" => Ok(TokenKind::ReturnType),
            "functionname" | "name" => Ok(TokenKind::FunctionName),
            "argumentstart" => Ok(TokenKind::ArgumentStart),
            "argumentend" => Ok(TokenKind::ArgumentEnd),
            "argumenttype" | "type" => Ok(TokenKind::ArgumentType),
            "argumentname" | "arg" => Ok(TokenKind::ArgumentName),
            "optionalstart" => Ok(TokenKind::OptionalStart),
            "optionalend" => Ok(TokenKind::OptionalEnd),
            "equalsign" | "equal" => Ok(TokenKind::EqualSign),
            "defaultvalue" | "default" => Ok(TokenKind::DefaultValue),
            "commasign" | "comma" => Ok(TokenKind::CommaSign),
            "typeunionsign" | "union" => Ok(TokenKind::TypeUnionSign),
            "varargssign" | "varargs" => Ok(TokenKind::VarargsSign),
            "varargsreturnsign" => Ok(TokenKind::VarargsReturnSign),
            "undefined" => Ok(TokenKind::Undefined),
            other => Err(format!("unknown TokenKind '{}'", other)),
        }
    }
}

/// A token of a function signature.
pub type SignatureToken = Token<TokenKind>;
