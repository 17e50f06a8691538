//! Structured signature types.
//!
//! These are what the parser builds and what gets serialized for the code
//! generator. Field names follow the generator's expectations
//! (`return_types`, `variable_length`, ...).

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type union such as `string|table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionType {
    pub names: Vec<String>,
    pub is_optional: bool,
}

impl FunctionType {
    pub fn new<S: Into<String>>(name: S, is_optional: bool) -> Self {
        FunctionType {
            names: vec![name.into()],
            is_optional,
        }
    }

    pub fn union<S: Into<String>>(names: impl IntoIterator<Item = S>, is_optional: bool) -> Self {
        FunctionType {
            names: names.into_iter().map(Into::into).collect(),
            is_optional,
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.iter().join("|");
        if self.is_optional {
            write!(f, "[{}]", names)
        } else {
            write!(f, "{}", names)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub name: String,
    /// `None` for untyped variadic placeholders such as `[arguments...]`.
    pub argument_type: Option<FunctionType>,
    /// Raw default expression, not evaluated.
    pub default_value: Option<String>,
}

impl FunctionArgument {
    pub fn new<S: Into<String>>(name: S, argument_type: Option<FunctionType>) -> Self {
        FunctionArgument {
            name: name.into(),
            argument_type,
            default_value: None,
        }
    }

    pub fn with_default<S: Into<String>>(mut self, default_value: S) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Untyped or optionally typed.
    pub fn is_optional(&self) -> bool {
        self.argument_type.as_ref().is_none_or(|t| t.is_optional)
    }
}

/// Arguments grouped by position. Each inner list holds the alternatives
/// sharing that position (`string value / int theNumber`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionArgumentValues {
    pub arguments: Vec<Vec<FunctionArgument>>,
    pub variable_length: bool,
}

impl FunctionArgumentValues {
    /// Every argument, in order, ignoring the grouping.
    pub fn flat(&self) -> impl Iterator<Item = &FunctionArgument> {
        self.arguments.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionReturnTypes {
    pub return_types: Vec<FunctionType>,
    pub variable_length: bool,
}

/// Generic parameter of a declaration (`<T extends Element = Element>`).
/// Only filled in by the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericType {
    pub name: String,
    pub extends: Option<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub return_types: FunctionReturnTypes,
    pub arguments: FunctionArgumentValues,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_types: Vec<GenericType>,
}

impl FunctionSignature {
    /// Same signature under another name. Used for OOP method bindings.
    pub fn renamed<S: Into<String>>(&self, name: S) -> Self {
        FunctionSignature {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let returns = self.return_types.return_types.iter().join(", ");
        let arguments = self
            .arguments
            .arguments
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|arg| match &arg.argument_type {
                        Some(t) => format!("{} {}", t, arg.name),
                        None => arg.name.clone(),
                    })
                    .join(" / ")
            })
            .join(", ");
        let varargs = match (self.arguments.variable_length, arguments.is_empty()) {
            (false, _) => "",
            (true, true) => "...",
            (true, false) => ", ...",
        };
        write!(f, "{} {}({}{})", returns, self.name, arguments, varargs)
    }
}
