//! OOP parser: template tokens -> `FunctionOop`.

use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};

use crate::oop::tokenizer::{OopToken, OopTokenKind, tokenize_oop};
use crate::signature::types::{FunctionSignature, FunctionType};
use crate::tokens::render_tokens;
use crate::wikitext::errors::{Result, WikiError};

/// Class binding of a procedural function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOop {
    /// Free-text compatibility note.
    pub description: Option<String>,
    pub class_name: String,
    /// `None` for a bare class binding without a method.
    pub method_name: Option<String>,
    pub field_name: Option<String>,
    /// Procedural function that reads back the field.
    pub counterpart_method: Option<String>,
    pub is_static: bool,
}

/// A field exposed on the class, typed after the function's return values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OopField {
    pub name: String,
    pub types: Vec<FunctionType>,
}

/// What the code generator needs to emit the class member(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OopBinding {
    pub description: Option<String>,
    pub base_function_name: String,
    pub class_name: String,
    pub is_static: bool,
    /// Function signature renamed to the method.
    pub method: Option<FunctionSignature>,
    pub field: Option<OopField>,
}

impl FunctionOop {
    /// Bind this metadata to the function it was found on.
    pub fn bind(&self, signature: &FunctionSignature) -> OopBinding {
        OopBinding {
            description: self.description.clone(),
            base_function_name: signature.name.clone(),
            class_name: self.class_name.clone(),
            is_static: self.is_static,
            method: self
                .method_name
                .as_ref()
                .map(|name| signature.renamed(name.clone())),
            field: self.field_name.as_ref().map(|name| OopField {
                name: name.clone(),
                types: signature.return_types.return_types.clone(),
            }),
        }
    }
}

/// Tokenize and parse an OOP template.
pub fn parse_oop(code: &str) -> Result<FunctionOop> {
    let tokens = tokenize_oop(code)?;
    log::debug!("[OOP]: {}", render_tokens(&tokens));
    OopParser::new(&tokens).parse()
}

pub struct OopParser<'a> {
    tokens: &'a [OopToken],
}

struct MethodData {
    class_name: String,
    method_name: Option<String>,
    is_static: bool,
}

impl<'a> OopParser<'a> {
    pub fn new(tokens: &'a [OopToken]) -> Self {
        OopParser { tokens }
    }

    fn value_of(&self, kind: OopTokenKind) -> Option<String> {
        self.tokens
            .iter()
            .find(|t| t.is(kind))
            .map(|t| t.value.clone())
            .filter(|v| !v.is_empty())
    }

    pub fn parse(&self) -> Result<FunctionOop> {
        let method = self
            .tokens
            .iter()
            .find(|t| t.is(OopTokenKind::Method))
            .ok_or_else(|| WikiError::oop_parse("No method part in OOP template"))?;
        let method = parse_method(&method.value)?;

        Ok(FunctionOop {
            description: self.value_of(OopTokenKind::Note),
            class_name: method.class_name,
            method_name: method.method_name,
            field_name: self.value_of(OopTokenKind::Field),
            counterpart_method: self.value_of(OopTokenKind::CounterpartMethod),
            is_static: method.is_static,
        })
    }
}

/// `[[class]]:method` is an instance method, `class.method` is static and a
/// bare `class` is a static binding without a method.
///
/// The last separator splits class from method. Any `.` in the definition
/// makes it static, so `[[Engine.Model]]:load` is static too.
fn parse_method(raw: &str) -> Result<MethodData> {
    let text = raw.replace("[[", "").replace("]]", "");
    let text = text.trim();
    if text.is_empty() {
        return Err(WikiError::oop_parse(format!(
            "Empty method definition '{}'",
            raw
        )));
    }

    match regex_captures!(r"^(.+)([.:])(.+)$", text) {
        Some((_, class_name, _, method_name)) => Ok(MethodData {
            class_name: class_name.trim().to_string(),
            method_name: Some(method_name.trim().to_string()),
            is_static: text.contains('.'),
        }),
        None => Ok(MethodData {
            class_name: text.to_string(),
            method_name: None,
            is_static: true,
        }),
    }
}
