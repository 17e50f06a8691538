//! Signature parser: token list -> `FunctionSignature`.

use crate::signature::token::{SignatureToken, TokenKind};
use crate::signature::tokenizer::tokenize;
use crate::signature::types::{
    FunctionArgument, FunctionArgumentValues, FunctionReturnTypes, FunctionSignature, FunctionType,
};
use crate::tokens::render_tokens;
use crate::wikitext::errors::{Result, WikiError};

/// Tokenize and parse a raw signature.
pub fn parse_signature(code: &str) -> Result<FunctionSignature> {
    let tokens = tokenize(code)?;
    log::debug!("[Signature]: {}", render_tokens(&tokens));
    SignatureParser::new(&tokens, code).parse()
}

/// Builds a `FunctionSignature` from tokenized input.
pub struct SignatureParser<'a> {
    tokens: &'a [SignatureToken],
    /// Raw signature, for error context only.
    code: &'a str,
}

impl<'a> SignatureParser<'a> {
    pub fn new(tokens: &'a [SignatureToken], code: &'a str) -> Self {
        SignatureParser { tokens, code }
    }

    pub fn parse(&self) -> Result<FunctionSignature> {
        Ok(FunctionSignature {
            name: self.get_name()?,
            return_types: self.get_returns(),
            arguments: self.get_arguments()?,
            generic_types: Vec::new(),
        })
    }

    pub fn get_name(&self) -> Result<String> {
        self.tokens
            .iter()
            .find(|t| t.is(TokenKind::FunctionName))
            .map(|t| t.value.clone())
            .ok_or_else(|| WikiError::signature_parse("No function name token", self.code))
    }

    /// Return types are everything before the function name.
    pub fn get_returns(&self) -> FunctionReturnTypes {
        let mut returns: Vec<FunctionType> = Vec::new();
        let mut optional = false;
        let mut variable_length = false;
        let mut union = false;

        for token in self
            .tokens
            .iter()
            .take_while(|t| !t.is(TokenKind::FunctionName))
        {
            match token.kind {
                TokenKind::OptionalStart => optional = true,
                TokenKind::OptionalEnd => optional = false,
                TokenKind::VarargsReturnSign => variable_length = true,
                TokenKind::TypeUnionSign => union = true,
                TokenKind::ReturnType => {
                    if union && let Some(last) = returns.last_mut() {
                        last.names.push(token.value.clone());
                    } else {
                        returns.push(FunctionType::new(token.value.clone(), optional));
                    }
                    union = false;
                }
                _ => {}
            }
        }

        FunctionReturnTypes {
            return_types: returns,
            variable_length,
        }
    }

    /// Arguments live between the round brackets.
    pub fn get_arguments(&self) -> Result<FunctionArgumentValues> {
        let start = self
            .tokens
            .iter()
            .position(|t| t.is(TokenKind::ArgumentStart))
            .ok_or_else(|| WikiError::signature_parse("No '(' token", self.code))?;
        let end = self
            .tokens
            .iter()
            .position(|t| t.is(TokenKind::ArgumentEnd))
            .filter(|end| *end > start)
            .ok_or_else(|| WikiError::signature_parse("No ')' token after '('", self.code))?;

        let mut groups: Vec<Vec<FunctionArgument>> = Vec::new();
        let mut optional_counter = 0usize;
        let mut variable_length = false;
        let mut pending_type: Option<FunctionType> = None;
        let mut join_position = false;
        // Last token that is not an optional marker.
        let mut previous: Option<TokenKind> = None;

        for token in &self.tokens[start + 1..end] {
            match token.kind {
                TokenKind::OptionalStart => optional_counter += 1,
                TokenKind::OptionalEnd => {
                    optional_counter = optional_counter.checked_sub(1).ok_or_else(|| {
                        WikiError::signature_parse("Unbalanced ']' in arguments", self.code)
                    })?;
                }
                TokenKind::ArgumentType => {
                    if previous == Some(TokenKind::TypeUnionSign)
                        && let Some(current) = pending_type.as_mut()
                    {
                        current.names.push(token.value.clone());
                    } else {
                        pending_type = Some(FunctionType::new(
                            token.value.clone(),
                            optional_counter > 0,
                        ));
                    }
                }
                TokenKind::TypeUnionSign => {
                    if previous == Some(TokenKind::ArgumentName) {
                        join_position = true;
                    }
                }
                TokenKind::ArgumentName => {
                    let argument = FunctionArgument::new(token.value.clone(), pending_type.take());
                    if join_position && let Some(group) = groups.last_mut() {
                        group.push(argument);
                    } else {
                        groups.push(vec![argument]);
                    }
                    join_position = false;
                }
                TokenKind::DefaultValue if previous == Some(TokenKind::EqualSign) => {
                    if let Some(argument) = groups.last_mut().and_then(|g| g.last_mut()) {
                        argument.default_value = Some(token.value.clone());
                    } else {
                        log::warn!("[Signature]: default value without argument in `{}`", self.code);
                    }
                }
                TokenKind::VarargsSign => variable_length = true,
                TokenKind::CommaSign => {
                    pending_type = None;
                    join_position = false;
                }
                _ => {}
            }

            if !matches!(token.kind, TokenKind::OptionalStart | TokenKind::OptionalEnd) {
                previous = Some(token.kind);
            }
        }

        Ok(FunctionArgumentValues {
            arguments: groups,
            variable_length,
        })
    }
}
