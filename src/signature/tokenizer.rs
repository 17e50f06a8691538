//! Signature tokenizer.
//!
//! Turns a one-line pseudo-BNF declaration such as
//! `bool givePedWeapon ( ped thePed, int weapon [, int ammo=30 ] )` into a
//! list of classified tokens.
//!
//! The work is split into passes. Each pass takes the token list produced by
//! the previous one and returns a new list, narrowing `Undefined` tokens down
//! to concrete kinds. Passes are plain functions so they can be tested one at
//! a time; `tokenize` runs them in order.

use lazy_regex::regex;

use crate::signature::token::{SignatureToken, TokenKind};
use crate::tokens::{concat_neighbours, split_keep_delimiters};
use crate::wikitext::errors::{Result, WikiError};

/// A tokenizer pass: `code` is only used for error context.
pub type Pass = fn(Vec<SignatureToken>, &str) -> Result<Vec<SignatureToken>>;

/// Passes run after splitting, in order.
pub const PASSES: [(&str, Pass); 8] = [
    ("literals", fill_literals),
    ("bracket_precheck", precheck_brackets),
    ("function_name", function_name_and_returns),
    ("default_values", default_values),
    ("argument_types", argument_types),
    ("varargs_names", varargs_names),
    ("name_unions", fuse_name_unions),
    ("concat", concat),
];

/// Tokenize a raw signature.
pub fn tokenize(code: &str) -> Result<Vec<SignatureToken>> {
    let mut tokens = split(code);
    for (name, pass) in PASSES {
        tokens = pass(tokens, code)?;
        log::trace!("[Tokenize/{}]: {} tokens after pass", name, tokens.len());
    }
    final_check(&tokens, code)?;
    Ok(tokens)
}

/// Split on delimiter characters and `...`, keeping the delimiters.
/// Every fragment starts `Undefined`.
pub fn split(code: &str) -> Vec<SignatureToken> {
    let delimiters = regex!(r#"([(\[\]=,)/|" ]|\.\.\.)"#);
    split_keep_delimiters(code, delimiters)
        .into_iter()
        .map(|value| SignatureToken::new(TokenKind::Undefined, value))
        .collect()
}

fn expect_undefined(tokens: &[SignatureToken], index: usize, code: &str) -> Result<()> {
    match tokens.get(index) {
        Some(token) if token.is(TokenKind::Undefined) => Ok(()),
        Some(token) => Err(WikiError::tokenize(
            format!(
                "Expected an unclassified token at {}, got {}:'{}'",
                index, token.kind, token.value
            ),
            code,
        )),
        None => Err(WikiError::tokenize(
            format!("Expected a token at {}, signature ended", index),
            code,
        )),
    }
}

fn count_kind(tokens: &[SignatureToken], kind: TokenKind) -> usize {
    tokens.iter().filter(|t| t.is(kind)).count()
}

/// Map single-character delimiters and `...` to their kinds.
pub fn fill_literals(tokens: Vec<SignatureToken>, _code: &str) -> Result<Vec<SignatureToken>> {
    Ok(tokens
        .into_iter()
        .map(|t| {
            let kind = TokenKind::from_literal(&t.value);
            t.with_kind(kind)
        })
        .collect())
}

/// Warn about duplicate round brackets or unbalanced `[`/`]`. Calls inside default values
/// (`getRootElement()`) legitimately add more, so this never fails.
pub fn precheck_brackets(tokens: Vec<SignatureToken>, code: &str) -> Result<Vec<SignatureToken>> {
    if count_kind(&tokens, TokenKind::ArgumentStart) > 1 {
        log::warn!("[Tokenize]: Multiple open brackets in `{}`", code);
    }
    if count_kind(&tokens, TokenKind::ArgumentEnd) > 1 {
        log::warn!("[Tokenize]: Multiple close brackets in `{}`", code);
    }
    let optional_opens = count_kind(&tokens, TokenKind::OptionalStart);
    let optional_closes = count_kind(&tokens, TokenKind::OptionalEnd);
    if optional_opens != optional_closes {
        log::warn!(
            "[Tokenize]: {} '[' against {} ']' in `{}`",
            optional_opens,
            optional_closes,
            code
        );
    }
    Ok(tokens)
}

/// The token before the first `(` is the function name, everything before
/// it describes the return values.
pub fn function_name_and_returns(
    mut tokens: Vec<SignatureToken>,
    code: &str,
) -> Result<Vec<SignatureToken>> {
    let start = tokens
        .iter()
        .position(|t| t.is(TokenKind::ArgumentStart))
        .ok_or_else(|| WikiError::tokenize("No argument list found", code))?;
    if start == 0 {
        return Err(WikiError::tokenize("No function name before '('", code));
    }

    let name_index = start - 1;
    expect_undefined(&tokens, name_index, code)?;
    tokens[name_index].kind = TokenKind::FunctionName;

    for index in 0..name_index {
        match tokens[index].kind {
            TokenKind::TypeUnionSign
            | TokenKind::CommaSign
            | TokenKind::OptionalStart
            | TokenKind::OptionalEnd => continue,
            TokenKind::VarargsSign => tokens[index].kind = TokenKind::VarargsReturnSign,
            _ => {
                expect_undefined(&tokens, index, code)?;
                tokens[index].kind = TokenKind::ReturnType;
            }
        }
    }

    Ok(tokens)
}

fn mark_default(tokens: &mut [SignatureToken], index: usize) {
    if let Some(token) = tokens.get_mut(index) {
        token.kind = TokenKind::DefaultValue;
    }
}

/// Everything after `=` up to the end of the expression is a default value.
///
/// Handles call expressions (`getRootElement()`), arithmetic
/// (`vehiclesDistance * 2.14`) and quoted strings that contain delimiters
/// (`"world,vehicle"`).
pub fn default_values(mut tokens: Vec<SignatureToken>, code: &str) -> Result<Vec<SignatureToken>> {
    for index in 0..tokens.len() {
        if !tokens[index].is(TokenKind::EqualSign) {
            continue;
        }

        let value_index = index + 1;
        match tokens.get(value_index) {
            None => {
                return Err(WikiError::tokenize(
                    format!("Missing default value after '=' at {}", index),
                    code,
                ));
            }
            Some(token) if !token.is(TokenKind::DefaultValue) => {
                expect_undefined(&tokens, value_index, code)?;
            }
            Some(_) => {}
        }
        mark_default(&mut tokens, value_index);

        // Call expression: swallow the argument list.
        if tokens
            .get(index + 2)
            .is_some_and(|t| t.is(TokenKind::ArgumentStart))
        {
            for i in index + 3..tokens.len() {
                let closes = tokens[i].is(TokenKind::ArgumentEnd);
                mark_default(&mut tokens, i);
                if closes {
                    break;
                }
            }
        }

        // Expression tail, up to the next separator.
        for i in index + 2..tokens.len() {
            if tokens[i].kind.is_separator() {
                break;
            }
            mark_default(&mut tokens, i);
        }

        // Quoted string: up to the closing quote regardless of separators.
        if tokens[value_index].value == "\"" {
            for i in index + 2..tokens.len() {
                if tokens[i].value == "\"" {
                    break;
                }
                mark_default(&mut tokens, i);
            }
        }
    }

    Ok(tokens)
}

/// Inside the brackets, each position reads `type name`. A union sign while
/// a name is expected means another type follows (`string/table value`).
pub fn argument_types(mut tokens: Vec<SignatureToken>, code: &str) -> Result<Vec<SignatureToken>> {
    let mut inside = false;

    for index in 0..tokens.len() {
        match tokens[index].kind {
            TokenKind::ArgumentStart => inside = true,
            TokenKind::ArgumentEnd => inside = false,
            _ => {}
        }
        if !inside {
            continue;
        }

        let kind = tokens[index].kind;
        let next = tokens.get(index + 1).map(|t| t.kind);
        match kind {
            TokenKind::CommaSign | TokenKind::ArgumentStart => {}
            TokenKind::TypeUnionSign if next == Some(TokenKind::Undefined) => {}
            _ => continue,
        }
        if next == Some(TokenKind::ArgumentEnd) {
            break;
        }

        let mut current = TokenKind::ArgumentType;
        for i in index + 1..tokens.len() {
            match tokens[i].kind {
                TokenKind::OptionalStart | TokenKind::OptionalEnd => continue,
                TokenKind::CommaSign | TokenKind::VarargsSign | TokenKind::ArgumentEnd => break,
                TokenKind::TypeUnionSign if current == TokenKind::ArgumentName => {
                    current = TokenKind::ArgumentType;
                    continue;
                }
                _ => {}
            }

            expect_undefined(&tokens, i, code)?;
            tokens[i].kind = current;
            if current == TokenKind::ArgumentType {
                current = TokenKind::ArgumentName;
            } else {
                break;
            }
        }
    }

    Ok(tokens)
}

/// `[arguments...]`: a lone word before `...` names the argument.
pub fn varargs_names(mut tokens: Vec<SignatureToken>, _code: &str) -> Result<Vec<SignatureToken>> {
    for index in 1..tokens.len() {
        if tokens[index].is(TokenKind::VarargsSign) && tokens[index - 1].is(TokenKind::ArgumentType)
        {
            tokens[index - 1].kind = TokenKind::ArgumentName;
        }
    }
    Ok(tokens)
}

/// `int amount/weapon/model`: names joined by union signs are one name.
///
/// A union sign after a name only starts a new typed argument when a name
/// follows the type (`string value / int theNumber`). Otherwise the words
/// and signs up to the next separator are folded into the name.
pub fn fuse_name_unions(mut tokens: Vec<SignatureToken>, _code: &str) -> Result<Vec<SignatureToken>> {
    let mut index = 1usize;
    while index < tokens.len() {
        if !(tokens[index].is(TokenKind::TypeUnionSign)
            && tokens[index - 1].is(TokenKind::ArgumentName))
        {
            index += 1;
            continue;
        }

        let mut i = index + 1;
        while i < tokens.len() {
            if tokens[i].kind.is_separator() {
                break;
            }
            let following = tokens.get(i + 1).map(|t| t.kind);
            if following == Some(TokenKind::ArgumentName) {
                i += 2;
                continue;
            }

            tokens[i].kind = TokenKind::ArgumentName;
            tokens[index].kind = TokenKind::ArgumentName;
            match following {
                Some(kind) if !kind.is_separator() => {
                    tokens[i + 1].kind = TokenKind::ArgumentName;
                    i += 2;
                }
                _ => {
                    i += 2;
                    break;
                }
            }
        }
        index = i;
    }
    Ok(tokens)
}

/// Glue fragments of default values and names back together.
pub fn concat(tokens: Vec<SignatureToken>, _code: &str) -> Result<Vec<SignatureToken>> {
    Ok(concat_neighbours(
        tokens,
        &[TokenKind::DefaultValue, TokenKind::ArgumentName],
    ))
}

/// Structural checks on the finished token list.
pub fn final_check(tokens: &[SignatureToken], code: &str) -> Result<()> {
    let opens = count_kind(tokens, TokenKind::ArgumentStart);
    let closes = count_kind(tokens, TokenKind::ArgumentEnd);
    if opens != 1 {
        return Err(WikiError::tokenize(
            format!("Expected one open bracket, found {}", opens),
            code,
        ));
    }
    if closes != 1 {
        return Err(WikiError::tokenize(
            format!("Expected one close bracket, found {}", closes),
            code,
        ));
    }
    let open_at = tokens.iter().position(|t| t.is(TokenKind::ArgumentStart));
    let close_at = tokens.iter().position(|t| t.is(TokenKind::ArgumentEnd));
    if open_at > close_at {
        return Err(WikiError::tokenize("')' comes before '('", code));
    }

    if let Some(token) = tokens.iter().find(|t| t.is(TokenKind::Undefined)) {
        return Err(WikiError::tokenize(
            format!("Unclassified token '{}'", token.value),
            code,
        ));
    }

    let names = count_kind(tokens, TokenKind::FunctionName);
    if names != 1 {
        return Err(WikiError::tokenize(
            format!("Expected one function name, found {}", names),
            code,
        ));
    }

    for (index, _) in tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is(TokenKind::ArgumentType))
    {
        check_type_pattern(tokens, index, code)?;
    }

    Ok(())
}

/// `ArgumentType (TypeUnionSign ArgumentType)* ArgumentName`, skipping
/// optional brackets.
fn check_type_pattern(tokens: &[SignatureToken], start: usize, code: &str) -> Result<()> {
    let mut expected = TokenKind::ArgumentType;
    for token in &tokens[start..] {
        match token.kind {
            TokenKind::OptionalStart | TokenKind::OptionalEnd => continue,
            TokenKind::TypeUnionSign if expected == TokenKind::ArgumentName => {
                expected = TokenKind::ArgumentType;
                continue;
            }
            kind if kind != expected => {
                return Err(WikiError::tokenize(
                    format!(
                        "Expected {} after argument type, got {}:'{}'",
                        expected, kind, token.value
                    ),
                    code,
                ));
            }
            _ => {}
        }
        if expected == TokenKind::ArgumentName {
            return Ok(());
        }
        expected = TokenKind::ArgumentName;
    }
    Err(WikiError::tokenize(
        format!("Argument type at {} has no name", start),
        code,
    ))
}
