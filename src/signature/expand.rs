//! Overload expansion.
//!
//! `fun(a?: int, b: int)` cannot be declared as-is in most targets, since an
//! optional parameter may not precede a required one. It is split into
//! `fun(a: int, b: int)` and `fun(b: int)`.

use std::collections::VecDeque;

use crate::signature::types::{FunctionArgument, FunctionSignature};

fn is_optional_position(group: &[FunctionArgument]) -> bool {
    group.iter().any(FunctionArgument::is_optional)
}

/// Split every optional run that precedes a required position.
///
/// `signature` is updated in place (the run becomes required). The variants
/// with the run removed are returned in discovery order.
fn split_optional_runs(signature: &mut FunctionSignature) -> Vec<FunctionSignature> {
    let mut variants = Vec::new();
    let mut first_optional: Option<usize> = None;

    for index in 0..signature.arguments.arguments.len() {
        if is_optional_position(&signature.arguments.arguments[index]) {
            first_optional.get_or_insert(index);
            continue;
        }
        let Some(first) = first_optional.take() else {
            continue;
        };

        let mut variant = signature.clone();
        variant.arguments.arguments.drain(first..index);
        variants.push(variant);

        for group in &mut signature.arguments.arguments[first..index] {
            for argument in group.iter_mut() {
                if let Some(argument_type) = argument.argument_type.as_mut() {
                    argument_type.is_optional = false;
                }
            }
        }
    }

    variants
}

/// Expand a signature into the overloads needed to express it without an
/// optional argument before a required one.
///
/// The first element is always the input signature. Untyped placeholders
/// (`[arguments...]`) count as optional but cannot be made required, so they
/// stay untyped.
pub fn expand_signature(signature: FunctionSignature) -> Vec<FunctionSignature> {
    let mut queue = VecDeque::from([signature]);
    let mut expanded = Vec::new();

    while let Some(mut current) = queue.pop_front() {
        queue.extend(split_optional_runs(&mut current));
        expanded.push(current);
    }

    expanded
}
