//! Maps a call site's arguments onto a function's declared parameters.
//!
//! The phases run in a fixed order, and the order is observable through
//! which error a malformed call reports:
//!
//! 1. positional arguments fill positional-or-keyword parameters left to right
//! 2. overflow goes to the variadic collector, or fails
//! 3. unfilled positional-or-keyword parameters take a keyword, else their
//!    default, else fail; a parameter already filled in phase 1 that also
//!    appears as a keyword fails with "multiple values"
//! 4. keyword-only parameters take a keyword, else their default, else fail
//! 5. leftover keywords go to the keyword collector, or fail
//!
//! Shared defaults are bound as handles to the one value built at definition
//! time, so mutations made through a default are visible to later calls.

use tracing::trace;

use pith_ir::{Name, StringInterner};
use pith_value::{
    missing_argument, multiple_values, repeated_keyword, too_many_positional, unexpected_keyword,
    BoundArguments, CallArguments, ErrorValue, ParamKind, Parameter, ParameterSpec, Value,
};

/// Bind `args` to `spec`, producing the callee's initial locals.
///
/// `function` names the callee in error messages.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(function = interner.lookup(function), positional = args.positional.len(), keywords = args.keywords.len())
)]
pub fn bind(
    interner: &StringInterner,
    function: Name,
    spec: &ParameterSpec,
    args: CallArguments,
) -> Result<BoundArguments, ErrorValue> {
    let fname = interner.lookup(function);
    let CallArguments {
        positional,
        keywords,
    } = args;

    for (i, (name, _)) in keywords.iter().enumerate() {
        if keywords[..i].iter().any(|(seen, _)| seen == name) {
            return Err(repeated_keyword(fname, interner.lookup(*name)));
        }
    }

    let params = spec.params();
    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    let mut pool: Vec<Option<(Name, Value)>> = keywords.into_iter().map(Some).collect();

    // Phase 1: positional arguments, left to right.
    let positional_count = spec.positional().len();
    let mut positional = positional.into_iter();
    for slot in slots.iter_mut().take(positional_count) {
        match positional.next() {
            Some(value) => *slot = Some(value),
            None => break,
        }
    }

    // Phase 2: overflow.
    let overflow: Vec<Value> = positional.collect();
    match spec.variadic().and_then(|p| spec.position_of(p.name)) {
        Some(index) => {
            trace!(collected = overflow.len(), "variadic collector");
            slots[index] = Some(Value::tuple(overflow));
        }
        None if !overflow.is_empty() => {
            return Err(too_many_positional(
                fname,
                positional_count,
                positional_count + overflow.len(),
            ));
        }
        None => {}
    }

    // Phase 3: positional-or-keyword parameters not filled by position.
    for (param, slot) in params.iter().zip(slots.iter_mut()).take(positional_count) {
        if slot.is_some() {
            if pool_contains(&pool, param.name) {
                return Err(multiple_values(fname, interner.lookup(param.name)));
            }
            continue;
        }
        *slot = Some(keyword_or_default(interner, fname, param, &mut pool)?);
    }

    // Phase 4: keyword-only parameters.
    for (param, slot) in params.iter().zip(slots.iter_mut()) {
        if param.kind == ParamKind::KeywordOnly {
            *slot = Some(keyword_or_default(interner, fname, param, &mut pool)?);
        }
    }

    // Phase 5: leftover keywords.
    let leftovers: Vec<(Name, Value)> = pool.into_iter().flatten().collect();
    match spec.keyword_collector().and_then(|p| spec.position_of(p.name)) {
        Some(index) => {
            trace!(collected = leftovers.len(), "keyword collector");
            let collected = leftovers
                .into_iter()
                .map(|(name, value)| (Value::string(interner.lookup(name)), value));
            slots[index] = Some(Value::dict_from(collected));
        }
        None => {
            if let Some((name, _)) = leftovers.first() {
                return Err(unexpected_keyword(fname, interner.lookup(*name)));
            }
        }
    }

    let mut bound = BoundArguments::with_capacity(params.len());
    for (param, slot) in params.iter().zip(slots) {
        if let Some(value) = slot {
            bound.push(param.name, value);
        }
    }
    Ok(bound)
}

fn pool_contains(pool: &[Option<(Name, Value)>], name: Name) -> bool {
    pool.iter().flatten().any(|(n, _)| *n == name)
}

fn take_keyword(pool: &mut [Option<(Name, Value)>], name: Name) -> Option<Value> {
    pool.iter_mut()
        .find(|entry| matches!(entry, Some((n, _)) if *n == name))
        .and_then(Option::take)
        .map(|(_, value)| value)
}

fn keyword_or_default(
    interner: &StringInterner,
    fname: &str,
    param: &Parameter,
    pool: &mut [Option<(Name, Value)>],
) -> Result<Value, ErrorValue> {
    if let Some(value) = take_keyword(pool, param.name) {
        return Ok(value);
    }
    match &param.default {
        Some(default) => Ok(default.produce()),
        None => Err(missing_argument(fname, interner.lookup(param.name))),
    }
}
