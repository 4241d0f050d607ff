//! Argument editors
//!
//! Pure functions over a call's argument list. `Value::Null` doubles as the
//! "absent" placeholder when a list has to be padded out to a position.

use serde_json::{Map, Value};

/// Dynamic argument list passed to a wrapped target
pub type Args = Vec<Value>;

/// Pad `args` with nulls so that `index` is addressable
pub fn pad_to(args: &mut Args, index: usize) {
    if let Some(len) = index.checked_add(1) {
        if args.len() < len {
            args.resize(len, Value::Null);
        }
    }
}

/// Replace the argument at `index` with `edit(current)`, padding first
///
/// An index that cannot be padded to leaves `args` untouched.
pub fn edit_arg<F>(mut args: Args, index: usize, edit: F) -> Args
where
    F: FnOnce(Value) -> Value,
{
    pad_to(&mut args, index);
    if let Some(slot) = args.get_mut(index) {
        let current = std::mem::take(slot);
        *slot = edit(current);
    }
    args
}

/// Insert `value` at `index`, shifting later arguments right
///
/// Short lists are padded with nulls so the value lands exactly at `index`.
pub fn insert_arg(mut args: Args, index: usize, value: Value) -> Args {
    if args.len() < index {
        args.resize(index, Value::Null);
    }
    args.insert(index, value);
    args
}

/// Wrap a single value into a one-element array; arrays pass through
///
/// `null` becomes the empty array.
pub fn arrify(value: Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) => value,
        other => Value::Array(vec![other]),
    }
}

/// Wrap a value into a one-element array, even if it already is one
pub fn pluralize(value: Value) -> Value {
    Value::Array(vec![value])
}

/// Overlay `preset` onto `current`; preset keys win on conflict
///
/// Anything other than an object in `current` counts as the empty mapping, and
/// only object presets contribute keys.
pub fn merge_options(current: Value, preset: &Value) -> Value {
    let mut merged = match current {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(preset) = preset {
        for (key, value) in preset {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

/// Collapse a one-element array to its element
pub fn un_collect(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.pop().unwrap_or(Value::Null),
        other => other,
    }
}
