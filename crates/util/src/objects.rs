//! Option map comparison and merging.
//!
//! Option maps are `serde_json::Value`s: `Value::Object` is a plain map and
//! `Value::Null` stands for an absent argument. Values inside maps are
//! compared with [`strict_equal`], which treats arrays and objects as
//! references: two maps holding structurally equal but distinct nested
//! objects are not equal.

use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::ptr;
use thiserror::Error;

/// Errors produced by [`object_shadows`] and [`merge_objects`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("Too few arguments to merge_objects()")]
    TooFewArguments,
    #[error("Bad argument to merge_objects() at position {index}")]
    BadArgument { index: usize },
    #[error("Expected object")]
    ExpectedObject,
}

/// Strict equality of two values.
///
/// Scalars compare by value, arrays and objects by address. Numbers compare
/// numerically, so `1` equals `1.0`.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => ptr::eq(a, b),
        _ => false,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        a.as_f64() == b.as_f64()
    } else {
        a == b
    }
}

/// Returns true if `value` is a map with at least one key.
pub fn is_non_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.is_empty())
}

/// Compares two option maps.
///
/// Returns true if both arguments are [`strict_equal`], or if both are maps
/// with identical key sets whose values are [`strict_equal`]. Scalars thus
/// compare by value, everything else that is not a map only to itself.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use aux_util::objects::compare_objects;
///
/// assert!(compare_objects(&json!({"a": 1, "b": "x"}), &json!({"b": "x", "a": 1})));
/// assert!(!compare_objects(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
/// assert!(!compare_objects(&json!({"a": {}}), &json!({"a": {}})));
/// assert!(compare_objects(&json!("gain"), &json!("gain")));
/// ```
pub fn compare_objects(a: &Value, b: &Value) -> bool {
    if strict_equal(a, b) {
        return true;
    }

    let (Value::Object(a), Value::Object(b)) = (a, b) else {
        return false;
    };

    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .all(|(key, val_a)| b.get(key).is_some_and(|val_b| strict_equal(val_a, val_b)))
}

fn map_shadows(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    ptr::eq(a, b) || a.keys().all(|key| b.contains_key(key))
}

/// Returns true if `b` shadows `a`, i.e. merging `a` and then `b` results in
/// a map equal to `b`. Only key presence matters, values are not compared.
///
/// # Errors
///
/// Returns [`ObjectError::ExpectedObject`] if either argument is not a map.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use aux_util::objects::object_shadows;
///
/// assert_eq!(object_shadows(&json!({"a": 1}), &json!({"a": 2, "b": 3})), Ok(true));
/// assert_eq!(object_shadows(&json!({"a": 1, "c": 0}), &json!({"a": 2})), Ok(false));
/// assert!(object_shadows(&json!(1), &json!({})).is_err());
/// ```
pub fn object_shadows(a: &Value, b: &Value) -> Result<bool, ObjectError> {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => Ok(map_shadows(a, b)),
        _ => Err(ObjectError::ExpectedObject),
    }
}

/// Collects the non-empty maps from `args` together with the argument they
/// were borrowed from, rejecting non-map arguments.
fn filter_null_or_empty<'a>(
    args: &[&'a Value],
) -> Result<Vec<(&'a Value, &'a Map<String, Value>)>, ObjectError> {
    let mut maps = Vec::with_capacity(args.len());
    for (index, &arg) in args.iter().enumerate() {
        match arg {
            Value::Null => {}
            Value::Object(map) if is_non_empty_object(arg) => maps.push((arg, map)),
            Value::Object(_) => {}
            _ => return Err(ObjectError::BadArgument { index }),
        }
    }
    Ok(maps)
}

/// Merges option maps left to right, later arguments overriding earlier ones.
///
/// Null arguments and empty maps are ignored. Before allocating, arguments
/// which cannot contribute a key are removed: repeated arguments and maps
/// shadowed by a later argument (see [`object_shadows`]). If a single map
/// remains it is returned borrowed, so merging unchanged option maps again
/// never allocates.
///
/// # Errors
///
/// Returns [`ObjectError::TooFewArguments`] for an empty argument list and
/// [`ObjectError::BadArgument`] for an argument which is neither null nor a
/// map.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use serde_json::{json, Value};
/// use aux_util::objects::merge_objects;
///
/// let foo = json!({"foo": 1});
/// let null = Value::Null;
///
/// let merged = merge_objects(&[&null, &foo, &null]).unwrap();
/// assert!(matches!(merged, Cow::Borrowed(v) if std::ptr::eq(v, &foo)));
///
/// let bar = json!({"bar": 2});
/// let merged = merge_objects(&[&foo, &bar]).unwrap();
/// assert_eq!(merged.into_owned(), json!({"foo": 1, "bar": 2}));
/// ```
pub fn merge_objects<'a>(args: &[&'a Value]) -> Result<Cow<'a, Value>, ObjectError> {
    if args.is_empty() {
        return Err(ObjectError::TooFewArguments);
    }

    let maps = filter_null_or_empty(args)?;

    // Walk backwards so that every kept map is only compared against maps
    // which come after it and are kept themselves.
    let mut kept: Vec<usize> = Vec::with_capacity(maps.len());
    for (i, (_, map)) in maps.iter().enumerate().rev() {
        let shadowed = kept.iter().any(|&j| map_shadows(map, maps[j].1));
        if !shadowed {
            kept.push(i);
        }
    }
    kept.reverse();

    match kept.as_slice() {
        [] => Ok(Cow::Owned(Value::Object(Map::new()))),
        &[only] => Ok(Cow::Borrowed(maps[only].0)),
        many => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "merge_objects.allocate",
                args = args.len(),
                merged = many.len()
            );
            let mut merged = Map::new();
            for &i in many {
                for (key, value) in maps[i].1 {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Ok(Cow::Owned(Value::Object(merged)))
        }
    }
}
