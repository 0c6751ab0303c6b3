//! Key-path codec used by the put-away API.
//!
//! Requests are sent with nested objects collapsed into dotted keys and arrays into bracketed
//! indices (`putawayItems[0].product.id`); responses may come back in the same shape and are
//! rebuilt into nested JSON before being deserialized.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Collapses nested objects and arrays of a JSON object into path keys.
///
/// Empty objects and arrays stay as leaf values so that e.g. `"splitItems": []` still reaches
/// the server. Non-object input is returned as is.
pub fn flatten_request(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                flatten_into(&mut out, key.clone(), value);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn flatten_into(out: &mut Map<String, Value>, path: String, value: &Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, value) in map {
                flatten_into(out, format!("{path}.{key}"), value);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, value) in items.iter().enumerate() {
                flatten_into(out, format!("{path}[{index}]"), value);
            }
        }
        _ => {
            out.insert(path, value.clone());
        }
    }
}

/// Rebuilds nested JSON from path keys. Already nested input passes through unchanged.
///
/// Indices must be dense: `items[2]` without `items[1]` is an error, as is any index past the
/// end of the array being rebuilt.
pub fn parse_response(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                entries.push((parse_path(&key)?, key, value));
            }
            // numeric index order: "a[2]" before "a[10]"
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut root = Value::Object(Map::new());
            for (segments, key, value) in entries {
                let value = parse_response(value)?;
                insert_at(&mut root, &segments, value, &key)?;
            }
            Ok(root)
        }
        Value::Array(items) => items
            .into_iter()
            .map(parse_response)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Key(String),
    Index(usize),
}

fn parse_path(path: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut name = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !name.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut name)));
                } else if !matches!(segments.last(), Some(Segment::Index(_))) {
                    bail!("empty segment in key '{path}'");
                }
            }
            '[' => {
                if !name.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut name)));
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        _ => bail!("malformed index in key '{path}'"),
                    }
                }
                let index = digits
                    .parse()
                    .with_context(|| format!("malformed index in key '{path}'"))?;
                segments.push(Segment::Index(index));
            }
            _ => name.push(c),
        }
    }

    if !name.is_empty() {
        segments.push(Segment::Key(name));
    }
    if segments.is_empty() {
        bail!("empty key");
    }
    Ok(segments)
}

fn empty_container(next: &Segment) -> Value {
    match next {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) => Value::Array(Vec::new()),
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn insert_at(target: &mut Value, segments: &[Segment], value: Value, key: &str) -> Result<()> {
    let Some((first, rest)) = segments.split_first() else {
        bail!("empty key");
    };

    let slot = match (first, target) {
        (Segment::Key(name), Value::Object(map)) => {
            if rest.is_empty() {
                // a kept-empty container must not wipe entries filled from longer keys
                let keep_existing = is_empty_container(&value)
                    && map.get(name).is_some_and(|v| v.is_object() || v.is_array());
                if !keep_existing {
                    map.insert(name.clone(), value);
                }
                return Ok(());
            }
            map.entry(name.clone())
                .or_insert_with(|| empty_container(&rest[0]))
        }
        (Segment::Index(index), Value::Array(items)) => {
            if *index > items.len() {
                bail!("index in key '{key}' skips past the end of the array");
            }
            if *index == items.len() {
                items.push(Value::Null);
            }
            if rest.is_empty() {
                items[*index] = value;
                return Ok(());
            }
            let slot = &mut items[*index];
            if slot.is_null() {
                *slot = empty_container(&rest[0]);
            }
            slot
        }
        _ => bail!("key '{key}' conflicts with another value at the same path"),
    };

    insert_at(slot, rest, value, key)
}
