//! Document-level reconciliation rules
//!
//! These operate on the raw structured document rather than on
//! [`Configuration`](crate::Configuration) because they must cope with values
//! the typed model cannot hold: a negative or textual `max_workers`, a
//! list-valued `prompts`, or a document missing either API key field.

use serde_json::Value;

use crate::{Configuration, Mapping};

pub const API_KEY: &str = "api_key";
pub const API_KEYS: &str = "api_keys";
pub const MAX_WORKERS: &str = "max_workers";
pub const PROMPTS: &str = "prompts";

/// Copy every field of `persisted` over `base`. Persisted values win and
/// fields unknown to `base` are added.
pub fn overlay(base: &mut Mapping, persisted: Mapping) {
    for (field, value) in persisted {
        base.insert(field, value);
    }
}

/// Put back the default of every known field whose persisted value the typed
/// model cannot hold (`"chunk_size": 7000.0`, `"api_key": null`, ...).
///
/// Each field is checked on its own against `defaults`, so one bad value
/// never costs the rest of the document. Unknown fields and `max_workers`
/// are left untouched.
/// Returns the names of the fields that were reset.
pub fn restore_mistyped_fields(doc: &mut Mapping, defaults: &Mapping) -> Vec<String> {
    let mut restored = Vec::new();

    for (field, default_value) in defaults {
        // Owned by the worker-count rule
        if field == MAX_WORKERS {
            continue;
        }
        let Some(value) = doc.get(field) else {
            continue;
        };
        if value == default_value {
            continue;
        }

        let mut trial = defaults.clone();
        trial.insert(field.clone(), value.clone());
        if let Err(e) = Configuration::from_document(trial) {
            tracing::warn!(field = %field, found = %value, error = %e, "Ignoring persisted value of the wrong type, keeping default");
            doc.insert(field.clone(), default_value.clone());
            restored.push(field.clone());
        }
    }

    restored
}

/// Key sync as applied after loading.
///
/// An empty key list is seeded from a non-empty singular key. Otherwise a
/// missing or empty singular key is taken from the head of the list. A
/// singular key that disagrees with a non-empty list is left alone.
pub fn sync_keys_on_load(doc: &mut Mapping) {
    let head = list_head(doc.get(API_KEYS)).cloned();
    let key = non_empty_str(doc.get(API_KEY)).map(str::to_owned);

    match (head, key) {
        (None, Some(key)) => {
            doc.insert(API_KEYS.into(), Value::Array(vec![Value::String(key)]));
        }
        (Some(head), None) => {
            doc.insert(API_KEY.into(), head);
        }
        _ => {}
    }
}

/// Key sync as applied before saving.
///
/// A non-empty key list always dictates the singular key. Without a list, a
/// non-empty singular key becomes a one-element list.
pub fn sync_keys_on_save(doc: &mut Mapping) {
    if let Some(head) = list_head(doc.get(API_KEYS)).cloned() {
        if doc.get(API_KEY) != Some(&head) {
            tracing::debug!("Realigning api_key with the head of api_keys");
            doc.insert(API_KEY.into(), head);
        }
    } else if let Some(key) = non_empty_str(doc.get(API_KEY)).map(str::to_owned) {
        doc.insert(API_KEYS.into(), Value::Array(vec![Value::String(key)]));
    }
}

/// Worker-count rule for loaded documents: anything but a positive integer
/// (including absence) becomes `default_workers`.
pub fn normalize_workers_on_load(doc: &mut Mapping, default_workers: usize) {
    let valid = doc
        .get(MAX_WORKERS)
        .and_then(Value::as_i64)
        .is_some_and(|n| n > 0);

    if !valid {
        tracing::debug!(
            found = ?doc.get(MAX_WORKERS),
            default_workers,
            "Replacing invalid max_workers"
        );
        doc.insert(MAX_WORKERS.into(), Value::from(default_workers));
    }
}

/// Worker-count rule for documents about to be saved.
///
/// Only applies when `max_workers` is present. Integer-like values are
/// coerced (see [`coerce_integer`]) and written back as plain integers;
/// values that do not coerce to a positive integer become `default_workers`.
pub fn normalize_workers_on_save(doc: &mut Mapping, default_workers: usize) {
    let Some(raw) = doc.get(MAX_WORKERS) else {
        return;
    };

    let replacement = match coerce_integer(raw) {
        Some(n) if n > 0 => Value::from(n),
        _ => {
            tracing::debug!(found = ?raw, default_workers, "Replacing invalid max_workers");
            Value::from(default_workers)
        }
    };
    doc.insert(MAX_WORKERS.into(), replacement);
}

/// Collapse a list-valued `prompts` into its first element, or `""` when
/// the list is empty.
pub fn normalize_prompts(doc: &mut Mapping) {
    if let Some(Value::Array(items)) = doc.get(PROMPTS) {
        let first = items
            .first()
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        doc.insert(PROMPTS.into(), first);
    }
}

/// Interpret a JSON value as an integer the way a lenient config editor would.
///
/// Integers pass through, floats are truncated toward zero, strings holding
/// an integer (surrounding whitespace allowed) are parsed and booleans map to
/// 1 and 0. Everything else, including non-finite floats, yields `None`.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn list_head(value: Option<&Value>) -> Option<&Value> {
    value.and_then(Value::as_array).and_then(|items| items.first())
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
