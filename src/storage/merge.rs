use serde_json::Value;

use super::entities::DayRecord;

/// Fills everything `stored` lacks from `defaults`. Nested objects are merged field by field at
/// any depth, so a group written before a leaf was added to it still gains that leaf. A stored
/// `null` never hides a default, and keys unknown to `defaults` are carried over untouched.
pub fn merge_with_defaults(defaults: &Value, stored: &Value) -> Value {
    match (defaults, stored) {
        (Value::Object(defaults), Value::Object(stored)) => {
            let mut merged = defaults.clone();
            for (key, value) in stored {
                let next = match defaults.get(key) {
                    Some(default) => merge_with_defaults(default, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (defaults, Value::Null) => defaults.clone(),
        (_, stored) => stored.clone(),
    }
}

/// Brings a stored record up to the current [DayRecord] shape. The date always matches the key
/// the record was stored under. A stored field of the wrong type reads as its default, only a
/// record that isn't an object at all is rejected.
pub fn upgrade_record(date: &str, stored: &Value) -> Result<DayRecord, serde_json::Error> {
    let defaults = serde_json::to_value(DayRecord::new(date))?;
    let mut merged = merge_with_defaults(&defaults, stored);
    if let Value::Object(fields) = &mut merged {
        fields.insert("date".into(), Value::String(date.into()));
    }
    serde_json::from_value(merged)
}
