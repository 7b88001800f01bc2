//! Bounded value previews for diagnostics.
//!
//! [`summarize`] never fails and never produces unbounded output for large
//! containers or long text. The thresholds below are fixed.

use guard_types::value::dict_repr;
use guard_types::Value;

/// Sequences up to this many elements are shown in full.
pub const MAX_FULL_SEQUENCE: usize = 5;
/// Mappings up to this many entries are shown in full.
pub const MAX_FULL_MAPPING: usize = 3;
/// Text up to this many characters is shown in full.
pub const MAX_FULL_TEXT: usize = 50;
/// Elements or entries shown in a truncated preview.
pub const PREVIEW_ITEMS: usize = 3;
/// Characters shown in a truncated text preview.
pub const PREVIEW_CHARS: usize = 47;

/// Render a bounded, human-readable preview of `value`, prefixed by its type label.
pub fn summarize(value: &Value) -> String {
    let type_name = value.type_label();
    match value {
        Value::Record(record) => format!("{}({})", type_name, record.fields_repr()),
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
            if items.len() <= MAX_FULL_SEQUENCE {
                let contents: Vec<String> = items.iter().map(Value::repr).collect();
                format!("{}([{}])", type_name, contents.join(", "))
            } else {
                let head: Vec<String> = items
                    .iter()
                    .take(PREVIEW_ITEMS)
                    .map(ToString::to_string)
                    .collect();
                format!(
                    "{}([{}, ...]) with {} elements",
                    type_name,
                    head.join(", "),
                    items.len()
                )
            }
        }
        Value::Dict(entries) => {
            if entries.len() <= MAX_FULL_MAPPING {
                format!("{}({})", type_name, dict_repr(entries))
            } else {
                format!(
                    "{}({}...) with {} elements",
                    type_name,
                    dict_repr(&entries[..PREVIEW_ITEMS]),
                    entries.len()
                )
            }
        }
        Value::Str(text) => {
            let length = text.chars().count();
            if length <= MAX_FULL_TEXT {
                format!("{}('{}')", type_name, text)
            } else {
                let head: String = text.chars().take(PREVIEW_CHARS).collect();
                format!("{}('{}...') with {} characters", type_name, head, length)
            }
        }
        other => format!("{}({})", type_name, other.repr()),
    }
}
