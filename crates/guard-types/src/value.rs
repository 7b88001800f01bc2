//! Dynamic argument values.
//!
//! Guarded callables receive their arguments as [`Value`]s. The enum covers the
//! scalar and container shapes a contract can talk about, plus user-defined
//! records (values with a field mapping) and type objects (what a class-method
//! receiver is bound to).

use std::fmt;

/// A runtime argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value entries in insertion order.
    Dict(Vec<(Value, Value)>),
    Record(Record),
    /// A type object, e.g. the value bound to a class-method receiver.
    Class(String),
    /// Any other host value, carried as its type name and default representation.
    Opaque { type_name: String, repr: String },
}

/// A user-defined record: a named type exposing a field mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub type_name: String,
    /// Ancestor type names, nearest first. Used for subtype checks.
    pub bases: Vec<String>,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare an ancestor type.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Add a field to the record's mapping.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Whether this record is an instance of `type_name` (itself or an ancestor).
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.bases.iter().any(|base| base == type_name)
    }

    /// Render the field mapping as `{'name': value, ...}`.
    pub fn fields_repr(&self) -> String {
        let entries: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}: {}", quote_str(name), value.repr()))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut members: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Value::Set(members)
    }

    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn class(name: impl Into<String>) -> Self {
        Value::Class(name.into())
    }

    pub fn opaque(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Value::Opaque {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The runtime type label of this value (`int`, `str`, a record's type name, ...).
    pub fn type_label(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Record(record) => &record.type_name,
            Value::Class(_) => "type",
            Value::Opaque { type_name, .. } => type_name,
        }
    }

    /// Element or character count for containers and text.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items.len()),
            Value::Dict(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Canonical representation: strings quoted, containers bracketed.
    pub fn repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_repr(*f),
            Value::Str(s) => quote_str(s),
            Value::List(items) => format!("[{}]", join_repr(items)),
            Value::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Value::Tuple(items) => format!("({})", join_repr(items)),
            Value::Set(items) if items.is_empty() => "set()".to_string(),
            Value::Set(items) => format!("{{{}}}", join_repr(items)),
            Value::Dict(entries) => dict_repr(entries),
            Value::Record(record) => {
                let fields: Vec<String> = record
                    .fields
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value.repr()))
                    .collect();
                format!("{}({})", record.type_name, fields.join(", "))
            }
            Value::Class(name) => format!("<class '{}'>", name),
            Value::Opaque { repr, .. } => repr.clone(),
        }
    }
}

impl fmt::Display for Value {
    /// Text form: strings render bare, everything else as [`Value::repr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

/// Render dict entries as `{k: v, ...}`.
pub fn dict_repr(entries: &[(Value, Value)]) -> String {
    let rendered: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
        .collect();
    format!("{{{}}}", rendered.join(", "))
}

fn join_repr(items: &[Value]) -> String {
    items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
}

fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn float_repr(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let label = if f > 0.0 { "inf" } else { "-inf" };
        label.to_string()
    } else if let Some((mantissa, exponent)) = scientific_parts(f) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

/// Shortest mantissa and decimal exponent for floats that print in exponent
/// form: exponents below -4 or from 16 upward.
fn scientific_parts(f: f64) -> Option<(String, i32)> {
    if f == 0.0 {
        return None;
    }
    let sci = format!("{:e}", f);
    let (mantissa, exponent) = sci.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    (exponent < -4 || exponent >= 16).then(|| (mantissa.to_string(), exponent))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

/// Key marking a JSON object as a record.
pub const RECORD_TYPE_KEY: &str = "__type__";
/// Optional key listing a record's ancestor type names.
pub const RECORD_BASES_KEY: &str = "__bases__";
/// Key marking a JSON object as a type object, e.g. `{"__class__": "Calculator"}`.
pub const CLASS_KEY: &str = "__class__";

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                if let Some(class) = map.get(CLASS_KEY).and_then(|c| c.as_str()) {
                    Value::Class(class.to_string())
                } else if let Some(type_name) = map.get(RECORD_TYPE_KEY).and_then(|t| t.as_str()) {
                    let bases = map
                        .get(RECORD_BASES_KEY)
                        .and_then(|b| b.as_array())
                        .map(|b| {
                            b.iter()
                                .filter_map(|base| base.as_str().map(ToOwned::to_owned))
                                .collect()
                        })
                        .unwrap_or_default();
                    let fields = map
                        .iter()
                        .filter(|(key, _)| *key != RECORD_TYPE_KEY && *key != RECORD_BASES_KEY)
                        .map(|(key, value)| (key.clone(), Value::from(value)))
                        .collect();
                    Value::Record(Record {
                        type_name: type_name.to_string(),
                        bases,
                        fields,
                    })
                } else {
                    Value::Dict(
                        map.iter()
                            .map(|(key, value)| (Value::Str(key.clone()), Value::from(value)))
                            .collect(),
                    )
                }
            }
        }
    }
}
