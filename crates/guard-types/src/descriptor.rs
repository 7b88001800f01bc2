//! Type descriptors and type-sets.
//!
//! A [`TypeDescriptor`] is a tag a parameter can be checked against. Membership
//! is tag comparison plus a handful of fixed subtype rules (see
//! [`TypeDescriptor::accepts`]); there is no open-ended runtime type identity.

use crate::type_parsing::Annotation;
use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single acceptable type for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// The null type. Only [`Value::None`] is a member.
    NoneType,
    Bool,
    /// Integers. `bool` values are members too.
    Int,
    Float,
    /// Any numeric value: `int`, `float` or `bool`.
    Number,
    Str,
    List,
    Tuple,
    Set,
    Dict,
    /// Type objects.
    Type,
    /// Every value is a member.
    Object,
    /// A user-defined record type, matched by name or ancestor name.
    Named(String),
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }

    /// Human label used in diagnostics.
    pub fn label(&self) -> &str {
        match self {
            TypeDescriptor::NoneType => "NoneType",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::Int => "int",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Number => "number",
            TypeDescriptor::Str => "str",
            TypeDescriptor::List => "list",
            TypeDescriptor::Tuple => "tuple",
            TypeDescriptor::Set => "set",
            TypeDescriptor::Dict => "dict",
            TypeDescriptor::Type => "type",
            TypeDescriptor::Object => "object",
            TypeDescriptor::Named(name) => name,
        }
    }

    /// Whether `value` is an instance of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeDescriptor::Object, _) => true,
            (TypeDescriptor::NoneType, Value::None) => true,
            (TypeDescriptor::Bool, Value::Bool(_)) => true,
            (TypeDescriptor::Int, Value::Int(_) | Value::Bool(_)) => true,
            (TypeDescriptor::Float, Value::Float(_)) => true,
            (TypeDescriptor::Number, Value::Int(_) | Value::Float(_) | Value::Bool(_)) => true,
            (TypeDescriptor::Str, Value::Str(_)) => true,
            (TypeDescriptor::List, Value::List(_)) => true,
            (TypeDescriptor::Tuple, Value::Tuple(_)) => true,
            (TypeDescriptor::Set, Value::Set(_)) => true,
            (TypeDescriptor::Dict, Value::Dict(_)) => true,
            (TypeDescriptor::Type, Value::Class(_)) => true,
            (TypeDescriptor::Named(name), Value::Record(record)) => record.is_instance_of(name),
            (TypeDescriptor::Named(name), Value::Opaque { type_name, .. }) => type_name == name,
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TypeDescriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Generic parameters are not validated, only the outer type.
        let base = s.split('[').next().unwrap_or(s).trim();
        let descriptor = match base {
            "" => return Err(format!("empty type name in '{}'", s)),
            "None" | "NoneType" | "null" => TypeDescriptor::NoneType,
            "bool" => TypeDescriptor::Bool,
            "int" | "integer" => TypeDescriptor::Int,
            "float" => TypeDescriptor::Float,
            "number" | "Number" => TypeDescriptor::Number,
            "str" | "string" => TypeDescriptor::Str,
            "list" | "List" => TypeDescriptor::List,
            "tuple" | "Tuple" => TypeDescriptor::Tuple,
            "set" | "Set" => TypeDescriptor::Set,
            "dict" | "Dict" => TypeDescriptor::Dict,
            "type" | "Type" => TypeDescriptor::Type,
            "object" | "Any" => TypeDescriptor::Object,
            other => TypeDescriptor::Named(other.to_string()),
        };
        Ok(descriptor)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Separator between members in a rendered type-set label.
pub const TYPE_SET_SEPARATOR: &str = " | ";

/// An ordered, duplicate-free collection of acceptable types.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TypeSet(Vec<TypeDescriptor>);

impl TypeSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a member, keeping first-seen order.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        if !self.0.contains(&descriptor) {
            self.0.push(descriptor);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.0.iter()
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.0.contains(descriptor)
    }

    /// Whether the null type is a member.
    pub fn contains_null(&self) -> bool {
        self.contains(&TypeDescriptor::NoneType)
    }

    /// Whether any member accepts `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        self.0.iter().any(|descriptor| descriptor.accepts(value))
    }

    /// Member labels in order.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|d| d.label().to_string()).collect()
    }

    /// Members joined with [`TYPE_SET_SEPARATOR`].
    pub fn label(&self) -> String {
        self.labels().join(TYPE_SET_SEPARATOR)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromIterator<TypeDescriptor> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for descriptor in iter {
            set.insert(descriptor);
        }
        set
    }
}

impl From<TypeDescriptor> for TypeSet {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self(vec![descriptor])
    }
}

impl<const N: usize> From<[TypeDescriptor; N]> for TypeSet {
    fn from(descriptors: [TypeDescriptor; N]) -> Self {
        descriptors.into_iter().collect()
    }
}

impl From<Vec<TypeDescriptor>> for TypeSet {
    fn from(descriptors: Vec<TypeDescriptor>) -> Self {
        descriptors.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for TypeSet {
    /// Accepts a single annotation string (`"int"`, `"int | float"`,
    /// `"Optional[float]"`) or an array of them. Each string goes through
    /// the annotation parser, so bracketed wrappers expand to their members.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let texts = match Raw::deserialize(deserializer)? {
            Raw::One(s) => vec![s],
            Raw::Many(v) => v,
        };
        let mut set = TypeSet::new();
        for text in &texts {
            let annotation = Annotation::parse(text).map_err(serde::de::Error::custom)?;
            for descriptor in annotation.expand().iter() {
                set.insert(descriptor.clone());
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    #[test]
    fn test_bool_is_an_int() {
        assert!(TypeDescriptor::Int.accepts(&Value::Bool(true)));
        assert!(!TypeDescriptor::Bool.accepts(&Value::Int(1)));
    }

    #[test]
    fn test_int_is_not_a_float() {
        assert!(!TypeDescriptor::Float.accepts(&Value::Int(1)));
        assert!(TypeDescriptor::Number.accepts(&Value::Int(1)));
        assert!(TypeDescriptor::Number.accepts(&Value::Float(1.5)));
        assert!(!TypeDescriptor::Number.accepts(&Value::str("1")));
    }

    #[test]
    fn test_named_matches_ancestors() {
        let circle = Value::from(Record::new("Circle").with_base("Shape"));
        assert!(TypeDescriptor::named("Shape").accepts(&circle));
        assert!(TypeDescriptor::named("Circle").accepts(&circle));
        assert!(!TypeDescriptor::named("Square").accepts(&circle));
        assert!(TypeDescriptor::Object.accepts(&circle));
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("int".parse::<TypeDescriptor>(), Ok(TypeDescriptor::Int));
        assert_eq!("None".parse::<TypeDescriptor>(), Ok(TypeDescriptor::NoneType));
        assert_eq!("list[int]".parse::<TypeDescriptor>(), Ok(TypeDescriptor::List));
        assert_eq!("Point".parse::<TypeDescriptor>(), Ok(TypeDescriptor::named("Point")));
        assert!("".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn test_type_set_order_and_label() {
        let set: TypeSet = [
            TypeDescriptor::Int,
            TypeDescriptor::Float,
            TypeDescriptor::Int,
        ]
        .into();
        assert_eq!(set.len(), 2);
        assert_eq!(set.label(), "int | float");
        assert!(!set.contains_null());
    }

    #[test]
    fn test_type_set_deserialize_forms() {
        let single: TypeSet = serde_json::from_str("\"str\"").unwrap();
        assert_eq!(single, TypeSet::from(TypeDescriptor::Str));

        let union: TypeSet = serde_json::from_str("\"int | None\"").unwrap();
        assert!(union.contains_null());
        assert_eq!(union.len(), 2);

        let array: TypeSet = serde_json::from_str("[\"float\", \"Point\"]").unwrap();
        assert_eq!(array.label(), "float | Point");
    }

    #[test]
    fn test_type_set_deserialize_expands_wrappers() {
        let optional: TypeSet = serde_json::from_str("\"Optional[float]\"").unwrap();
        assert_eq!(optional.label(), "float | NoneType");
        assert!(optional.accepts(&Value::Float(1.5)));
        assert!(optional.accepts(&Value::None));

        let union: TypeSet = serde_json::from_str("\"Union[int, str]\"").unwrap();
        assert_eq!(union.label(), "int | str");

        let array: TypeSet = serde_json::from_str("[\"Optional[int]\", \"str\"]").unwrap();
        assert_eq!(array.len(), 3);
        assert!(array.contains(&TypeDescriptor::Str));

        assert!(serde_json::from_str::<TypeSet>("\"Optional[float\"").is_err());
    }
}
