//! Parameter annotation parsing.
//!
//! Supports the textual annotation forms a signature can be registered with:
//! - Single types: `int`, `Point`, `list[int]`
//! - Unions: `int | str`, `Union[int, str]`
//! - Optionals: `Optional[float]`, `float | None`
//!
//! Generic parameters (`list[int]`) are accepted but only the outer type is kept.

use crate::descriptor::{TypeDescriptor, TypeSet};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A declared parameter annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Single(TypeDescriptor),
    Union(Vec<TypeDescriptor>),
    /// A union with a null arm. Holds the non-null arms only.
    Optional(Vec<TypeDescriptor>),
}

/// Failure to parse an annotation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid annotation '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for AnnotationError {}

impl Annotation {
    pub fn single(descriptor: TypeDescriptor) -> Self {
        Annotation::Single(descriptor)
    }

    pub fn union<I: IntoIterator<Item = TypeDescriptor>>(arms: I) -> Self {
        Self::from_arms(arms.into_iter().collect())
    }

    pub fn optional<I: IntoIterator<Item = TypeDescriptor>>(arms: I) -> Self {
        let mut arms: Vec<TypeDescriptor> = arms.into_iter().collect();
        arms.push(TypeDescriptor::NoneType);
        Self::from_arms(arms)
    }

    /// Normalize a flat arm list: a lone arm is `Single`, a null arm makes it `Optional`.
    fn from_arms(arms: Vec<TypeDescriptor>) -> Self {
        let mut unique: Vec<TypeDescriptor> = Vec::with_capacity(arms.len());
        for arm in arms {
            if !unique.contains(&arm) {
                unique.push(arm);
            }
        }

        let nullable = unique.contains(&TypeDescriptor::NoneType) && unique.len() > 1;
        if nullable {
            unique.retain(|arm| *arm != TypeDescriptor::NoneType);
            return Annotation::Optional(unique);
        }
        if unique.len() == 1 {
            return Annotation::Single(unique.remove(0));
        }
        Annotation::Union(unique)
    }

    /// Whether a null value satisfies this annotation.
    pub fn is_nullable(&self) -> bool {
        match self {
            Annotation::Single(descriptor) => *descriptor == TypeDescriptor::NoneType,
            Annotation::Union(arms) => arms.contains(&TypeDescriptor::NoneType),
            Annotation::Optional(_) => true,
        }
    }

    /// Expand into the type-set used for validation.
    ///
    /// Unions yield one member per arm. Optionals yield the non-null arms
    /// followed by an explicit `NoneType` member, which is rendered in
    /// diagnostics like any other member.
    pub fn expand(&self) -> TypeSet {
        match self {
            Annotation::Single(descriptor) => TypeSet::from(descriptor.clone()),
            Annotation::Union(arms) => arms.iter().cloned().collect(),
            Annotation::Optional(arms) => arms
                .iter()
                .cloned()
                .chain(std::iter::once(TypeDescriptor::NoneType))
                .collect(),
        }
    }

    /// Parse an annotation string.
    pub fn parse(input: &str) -> Result<Self, AnnotationError> {
        let arms = parse_arms(input).map_err(|reason| AnnotationError {
            input: input.to_string(),
            reason,
        })?;
        Ok(Self::from_arms(arms))
    }
}

impl From<TypeDescriptor> for Annotation {
    fn from(descriptor: TypeDescriptor) -> Self {
        Annotation::Single(descriptor)
    }
}

impl std::str::FromStr for Annotation {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Annotation::parse(s)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Single(descriptor) => write!(f, "{}", descriptor),
            Annotation::Union(arms) => write!(f, "{}", join_labels(arms)),
            Annotation::Optional(arms) => write!(f, "Optional[{}]", join_labels(arms)),
        }
    }
}

impl<'de> Deserialize<'de> for Annotation {
    /// Accepts an annotation string or an array of type labels (a union).
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Arms(Vec<TypeDescriptor>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Annotation::parse(&text).map_err(serde::de::Error::custom),
            Raw::Arms(arms) if arms.is_empty() => {
                Err(serde::de::Error::custom("annotation arm list is empty"))
            }
            Raw::Arms(arms) => Ok(Annotation::union(arms)),
        }
    }
}

fn join_labels(arms: &[TypeDescriptor]) -> String {
    arms.iter()
        .map(|arm| arm.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flatten an annotation string into its union arms.
fn parse_arms(input: &str) -> Result<Vec<TypeDescriptor>, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty annotation".to_string());
    }
    check_brackets(s)?;

    let pipe_parts = split_top_level(s, '|');
    if pipe_parts.len() > 1 {
        let mut arms = Vec::new();
        for part in pipe_parts {
            arms.extend(parse_arms(part)?);
        }
        return Ok(arms);
    }

    if let Some(inner) = strip_wrapper(s, "Optional") {
        let mut arms = parse_arms(inner)?;
        arms.push(TypeDescriptor::NoneType);
        return Ok(arms);
    }

    if let Some(inner) = strip_wrapper(s, "Union") {
        let mut arms = Vec::new();
        for part in split_top_level(inner, ',') {
            arms.extend(parse_arms(part)?);
        }
        return Ok(arms);
    }

    let descriptor = s.parse::<TypeDescriptor>()?;
    Ok(vec![descriptor])
}

/// `Name[inner]` -> `inner`.
fn strip_wrapper<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'))
}

fn check_brackets(s: &str) -> Result<(), String> {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced ']'".to_string());
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unclosed '['".to_string());
    }
    Ok(())
}

/// Split on `sep` where it is not nested inside brackets.
///
/// Given "int, dict[str, int], None" and ',', returns
/// ["int", "dict[str, int]", "None"].
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                result.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    result.push(s[start..].trim());
    result
}
