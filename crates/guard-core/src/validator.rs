//! Constraint checking.
//!
//! [`validate`] checks every bound argument that has a resolved constraint and
//! returns one [`Violation`] per failing argument. It never short-circuits.

use crate::binder::{ArgumentOrigin, BoundArgument, BoundArguments};
use crate::constraints::{Constraint, ConstraintMap, ConstraintSource};
use crate::summary::summarize;
use guard_types::descriptor::TYPE_SET_SEPARATOR;
use serde::Serialize;

/// One argument that failed its constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub parameter: String,
    pub origin: ArgumentOrigin,
    /// Labels of the acceptable types, in constraint order.
    pub expected: Vec<String>,
    pub actual_type: String,
    /// Bounded preview from [`summarize`].
    pub preview: String,
    pub source: ConstraintSource,
}

impl Violation {
    pub fn is_positional(&self) -> bool {
        matches!(self.origin, ArgumentOrigin::Positional { .. })
    }

    /// 1-based position for positional arguments.
    pub fn position(&self) -> Option<usize> {
        match self.origin {
            ArgumentOrigin::Positional { position } => Some(position),
            _ => None,
        }
    }

    pub fn expected_label(&self) -> String {
        self.expected.join(TYPE_SET_SEPARATOR)
    }

    /// `'name' (position N)`, `'name' (named argument)` or `'name' (default value)`.
    pub fn parameter_identity(&self) -> String {
        match self.origin {
            ArgumentOrigin::Positional { position } => {
                format!("'{}' (position {})", self.parameter, position)
            }
            ArgumentOrigin::Named => format!("'{}' (named argument)", self.parameter),
            ArgumentOrigin::Default => format!("'{}' (default value)", self.parameter),
        }
    }
}

fn constraint_for<'c>(
    constraints: &'c ConstraintMap,
    argument: &BoundArgument<'_>,
) -> Option<&'c Constraint> {
    if argument.declared {
        constraints.get(&argument.name)
    } else {
        constraints.extras()
    }
}

/// Check every bound argument against its constraint.
pub fn validate(constraints: &ConstraintMap, bound: &BoundArguments<'_>) -> Vec<Violation> {
    let mut violations = Vec::new();

    for argument in bound.iter() {
        let Some(constraint) = constraint_for(constraints, argument) else {
            continue;
        };
        let value = argument.value;
        if value.is_none() && constraint.types.contains_null() {
            continue;
        }
        if constraint.types.accepts(value) {
            continue;
        }
        violations.push(Violation {
            parameter: argument.name.clone(),
            origin: argument.origin,
            expected: constraint.types.labels(),
            actual_type: value.type_label().to_string(),
            preview: summarize(value),
            source: constraint.source,
        });
    }

    violations
}
