//! Argument binding.
//!
//! Maps one call's positional and named arguments onto parameter names,
//! filling unset parameters from their defaults. Values are borrowed, never
//! copied or modified.

use crate::signature::Signature;
use guard_types::Value;
use serde::Serialize;

/// Arguments of a single call, exactly as the caller supplied them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(positional: Vec<Value>, named: Vec<(String, Value)>) -> Self {
        Self { positional, named }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_args(&self) -> &[(String, Value)] {
        &self.named
    }

    /// Value of a named argument, if supplied.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// How a bound value reached its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArgumentOrigin {
    /// A raw positional slot. `position` is 1-based, counted from the first
    /// non-receiver argument.
    Positional { position: usize },
    Named,
    /// Filled from the parameter's declared default.
    Default,
}

/// One parameter bound to a value for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument<'a> {
    pub name: String,
    pub value: &'a Value,
    pub origin: ArgumentOrigin,
    /// False for arguments that matched no declared parameter.
    pub declared: bool,
}

/// All bound arguments of one call, receiver excluded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundArguments<'a> {
    receiver: Option<&'a Value>,
    arguments: Vec<BoundArgument<'a>>,
}

impl<'a> BoundArguments<'a> {
    /// The value bound to the receiver parameter, if any.
    pub fn receiver(&self) -> Option<&'a Value> {
        self.receiver
    }

    pub fn get(&self, name: &str) -> Option<&BoundArgument<'a>> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundArgument<'a>> {
        self.arguments.iter()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Bind `args` against `signature`.
///
/// Order: positional arguments, then named arguments in call order, then
/// defaults in declaration order. Positional arguments past the declared
/// parameters bind as `arg_<index>`. A parameter supplied both positionally
/// and by name is bound twice so that neither value escapes validation;
/// arity errors are otherwise left to the callable.
pub fn bind<'a>(signature: &'a Signature, args: &'a CallArgs) -> BoundArguments<'a> {
    let params = signature.params();
    let receiver_offset = usize::from(signature.receiver().is_some());
    let mut bound = BoundArguments::default();

    for (index, value) in args.positional().iter().enumerate() {
        let position = index + 1 - receiver_offset;
        match params.get(index) {
            Some(param) if param.is_receiver => bound.receiver = Some(value),
            Some(param) => bound.arguments.push(BoundArgument {
                name: param.name.clone(),
                value,
                origin: ArgumentOrigin::Positional { position },
                declared: true,
            }),
            None => bound.arguments.push(BoundArgument {
                name: format!("arg_{}", index),
                value,
                origin: ArgumentOrigin::Positional { position },
                declared: false,
            }),
        }
    }

    for (name, value) in args.named_args() {
        match signature.param(name) {
            Some(param) if param.is_receiver => {
                bound.receiver.get_or_insert(value);
            }
            declared => bound.arguments.push(BoundArgument {
                name: name.clone(),
                value,
                origin: ArgumentOrigin::Named,
                declared: declared.is_some(),
            }),
        }
    }

    for param in signature.validated_params() {
        let supplied = bound
            .arguments
            .iter()
            .any(|arg| arg.declared && arg.name == param.name);
        if supplied {
            continue;
        }
        if let Some(default) = &param.default {
            bound.arguments.push(BoundArgument {
                name: param.name.clone(),
                value: default,
                origin: ArgumentOrigin::Default,
                declared: true,
            });
        }
    }

    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::ReceiverKind;
    use guard_types::{Record, TypeDescriptor};

    fn power_signature() -> Signature {
        Signature::function("power")
            .param("base", TypeDescriptor::Number)
            .param_with_default("exponent", TypeDescriptor::Int, 2)
            .untyped_with_default("modulo", Value::None)
            .build()
            .unwrap()
    }

    #[test]
    fn test_positional_then_defaults() {
        let sig = power_signature();
        let args = CallArgs::new().arg(3);
        let bound = bind(&sig, &args);

        assert_eq!(bound.len(), 3);
        let base = bound.get("base").unwrap();
        assert_eq!(base.origin, ArgumentOrigin::Positional { position: 1 });
        assert_eq!(*base.value, Value::Int(3));
        assert_eq!(bound.get("exponent").unwrap().origin, ArgumentOrigin::Default);
        assert_eq!(*bound.get("modulo").unwrap().value, Value::None);
    }

    #[test]
    fn test_named_suppresses_default() {
        let sig = power_signature();
        let args = CallArgs::new().arg(3).named("exponent", 5);
        let bound = bind(&sig, &args);

        let exponent = bound.get("exponent").unwrap();
        assert_eq!(exponent.origin, ArgumentOrigin::Named);
        assert_eq!(*exponent.value, Value::Int(5));
        assert_eq!(bound.iter().filter(|a| a.name == "exponent").count(), 1);
    }

    #[test]
    fn test_receiver_excluded_and_positions_shifted() {
        let sig = Signature::method("add", ReceiverKind::Instance)
            .untyped("self")
            .param("a", TypeDescriptor::Int)
            .param("b", TypeDescriptor::Int)
            .build()
            .unwrap();
        let calc = Value::from(Record::new("Calculator"));
        let args = CallArgs::new().arg(calc.clone()).arg(1).arg(2);
        let bound = bind(&sig, &args);

        assert_eq!(bound.receiver(), Some(&calc));
        assert!(bound.get("self").is_none());
        assert_eq!(
            bound.get("b").unwrap().origin,
            ArgumentOrigin::Positional { position: 2 }
        );
    }

    #[test]
    fn test_extra_arguments_bound_undeclared() {
        let sig = Signature::function("f").untyped("x").build().unwrap();
        let args = CallArgs::new().arg(1).arg(2).named("verbose", true);
        let bound = bind(&sig, &args);

        let extra = bound.get("arg_1").unwrap();
        assert!(!extra.declared);
        assert_eq!(extra.origin, ArgumentOrigin::Positional { position: 2 });
        assert!(!bound.get("verbose").unwrap().declared);
    }

    #[test]
    fn test_unfilled_parameter_without_default_is_unbound() {
        let sig = power_signature();
        let args = CallArgs::new().named("exponent", 3);
        let bound = bind(&sig, &args);
        assert!(bound.get("base").is_none());
    }

    #[test]
    fn test_binding_borrows_original_values() {
        let sig = power_signature();
        let args = CallArgs::new().arg(Value::list([1, 2]));
        let bound = bind(&sig, &args);
        assert!(std::ptr::eq(bound.get("base").unwrap().value, &args.positional()[0]));
    }

    #[test]
    fn test_duplicate_supply_binds_both_values() {
        let sig = power_signature();
        let args = CallArgs::new().arg(3).arg(4).named("exponent", "five");
        let bound = bind(&sig, &args);

        let exponents: Vec<_> = bound.iter().filter(|a| a.name == "exponent").collect();
        assert_eq!(exponents.len(), 2);
        assert_eq!(exponents[0].origin, ArgumentOrigin::Positional { position: 2 });
        assert_eq!(*exponents[0].value, Value::Int(4));
        assert_eq!(exponents[1].origin, ArgumentOrigin::Named);
        assert_eq!(*exponents[1].value, Value::str("five"));
        assert!(exponents.iter().all(|a| a.declared));
    }

    #[test]
    fn test_receiver_bound_by_name() {
        let sig = Signature::method("scale", ReceiverKind::Instance)
            .untyped("self")
            .param("factor", TypeDescriptor::Int)
            .build()
            .unwrap();
        let grid = Value::from(Record::new("Grid"));

        let args = CallArgs::new().named("self", grid.clone()).named("factor", 2);
        let bound = bind(&sig, &args);
        assert_eq!(bound.receiver(), Some(&grid));
        assert!(bound.get("self").is_none());
        assert_eq!(bound.len(), 1);

        let other = Value::from(Record::new("Other"));
        let args = CallArgs::new().arg(grid.clone()).named("self", other).arg(2);
        let bound = bind(&sig, &args);
        assert_eq!(bound.receiver(), Some(&grid));
        assert!(bound.get("self").is_none());
    }
}
