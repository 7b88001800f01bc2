//! Wrapping composer: the public entry point.
//!
//! A [`Contract`] is built once per callable: it resolves the signature's
//! constraints up front and reuses them for every call. [`Guarded`] pairs a
//! contract with the callable it protects. A call that breaks the contract
//! never reaches the callable; a call that satisfies it is forwarded with the
//! original arguments and the callable's result is returned untouched.
//!
//! ```
//! use guard_core::{wrap, CallArgs, ContractDeclaration, ContractViolation, Signature};
//! use guard_types::{TypeDescriptor, Value};
//!
//! let sig = Signature::function("sum")
//!     .param("x", TypeDescriptor::Number)
//!     .param("y", TypeDescriptor::Number)
//!     .build()
//!     .unwrap();
//!
//! let sum = wrap(sig, ContractDeclaration::annotated(), |args: &CallArgs| {
//!     let total: f64 = args
//!         .positional()
//!         .iter()
//!         .map(|v| match v {
//!             Value::Int(i) => *i as f64,
//!             Value::Float(f) => *f,
//!             _ => 0.0,
//!         })
//!         .sum();
//!     Ok::<_, ContractViolation>(total)
//! });
//!
//! assert_eq!(sum.call(&CallArgs::new().arg(5).arg(2.5)).unwrap(), 7.5);
//! let err = sum.call(&CallArgs::new().arg(5).arg("3.5")).unwrap_err();
//! assert_eq!(err.len(), 1);
//! ```

use crate::binder::{bind, CallArgs};
use crate::config::GuardConfig;
use crate::constraints::{resolve, ConstraintMap, ContractDeclaration};
use crate::report::{report, CallSite, ContractViolation};
use crate::signature::Signature;
use crate::validator::{validate, Violation};
use tracing::{debug, trace, warn};

/// A signature together with its resolved constraints.
#[derive(Debug, Clone)]
pub struct Contract {
    signature: Signature,
    declaration: ContractDeclaration,
    constraints: ConstraintMap,
    config: GuardConfig,
}

impl Contract {
    /// Resolve constraints for `signature` under `declaration`.
    pub fn new(signature: Signature, declaration: ContractDeclaration) -> Self {
        let constraints = resolve(&signature, &declaration);
        debug!(
            callable = signature.name(),
            parameters = signature.params().len(),
            constraints = constraints.len(),
            "argument contract resolved"
        );
        Self {
            signature,
            declaration,
            constraints,
            config: GuardConfig::default(),
        }
    }

    /// Use `config` when rendering reports raised by this contract.
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn declaration(&self) -> &ContractDeclaration {
        &self.declaration
    }

    pub fn constraints(&self) -> &ConstraintMap {
        &self.constraints
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Violations `args` would produce, without raising.
    pub fn violations(&self, args: &CallArgs) -> Vec<Violation> {
        validate(&self.constraints, &bind(&self.signature, args))
    }

    /// Check `args`, attributing any failure to the caller of this method.
    #[track_caller]
    pub fn check(&self, args: &CallArgs) -> Result<(), ContractViolation> {
        self.check_at(args, CallSite::caller())
    }

    /// Check `args`, attributing any failure to `call_site`.
    pub fn check_at(&self, args: &CallArgs, call_site: CallSite) -> Result<(), ContractViolation> {
        let bound = bind(&self.signature, args);
        let violations = validate(&self.constraints, &bound);
        trace!(
            callable = self.signature.name(),
            arguments = bound.len(),
            violations = violations.len(),
            "validated call"
        );
        if violations.is_empty() {
            return Ok(());
        }

        warn!(
            callable = self.signature.name(),
            violations = violations.len(),
            file = call_site.file.as_str(),
            line = call_site.line,
            "call rejected by argument contract"
        );
        let context = self.signature.context_label(bound.receiver());
        report(violations, call_site, context, &self.config)
    }

    /// Guard `func` with this contract.
    pub fn wrap<F>(self, func: F) -> Guarded<F> {
        Guarded {
            contract: self,
            func,
        }
    }
}

/// A callable guarded by a [`Contract`].
#[derive(Debug, Clone)]
pub struct Guarded<F> {
    contract: Contract,
    func: F,
}

impl<F> Guarded<F> {
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Validate `args`, then invoke the callable with them unchanged.
    ///
    /// The callable's own errors are returned exactly as produced; a contract
    /// failure is converted into `E` through `From<ContractViolation>`.
    #[track_caller]
    pub fn call<R, E>(&self, args: &CallArgs) -> Result<R, E>
    where
        F: Fn(&CallArgs) -> Result<R, E>,
        E: From<ContractViolation>,
    {
        let call_site = CallSite::caller();
        self.contract.check_at(args, call_site)?;
        (self.func)(args)
    }

    /// Drop the guard and return the bare callable.
    pub fn into_inner(self) -> F {
        self.func
    }
}

/// Guard `func` with the contract described by `signature` and `declaration`.
pub fn wrap<F>(signature: Signature, declaration: ContractDeclaration, func: F) -> Guarded<F> {
    Contract::new(signature, declaration).wrap(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::ReceiverKind;
    use guard_types::{Record, TypeDescriptor, Value};
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    enum CalcError {
        Contract(usize),
        DivideByZero,
    }

    impl From<ContractViolation> for CalcError {
        fn from(err: ContractViolation) -> Self {
            CalcError::Contract(err.len())
        }
    }

    fn divide_signature() -> Signature {
        Signature::function("divide")
            .param("a", TypeDescriptor::Int)
            .param("b", TypeDescriptor::Int)
            .build()
            .unwrap()
    }

    fn int_at(args: &CallArgs, index: usize) -> i64 {
        match args.positional().get(index) {
            Some(Value::Int(i)) => *i,
            _ => 0,
        }
    }

    #[test]
    fn test_callable_not_invoked_on_violation() {
        let invoked = Cell::new(false);
        let divide = wrap(
            divide_signature(),
            ContractDeclaration::annotated(),
            |args: &CallArgs| {
                invoked.set(true);
                Ok::<i64, CalcError>(int_at(args, 0) / int_at(args, 1))
            },
        );

        let err = divide.call(&CallArgs::new().arg("1").arg(2.0)).unwrap_err();
        assert_eq!(err, CalcError::Contract(2));
        assert!(!invoked.get());
    }

    #[test]
    fn test_callable_errors_pass_through() {
        let divide = wrap(
            divide_signature(),
            ContractDeclaration::annotated(),
            |args: &CallArgs| {
                let b = int_at(args, 1);
                if b == 0 {
                    return Err(CalcError::DivideByZero);
                }
                Ok(int_at(args, 0) / b)
            },
        );

        assert_eq!(divide.call(&CallArgs::new().arg(9).arg(3)), Ok(3));
        assert_eq!(
            divide.call(&CallArgs::new().arg(9).arg(0)),
            Err(CalcError::DivideByZero)
        );
    }

    #[test]
    fn test_callable_sees_original_arguments() {
        let echo = wrap(
            Signature::function("echo")
                .untyped("value")
                .build()
                .unwrap(),
            ContractDeclaration::positional(TypeDescriptor::Object),
            |args: &CallArgs| Ok::<CallArgs, ContractViolation>(args.clone()),
        );
        let args = CallArgs::new()
            .arg(Value::list([1, 2, 3, 4, 5, 6, 7]))
            .named("extra", "kept");
        assert_eq!(echo.call(&args).unwrap(), args);
    }

    #[test]
    fn test_report_points_at_caller_line() {
        let contract = Contract::new(divide_signature(), ContractDeclaration::annotated());
        let line = line!() + 1;
        let err = contract.check(&CallArgs::new().arg(1).arg("2")).unwrap_err();
        assert_eq!(err.call_site.line, line);
        assert!(err.call_site.file.ends_with("composer.rs"));
        assert_eq!(err.context, "Function: divide()");
    }

    #[test]
    fn test_method_context_and_receiver_exclusion() {
        let sig = Signature::method("add", ReceiverKind::Instance)
            .untyped("self")
            .param("a", TypeDescriptor::Int)
            .param("b", TypeDescriptor::Int)
            .build()
            .unwrap();
        let contract = Contract::new(sig, ContractDeclaration::positional(TypeDescriptor::Int));
        let calc = Value::from(Record::new("Calculator").with_field("memory", 0));

        let err = contract
            .check(&CallArgs::new().arg(calc).arg(1).arg("2"))
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.context, "Method: Calculator.add()");
        assert_eq!(err.violations()[0].parameter_identity(), "'b' (position 2)");
    }

    #[test]
    fn test_config_applies_to_reports() {
        let contract = Contract::new(divide_signature(), ContractDeclaration::annotated())
            .with_config(GuardConfig::default().with_rule_width(5));
        let err = contract.check(&CallArgs::new().arg(1).arg("2")).unwrap_err();
        assert!(err.to_string().starts_with("=====\n"));
    }
}
