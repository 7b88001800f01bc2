//! Illustrative guarded callables.
//!
//! Each demo registers a signature, guards a small closure, and makes one
//! accepted call and one rejected call. The rejected calls show the report
//! layout for functions, record arguments, instance and class methods, and
//! optional parameters.

use anyhow::Result;
use guard_core::{
    CallArgs, Contract, ContractDeclaration, ContractViolation, GuardConfig, Guarded,
    ReceiverKind, Signature,
};
use guard_types::{Annotation, Record, TypeDescriptor, Value};
use serde::Serialize;
use std::fmt;

/// Errors a demo callable can return.
#[derive(Debug)]
pub enum DemoError {
    Contract(ContractViolation),
    /// The callable itself refused the call after validation passed.
    Domain(String),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Contract(report) => write!(f, "{}", report),
            DemoError::Domain(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DemoError {}

impl From<ContractViolation> for DemoError {
    fn from(report: ContractViolation) -> Self {
        DemoError::Contract(report)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DemoOutcome {
    Returned { value: String },
    Rejected { report: ContractViolation },
    Failed { error: String },
}

impl From<Result<Value, DemoError>> for DemoOutcome {
    fn from(result: Result<Value, DemoError>) -> Self {
        match result {
            Ok(value) => DemoOutcome::Returned {
                value: value.repr(),
            },
            Err(DemoError::Contract(report)) => DemoOutcome::Rejected { report },
            Err(DemoError::Domain(error)) => DemoOutcome::Failed { error },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DemoCase {
    pub title: &'static str,
    /// The call as written, e.g. `sum(5, '3.5')`.
    pub call: String,
    pub outcome: DemoOutcome,
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn describe(name: &str, args: &CallArgs) -> String {
    let mut parts: Vec<String> = args.positional().iter().map(Value::repr).collect();
    parts.extend(
        args.named_args()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value.repr())),
    );
    format!("{}({})", name, parts.join(", "))
}

type DemoFn = fn(&CallArgs) -> Result<Value, DemoError>;

fn sum(args: &CallArgs) -> Result<Value, DemoError> {
    Ok(Value::Float(args.positional().iter().filter_map(number).sum()))
}

fn describe_point(args: &CallArgs) -> Result<Value, DemoError> {
    let point = args.positional().first().or_else(|| args.get_named("point"));
    match point {
        Some(Value::Record(record)) => Ok(Value::str(format!(
            "{} at {}",
            record.type_name,
            record.fields_repr()
        ))),
        _ => Err(DemoError::Domain("no point supplied".to_string())),
    }
}

/// Positional arguments after the receiver.
fn operands(args: &CallArgs) -> &[Value] {
    args.positional().get(1..).unwrap_or_default()
}

fn calculator_divide(args: &CallArgs) -> Result<Value, DemoError> {
    let operands: Vec<f64> = operands(args).iter().filter_map(number).collect();
    match operands.as_slice() {
        [_, divisor] if *divisor == 0.0 => Err(DemoError::Domain("division by zero".to_string())),
        [dividend, divisor] => Ok(Value::Float(dividend / divisor)),
        _ => Err(DemoError::Domain("divide takes two operands".to_string())),
    }
}

fn grid_create(args: &CallArgs) -> Result<Value, DemoError> {
    let class = match args.positional().first() {
        Some(Value::Class(name)) => name.clone(),
        _ => "Grid".to_string(),
    };
    let cells: Vec<i64> = operands(args)
        .iter()
        .filter_map(|v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
        .collect();
    Ok(Value::from(
        Record::new(class)
            .with_field("width", cells.first().copied().unwrap_or(0))
            .with_field("height", cells.get(1).copied().unwrap_or(0)),
    ))
}

fn set_ratio(args: &CallArgs) -> Result<Value, DemoError> {
    let ratio = args
        .positional()
        .first()
        .or_else(|| args.get_named("ratio"))
        .cloned()
        .unwrap_or(Value::None);
    Ok(match ratio {
        Value::None => Value::Float(1.0),
        other => other,
    })
}

struct Demo {
    title: &'static str,
    guarded: Guarded<DemoFn>,
    calls: Vec<CallArgs>,
}

fn demos(config: &GuardConfig) -> Result<Vec<Demo>> {
    let point = Value::from(
        Record::new("Point")
            .with_base("Shape")
            .with_field("x", 1)
            .with_field("y", 2),
    );
    let calculator = Value::from(Record::new("Calculator").with_field("memory", 0.0));
    let guard = |signature: Signature, declaration: ContractDeclaration, func: DemoFn| {
        Contract::new(signature, declaration)
            .with_config(config.clone())
            .wrap(func)
    };

    Ok(vec![
        Demo {
            title: "numeric function",
            guarded: guard(
                Signature::function("sum")
                    .param("x", TypeDescriptor::Number)
                    .param("y", TypeDescriptor::Number)
                    .build()?,
                ContractDeclaration::annotated(),
                sum,
            ),
            calls: vec![
                CallArgs::new().arg(5).arg(2.5),
                CallArgs::new().arg(5).arg("3.5"),
            ],
        },
        Demo {
            title: "record argument",
            guarded: guard(
                Signature::function("describe_point")
                    .param("point", TypeDescriptor::named("Shape"))
                    .build()?,
                ContractDeclaration::annotated(),
                describe_point,
            ),
            calls: vec![
                CallArgs::new().arg(point),
                CallArgs::new().arg(Value::dict([("x", 1), ("y", 2), ("z", 3), ("w", 4)])),
            ],
        },
        Demo {
            title: "instance method",
            guarded: guard(
                Signature::method("divide", ReceiverKind::Instance)
                    .untyped("self")
                    .untyped("dividend")
                    .untyped("divisor")
                    .owner("Calculator")
                    .build()?,
                ContractDeclaration::positional([TypeDescriptor::Int, TypeDescriptor::Float]),
                calculator_divide,
            ),
            calls: vec![
                CallArgs::new().arg(calculator.clone()).arg(9).arg(3),
                CallArgs::new().arg(calculator.clone()).arg(9).arg(0),
                CallArgs::new()
                    .arg(calculator)
                    .arg(Value::list([1, 2, 3, 4, 5, 6]))
                    .arg("x".repeat(60)),
            ],
        },
        Demo {
            title: "class method",
            guarded: guard(
                Signature::method("create", ReceiverKind::Class)
                    .untyped("cls")
                    .param("width", TypeDescriptor::Int)
                    .param_with_default("height", TypeDescriptor::Int, 1)
                    .build()?,
                ContractDeclaration::annotated(),
                grid_create,
            ),
            calls: vec![
                CallArgs::new().arg(Value::class("Grid")).arg(4).arg(3),
                CallArgs::new()
                    .arg(Value::class("Grid"))
                    .arg(4.5)
                    .named("height", "tall"),
            ],
        },
        Demo {
            title: "optional parameter",
            guarded: guard(
                Signature::function("set_ratio")
                    .param("ratio", Annotation::optional([TypeDescriptor::Float]))
                    .build()?,
                ContractDeclaration::annotated(),
                set_ratio,
            ),
            calls: vec![
                CallArgs::new().arg(Value::None),
                CallArgs::new().named("ratio", "half"),
            ],
        },
    ])
}

/// Run every demo call and collect the outcomes in order.
pub fn run_demos(config: &GuardConfig) -> Result<Vec<DemoCase>> {
    let mut cases = Vec::new();
    for demo in demos(config)? {
        let name = demo.guarded.contract().signature().name().to_string();
        for args in &demo.calls {
            cases.push(DemoCase {
                title: demo.title,
                call: describe(&name, args),
                outcome: demo.guarded.call(args).into(),
            });
        }
    }
    Ok(cases)
}
