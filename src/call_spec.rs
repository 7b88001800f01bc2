//! JSON call specs.
//!
//! A call spec describes one callable's signature, its contract declaration,
//! and a list of calls to check against it:
//!
//! ```json
//! {
//!   "signature": {
//!     "name": "sum",
//!     "params": [
//!       { "name": "x", "annotation": "int | float" },
//!       { "name": "y", "annotation": "int | float", "default": 0 }
//!     ]
//!   },
//!   "declaration": { "mode": "annotated" },
//!   "calls": [
//!     { "args": [5, "3.5"] },
//!     { "args": [1], "kwargs": { "y": 2.5 } }
//!   ]
//! }
//! ```
//!
//! Values use the JSON mapping of [`guard_types::Value`]: objects carrying
//! `"__type__"` are records and `{"__class__": "Name"}` is a type object.

use anyhow::{anyhow, bail, Context, Result};
use guard_core::{
    CallArgs, CallSite, Contract, ContractDeclaration, ContractViolation, GuardConfig,
    ReceiverKind, Signature,
};
use guard_types::{Annotation, TypeSet, Value};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Read a call spec JSON document from a file, or stdin when `path` is `-`.
pub fn read_call_spec(path: &Path) -> Result<CallSpec> {
    let json_str = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read call spec from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read call spec: {}", path.display()))?
    };
    parse_call_spec(&json_str)
}

pub fn parse_call_spec(json_str: &str) -> Result<CallSpec> {
    serde_json::from_str(json_str).context("Failed to parse call spec JSON")
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallSpec {
    pub signature: SignatureSpec,
    #[serde(default)]
    pub declaration: DeclarationSpec,
    #[serde(default)]
    pub calls: Vec<CallInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureSpec {
    pub name: String,
    /// Present for methods; the first parameter is then the receiver.
    #[serde(default)]
    pub receiver: Option<ReceiverKind>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<Annotation>,
    /// `"default": null` declares a default of `None`; omit the key for no default.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<serde_json::Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationMode {
    Positional,
    Named,
    #[default]
    Annotated,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarationSpec {
    #[serde(default)]
    pub mode: DeclarationMode,
    /// The shared type-set for positional mode.
    #[serde(default)]
    pub types: Option<TypeSet>,
    /// Per-name type-sets for named and annotated modes.
    #[serde(default)]
    pub overrides: BTreeMap<String, TypeSet>,
}

impl DeclarationSpec {
    pub fn to_declaration(&self) -> Result<ContractDeclaration> {
        let overrides = self
            .overrides
            .iter()
            .map(|(name, types)| (name.clone(), types.clone()));
        match self.mode {
            DeclarationMode::Positional => {
                if !self.overrides.is_empty() {
                    bail!("positional declarations do not take 'overrides'");
                }
                let types = self
                    .types
                    .clone()
                    .ok_or_else(|| anyhow!("positional declarations require 'types'"))?;
                Ok(ContractDeclaration::positional(types))
            }
            DeclarationMode::Named => Ok(ContractDeclaration::named(overrides)),
            DeclarationMode::Annotated if self.overrides.is_empty() => {
                Ok(ContractDeclaration::annotated())
            }
            DeclarationMode::Annotated => Ok(ContractDeclaration::annotated_with(overrides)),
        }
    }
}

/// One call: positional arguments and named arguments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallInput {
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub kwargs: serde_json::Map<String, serde_json::Value>,
}

impl CallInput {
    pub fn to_call_args(&self) -> CallArgs {
        CallArgs::from_parts(
            self.args.iter().map(Value::from).collect(),
            self.kwargs
                .iter()
                .map(|(name, value)| (name.clone(), Value::from(value)))
                .collect(),
        )
    }
}

impl SignatureSpec {
    pub fn to_signature(&self) -> Result<Signature> {
        let mut builder = match self.receiver {
            Some(kind) => Signature::method(&self.name, kind),
            None => Signature::function(&self.name),
        };
        if let Some(owner) = &self.owner {
            builder = builder.owner(owner);
        }
        for param in &self.params {
            builder = builder.param_spec(
                &param.name,
                param.annotation.clone(),
                param.default.as_ref().map(Value::from),
            );
        }
        builder
            .build()
            .with_context(|| format!("Invalid signature for '{}'", self.name))
    }
}

/// Result of checking one call from a spec.
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome {
    /// 1-based index into the spec's `calls`.
    pub call: usize,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ContractViolation>,
}

impl CallSpec {
    pub fn contract(&self, config: GuardConfig) -> Result<Contract> {
        let signature = self.signature.to_signature()?;
        let declaration = self
            .declaration
            .to_declaration()
            .with_context(|| format!("Invalid declaration for '{}'", self.signature.name))?;
        Ok(Contract::new(signature, declaration).with_config(config))
    }

    /// Check every call. Reports name `source` as the file and the call's
    /// 1-based index as the line.
    pub fn check_calls(&self, contract: &Contract, source: &str) -> Vec<CallOutcome> {
        self.calls
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let call = index + 1;
                let line = u32::try_from(call).unwrap_or(u32::MAX);
                let site = CallSite::new(source, line, 1);
                let report = contract.check_at(&input.to_call_args(), site).err();
                CallOutcome {
                    call,
                    accepted: report.is_none(),
                    report,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guard_core::ArgumentOrigin;

    const SUM_SPEC: &str = r#"{
        "signature": {
            "name": "sum",
            "params": [
                { "name": "x", "annotation": "int | float" },
                { "name": "y", "annotation": ["int", "float"], "default": 0 }
            ]
        },
        "calls": [
            { "args": [5, 2.5] },
            { "args": [5, "3.5"] },
            { "args": [1] },
            { "kwargs": { "x": "a", "y": null } }
        ]
    }"#;

    #[test]
    fn test_parse_and_check() {
        let spec = parse_call_spec(SUM_SPEC).unwrap();
        assert_eq!(spec.declaration.mode, DeclarationMode::Annotated);
        let contract = spec.contract(GuardConfig::default()).unwrap();
        let outcomes = spec.check_calls(&contract, "sum.json");

        let accepted: Vec<bool> = outcomes.iter().map(|o| o.accepted).collect();
        assert_eq!(accepted, vec![true, false, true, false]);

        let report = outcomes[1].report.as_ref().unwrap();
        assert_eq!(report.call_site.file, "sum.json");
        assert_eq!(report.call_site.line, 2);
        assert_eq!(report.violations()[0].parameter, "y");

        let report = outcomes[3].report.as_ref().unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.violations()[0].origin, ArgumentOrigin::Named);
    }

    #[test]
    fn test_null_default_is_a_default() {
        let spec = parse_call_spec(
            r#"{"signature": {
                "name": "f",
                "params": [{"name": "a", "default": null}, {"name": "b"}]
            }}"#,
        )
        .unwrap();
        let sig = spec.signature.to_signature().unwrap();
        assert_eq!(sig.param("a").unwrap().default, Some(Value::None));
        assert_eq!(sig.param("b").unwrap().default, None);
    }

    #[test]
    fn test_method_spec() {
        let spec = parse_call_spec(
            r#"{
                "signature": {
                    "name": "create",
                    "receiver": "class",
                    "params": [{"name": "cls"}, {"name": "size", "annotation": "int"}]
                },
                "declaration": {"mode": "positional", "types": "int"},
                "calls": [{"args": [{"__class__": "Grid"}, "big"]}]
            }"#,
        )
        .unwrap();
        let contract = spec.contract(GuardConfig::default()).unwrap();
        let outcomes = spec.check_calls(&contract, "-");
        let report = outcomes[0].report.as_ref().unwrap();
        assert_eq!(report.context, "Method: Grid.create()");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_positional_requires_types() {
        let spec = parse_call_spec(
            r#"{"signature": {"name": "f", "params": []}, "declaration": {"mode": "positional"}}"#,
        )
        .unwrap();
        let err = spec.contract(GuardConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("require 'types'"));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let spec = parse_call_spec(
            r#"{"signature": {"name": "f", "params": [{"name": "a"}, {"name": "a"}]}}"#,
        )
        .unwrap();
        let err = spec.contract(GuardConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid signature for 'f'"));
    }

    #[test]
    fn test_named_mode_overrides() {
        let spec = parse_call_spec(
            r#"{
                "signature": {
                    "name": "f",
                    "params": [{"name": "a", "annotation": "int"}, {"name": "b"}]
                },
                "declaration": {"mode": "named", "overrides": {"b": "str"}},
                "calls": [{"args": ["not int", 3]}]
            }"#,
        )
        .unwrap();
        let contract = spec.contract(GuardConfig::default()).unwrap();
        let outcomes = spec.check_calls(&contract, "named.json");
        let report = outcomes[0].report.as_ref().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].parameter, "b");
    }

    #[test]
    fn test_kwargs_keep_call_order() {
        let spec = parse_call_spec(
            r#"{
                "signature": {"name": "f", "params": []},
                "declaration": {"mode": "positional", "types": "int"},
                "calls": [{"kwargs": {
                    "zeta": "z",
                    "alpha": "a",
                    "cfg": {"z": 1, "y": 2, "x": 3, "a": 4}
                }}]
            }"#,
        )
        .unwrap();
        let contract = spec.contract(GuardConfig::default()).unwrap();
        let outcomes = spec.check_calls(&contract, "order.json");
        let report = outcomes[0].report.as_ref().unwrap();

        let names: Vec<&str> = report
            .violations()
            .iter()
            .map(|v| v.parameter.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "cfg"]);
        assert_eq!(
            report.violations()[2].preview,
            "dict({'z': 1, 'y': 2, 'x': 3}...) with 4 elements"
        );
    }

    #[test]
    fn test_override_accepts_wrapped_annotation() {
        let spec = parse_call_spec(
            r#"{
                "signature": {"name": "f", "params": [{"name": "x"}]},
                "declaration": {"mode": "named", "overrides": {"x": "Optional[float]"}},
                "calls": [{"args": [1.5]}, {"args": [null]}, {"args": ["one"]}]
            }"#,
        )
        .unwrap();
        let contract = spec.contract(GuardConfig::default()).unwrap();
        let outcomes = spec.check_calls(&contract, "optional.json");

        let accepted: Vec<bool> = outcomes.iter().map(|o| o.accepted).collect();
        assert_eq!(accepted, vec![true, true, false]);
        let report = outcomes[2].report.as_ref().unwrap();
        assert_eq!(report.violations()[0].expected_label(), "float | NoneType");
    }
}
