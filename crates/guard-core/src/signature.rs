//! Signature registration.
//!
//! Rust cannot enumerate a closure's parameters at runtime, so every guarded
//! callable is registered with an explicit [`Signature`]: its ordered
//! parameters, their annotations and defaults, and whether the first parameter
//! is a method receiver.
//!
//! ```
//! use guard_core::signature::{ReceiverKind, Signature};
//! use guard_types::TypeDescriptor;
//!
//! let sig = Signature::method("scale", ReceiverKind::Instance)
//!     .owner("Vector")
//!     .untyped("self")
//!     .param("factor", TypeDescriptor::Float)
//!     .build()
//!     .unwrap();
//!
//! assert!(sig.params()[0].is_receiver);
//! assert_eq!(sig.validated_params().count(), 1);
//! ```

use crate::errors::SignatureError;
use guard_types::{Annotation, TypeSet, Value};
use serde::{Deserialize, Serialize};

/// How a method's receiver is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverKind {
    /// Bound to an instance; the owning type is the instance's type.
    Instance,
    /// Bound to a type object; the owning type is that type.
    Class,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    /// 0-based index in declaration order.
    pub position: usize,
    pub is_receiver: bool,
    pub annotation: Option<Annotation>,
    pub default: Option<Value>,
}

impl ParameterSpec {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Annotation-derived type-set; empty when unannotated.
    pub fn declared_types(&self) -> TypeSet {
        self.annotation
            .as_ref()
            .map(Annotation::expand)
            .unwrap_or_default()
    }
}

/// The registered parameter list of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    receiver: Option<ReceiverKind>,
    owner: Option<String>,
    params: Vec<ParameterSpec>,
}

impl Signature {
    /// Start declaring a free function.
    pub fn function(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder::new(name.into(), None)
    }

    /// Start declaring a method. The first declared parameter is the receiver.
    pub fn method(name: impl Into<String>, receiver: ReceiverKind) -> SignatureBuilder {
        SignatureBuilder::new(name.into(), Some(receiver))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> Option<ReceiverKind> {
        self.receiver
    }

    /// Owning type used when no receiver value is available at call time.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn receiver_param(&self) -> Option<&ParameterSpec> {
        self.params.first().filter(|p| p.is_receiver)
    }

    /// Parameters subject to validation (every parameter except the receiver).
    pub fn validated_params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| !p.is_receiver)
    }

    /// Caller context label: `Function: name()` or `Method: Owner.name()`.
    ///
    /// For an instance receiver the owner is the receiver value's type; for a
    /// class receiver it is the type object's name.
    pub fn context_label(&self, receiver_value: Option<&Value>) -> String {
        let Some(kind) = self.receiver else {
            return format!("Function: {}()", self.name);
        };
        let owner = match (kind, receiver_value) {
            (ReceiverKind::Class, Some(Value::Class(name))) => name.as_str(),
            (_, Some(value)) => value.type_label(),
            (_, None) => self.owner.as_deref().unwrap_or("?"),
        };
        format!("Method: {}.{}()", owner, self.name)
    }
}

/// Builder returned by [`Signature::function`] and [`Signature::method`].
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    name: String,
    receiver: Option<ReceiverKind>,
    owner: Option<String>,
    params: Vec<(String, Option<Annotation>, Option<Value>)>,
}

impl SignatureBuilder {
    fn new(name: String, receiver: Option<ReceiverKind>) -> Self {
        Self {
            name,
            receiver,
            owner: None,
            params: Vec::new(),
        }
    }

    /// Fallback owning type name for method context labels.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// An annotated parameter without a default.
    pub fn param(self, name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        self.param_spec(name, Some(annotation.into()), None)
    }

    /// An annotated parameter with a default value.
    pub fn param_with_default(
        self,
        name: impl Into<String>,
        annotation: impl Into<Annotation>,
        default: impl Into<Value>,
    ) -> Self {
        self.param_spec(name, Some(annotation.into()), Some(default.into()))
    }

    /// An unannotated parameter.
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.param_spec(name, None, None)
    }

    /// An unannotated parameter with a default value.
    pub fn untyped_with_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.param_spec(name, None, Some(default.into()))
    }

    /// General form.
    pub fn param_spec(
        mut self,
        name: impl Into<String>,
        annotation: Option<Annotation>,
        default: Option<Value>,
    ) -> Self {
        self.params.push((name.into(), annotation, default));
        self
    }

    pub fn build(self) -> Result<Signature, SignatureError> {
        if self.receiver.is_some() && self.params.is_empty() {
            return Err(SignatureError::MissingReceiver {
                callable: self.name,
            });
        }

        let mut params: Vec<ParameterSpec> = Vec::with_capacity(self.params.len());
        for (position, (name, annotation, default)) in self.params.into_iter().enumerate() {
            if params.iter().any(|p| p.name == name) {
                return Err(SignatureError::DuplicateParameter {
                    callable: self.name,
                    parameter: name,
                });
            }
            params.push(ParameterSpec {
                name,
                position,
                is_receiver: position == 0 && self.receiver.is_some(),
                annotation,
                default,
            });
        }

        Ok(Signature {
            name: self.name,
            receiver: self.receiver,
            owner: self.owner,
            params,
        })
    }
}
