//! Guard Core
//!
//! Runtime argument-contract validation for dynamically typed calls.
//!
//! A callable is registered with a [`Signature`] and a [`ContractDeclaration`].
//! The pair is resolved once into a [`Contract`]; every call through the
//! resulting [`Guarded`] wrapper is bound, checked, and either forwarded
//! unchanged or rejected with a single aggregated [`ContractViolation`].
//!
//! # Pipeline
//!
//! - [`signature`]: parameter lists and receiver kinds
//! - [`constraints`]: per-parameter type sets from declarations and annotations
//! - [`binder`]: maps a call's arguments onto parameter names
//! - [`validator`]: collects every failing argument
//! - [`summary`]: bounded previews of offending values
//! - [`report`]: the aggregated failure and its text layout
//! - [`composer`]: ties the stages together around a callable
//!
//! Guarded callables hold no per-call state, so one wrapper can be shared by
//! reference across threads when the callable itself is `Sync`.

pub mod binder;
pub mod composer;
pub mod config;
pub mod constraints;
pub mod errors;
pub mod output;
pub mod report;
pub mod signature;
pub mod summary;
pub mod validator;

pub use binder::{bind, ArgumentOrigin, BoundArgument, BoundArguments, CallArgs};
pub use composer::{wrap, Contract, Guarded};
pub use config::GuardConfig;
pub use constraints::{
    resolve, Constraint, ConstraintMap, ConstraintSource, ContractDeclaration,
};
pub use errors::SignatureError;
pub use report::{report, CallSite, ContractViolation};
pub use signature::{ParameterSpec, ReceiverKind, Signature, SignatureBuilder};
pub use summary::summarize;
pub use validator::{validate, Violation};
