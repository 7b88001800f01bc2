//! Shared types for the contract-guard workspace.
//!
//! This crate holds the data every other crate in the workspace talks in,
//! without depending on the validation engine itself:
//!
//! - [`Value`](value::Value) - dynamic argument values handed to guarded callables
//! - [`TypeDescriptor`](descriptor::TypeDescriptor) and [`TypeSet`](descriptor::TypeSet) -
//!   the finite set of type tags a parameter can be checked against
//! - [`Annotation`](type_parsing::Annotation) - declared parameter annotations,
//!   including union and optional forms
//! - [`env_utils`] - environment variable helpers used for configuration

pub mod descriptor;
pub mod env_utils;
pub mod type_parsing;
pub mod value;

pub use descriptor::{TypeDescriptor, TypeSet};
pub use type_parsing::{Annotation, AnnotationError};
pub use value::{Record, Value};
