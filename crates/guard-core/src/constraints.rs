//! Type constraint resolution.
//!
//! Merges a signature's annotation-derived type-sets with the caller's explicit
//! declaration into one authoritative [`ConstraintMap`]. Explicit entries
//! replace annotation-derived ones outright; they are never unioned.

use crate::signature::Signature;
use guard_types::TypeSet;
use serde::Serialize;
use tracing::debug;

/// Where a parameter's type-set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintSource {
    ExplicitPositional,
    ExplicitNamed,
    FromAnnotation,
}

impl ConstraintSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintSource::ExplicitPositional => "explicit-positional",
            ConstraintSource::ExplicitNamed => "explicit-named",
            ConstraintSource::FromAnnotation => "from-annotation",
        }
    }
}

/// A resolved, non-empty type-set and its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    pub types: TypeSet,
    pub source: ConstraintSource,
}

/// The caller's explicit constraint declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContractDeclaration {
    /// One type-set for every (non-receiver) argument of the call.
    Positional(TypeSet),
    /// Per-name type-sets. Parameters not named are not validated.
    Named(Vec<(String, TypeSet)>),
    /// Annotation-derived type-sets, with per-name overrides on top.
    #[default]
    Annotated,
    AnnotatedWith(Vec<(String, TypeSet)>),
}

impl ContractDeclaration {
    pub fn positional(types: impl Into<TypeSet>) -> Self {
        ContractDeclaration::Positional(types.into())
    }

    pub fn named<I, N, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<TypeSet>,
    {
        ContractDeclaration::Named(collect_entries(entries))
    }

    pub fn annotated() -> Self {
        ContractDeclaration::Annotated
    }

    pub fn annotated_with<I, N, T>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<TypeSet>,
    {
        ContractDeclaration::AnnotatedWith(collect_entries(overrides))
    }

    /// Per-name entries of this declaration (empty for positional and plain annotated).
    pub fn overrides(&self) -> &[(String, TypeSet)] {
        match self {
            ContractDeclaration::Named(entries) | ContractDeclaration::AnnotatedWith(entries) => {
                entries
            }
            ContractDeclaration::Positional(_) | ContractDeclaration::Annotated => &[],
        }
    }

    fn uses_annotations(&self) -> bool {
        matches!(
            self,
            ContractDeclaration::Annotated | ContractDeclaration::AnnotatedWith(_)
        )
    }
}

fn collect_entries<I, N, T>(entries: I) -> Vec<(String, TypeSet)>
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: Into<TypeSet>,
{
    entries
        .into_iter()
        .map(|(name, types)| (name.into(), types.into()))
        .collect()
}

/// Resolved constraints for one callable, in parameter declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConstraintMap {
    entries: Vec<(String, Constraint)>,
    /// Applies to arguments that match no declared parameter.
    extras: Option<Constraint>,
}

impl ConstraintMap {
    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, constraint)| constraint)
    }

    /// Constraint for an argument that matched no declared parameter.
    pub fn extras(&self) -> Option<&Constraint> {
        self.extras.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the final constraint per parameter.
///
/// Override names that are not parameters of `signature` (or that name the
/// receiver) are ignored. Empty override sets are ignored as well, so every
/// constraint in the map is non-empty.
pub fn resolve(signature: &Signature, declaration: &ContractDeclaration) -> ConstraintMap {
    let mut map = ConstraintMap::default();

    if let ContractDeclaration::Positional(types) = declaration {
        if types.is_empty() {
            debug!(callable = signature.name(), "empty positional type-set ignored");
            return map;
        }
        let constraint = Constraint {
            types: types.clone(),
            source: ConstraintSource::ExplicitPositional,
        };
        for param in signature.validated_params() {
            map.entries.push((param.name.clone(), constraint.clone()));
        }
        map.extras = Some(constraint);
        return map;
    }

    let overrides = declaration.overrides();
    for (name, types) in overrides {
        if !signature.validated_params().any(|p| &p.name == name) {
            debug!(
                callable = signature.name(),
                parameter = name.as_str(),
                "override names no validated parameter; ignored"
            );
        } else if types.is_empty() {
            debug!(
                callable = signature.name(),
                parameter = name.as_str(),
                "empty override type-set ignored"
            );
        }
    }

    for param in signature.validated_params() {
        let explicit = overrides
            .iter()
            .rev()
            .find(|(name, types)| *name == param.name && !types.is_empty());
        if let Some((_, types)) = explicit {
            map.entries.push((
                param.name.clone(),
                Constraint {
                    types: types.clone(),
                    source: ConstraintSource::ExplicitNamed,
                },
            ));
            continue;
        }

        if declaration.uses_annotations() {
            let declared = param.declared_types();
            if !declared.is_empty() {
                map.entries.push((
                    param.name.clone(),
                    Constraint {
                        types: declared,
                        source: ConstraintSource::FromAnnotation,
                    },
                ));
            }
        }
    }

    map
}
