//! Registration-time errors.
//!
//! Call-time failures are reported as a single aggregated
//! [`ContractViolation`](crate::report::ContractViolation); the errors here can
//! only occur while a signature is being declared.

use std::fmt;

/// A signature could not be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Two parameters share a name.
    DuplicateParameter {
        /// Callable being declared
        callable: String,
        /// The repeated parameter name
        parameter: String,
    },
    /// A method was declared without any parameter to bind the receiver to.
    MissingReceiver {
        /// Callable being declared
        callable: String,
    },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::DuplicateParameter {
                callable,
                parameter,
            } => write!(
                f,
                "duplicate parameter '{}' in signature of {}()",
                parameter, callable
            ),
            SignatureError::MissingReceiver { callable } => write!(
                f,
                "method {}() declares a receiver but has no parameters",
                callable
            ),
        }
    }
}

impl std::error::Error for SignatureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_callable_and_parameter() {
        let err = SignatureError::DuplicateParameter {
            callable: "sum".into(),
            parameter: "x".into(),
        };
        assert_eq!(err.to_string(), "duplicate parameter 'x' in signature of sum()");

        let err = SignatureError::MissingReceiver {
            callable: "area".into(),
        };
        assert!(err.to_string().contains("area()"));
    }
}
