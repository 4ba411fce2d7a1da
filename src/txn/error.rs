//! Error types for the transaction subsystem.
//!
//! Two families:
//! - [`SchemaError`]: schema registration failures. Raised once, at
//!   `SchemaBuilder::build`, never at instance use.
//! - [`TxnError`]: runtime failures at assignment, validation, or dispatch.
//!   All deterministic and recoverable by the caller supplying corrected
//!   input.

use thiserror::Error;

/// Result type for transaction operations.
pub type TxnResult<T> = Result<T, TxnError>;

/// Result type for schema registration.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Runtime transaction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TxnError {
    /// A field value failed a type, length, pattern, or choice check.
    #[error("{field}: expected {expected}, got {actual}")]
    Constraint {
        field: String,
        expected: String,
        actual: String,
    },

    /// A supplied keyword names a field the schema does not declare.
    #[error("{field} field does not exist on {schema}")]
    UnknownField { schema: String, field: String },

    /// One or more required fields resolve to unset.
    #[error("{schema} is missing required fields: {}", .missing.join(", "))]
    MissingRequiredFields { schema: String, missing: Vec<String> },

    /// An instance of a schema outside the dispatcher's accepted set.
    #[error("invalid transaction type (got: {got}, expects: {accepted})")]
    UnsupportedType { got: String, accepted: String },

    /// Raw field values matched none of the dispatcher's candidates.
    #[error("no transaction type matches the supplied fields (candidates: {accepted})")]
    NoMatchingType { accepted: String },

    /// A dispatcher call with neither an instance nor field values.
    #[error("expects either a transaction or field values")]
    MissingArguments,
}

impl TxnError {
    /// Returns the stable string code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            TxnError::Constraint { .. } => "PX_CONSTRAINT_VIOLATION",
            TxnError::UnknownField { .. } => "PX_UNKNOWN_FIELD",
            TxnError::MissingRequiredFields { .. } => "PX_MISSING_REQUIRED_FIELDS",
            TxnError::UnsupportedType { .. } => "PX_UNSUPPORTED_TXN_TYPE",
            TxnError::NoMatchingType { .. } => "PX_NO_MATCHING_TXN_TYPE",
            TxnError::MissingArguments => "PX_MISSING_ARGUMENTS",
        }
    }
}

/// Schema registration errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A name in the required set is absent from the field map.
    #[error("schema {schema}: required field {field} is not declared")]
    RequiredFieldUndeclared { schema: String, field: String },

    /// A string field pattern failed to compile.
    #[error("schema {schema}: field {field} has an invalid pattern")]
    InvalidPattern {
        schema: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A field default failed the field's own validation.
    #[error("schema {schema}: default for {field} is invalid: expected {expected}, got {actual}")]
    InvalidDefault {
        schema: String,
        field: String,
        expected: String,
        actual: String,
    },

    /// A kind-specific constraint was declared on the wrong field kind.
    #[error("schema {schema}: {constraint} does not apply to {kind} field {field}")]
    ConstraintKindMismatch {
        schema: String,
        field: String,
        constraint: &'static str,
        kind: &'static str,
    },
}

impl SchemaError {
    /// Returns the stable string code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::RequiredFieldUndeclared { .. } => "PX_SCHEMA_REQUIRED_UNDECLARED",
            SchemaError::InvalidPattern { .. } => "PX_SCHEMA_INVALID_PATTERN",
            SchemaError::InvalidDefault { .. } => "PX_SCHEMA_INVALID_DEFAULT",
            SchemaError::ConstraintKindMismatch { .. } => "PX_SCHEMA_CONSTRAINT_KIND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_message_lists_fields() {
        let err = TxnError::MissingRequiredFields {
            schema: "PxPostCard".into(),
            missing: vec!["cvc2".into(), "date_expiry".into()],
        };
        assert_eq!(
            err.to_string(),
            "PxPostCard is missing required fields: cvc2, date_expiry"
        );
        assert_eq!(err.code(), "PX_MISSING_REQUIRED_FIELDS");
    }

    #[test]
    fn test_constraint_message() {
        let err = TxnError::Constraint {
            field: "currency".into(),
            expected: "one of the accepted currencies".into(),
            actual: "XXX".into(),
        };
        assert!(err.to_string().starts_with("currency: expected"));
        assert_eq!(err.code(), "PX_CONSTRAINT_VIOLATION");
    }
}
