//! Dual-mode operation dispatch.
//!
//! An outward gateway operation accepts either a pre-built [`Transaction`]
//! of one of several allowed schemas, or a raw field payload whose shape is
//! resolved at call time. [`TransactionArg`] is the sum of those two call
//! forms; [`Dispatcher`] holds the ordered candidate set and reduces
//! whichever form it is given to the plain field mapping the transport
//! consumes.

use super::error::{TxnError, TxnResult};
use super::schema::Schema;
use super::transaction::Transaction;
use crate::wire::Payload;

/// The two ways a dispatcher-wrapped operation may be called.
#[derive(Debug)]
pub enum TransactionArg<'a> {
    /// A pre-built instance of some schema.
    Instance(Transaction<'a>),
    /// Raw field values matching one of the candidate shapes.
    Raw(Payload),
}

impl<'a> From<Transaction<'a>> for TransactionArg<'a> {
    fn from(txn: Transaction<'a>) -> Self {
        TransactionArg::Instance(txn)
    }
}

impl<'a> From<Payload> for TransactionArg<'a> {
    fn from(payload: Payload) -> Self {
        TransactionArg::Raw(payload)
    }
}

/// Resolves a call argument against an ordered set of candidate schemas.
#[derive(Debug, Clone)]
pub struct Dispatcher<'a> {
    candidates: Vec<&'a Schema>,
}

impl<'a> Dispatcher<'a> {
    /// Builds a dispatcher over the given candidates. Order matters: the
    /// raw path tries candidates in declaration order and the first valid
    /// one wins.
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Schema>,
    {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    pub fn candidates(&self) -> &[&'a Schema] {
        &self.candidates
    }

    /// Reduces a call argument to the plain field mapping the operation
    /// forwards to its transport.
    ///
    /// Instance path: the schema must be one of the candidates
    /// (`UnsupportedType` otherwise), the instance must validate, and the
    /// coerced mapping is returned.
    ///
    /// Raw path: candidates are tried in order; a candidate that does not
    /// declare one of the supplied names simply does not match, but a value
    /// that violates a declared field's constraints is an error in any
    /// shape and propagates. The original payload is forwarded untouched —
    /// caller-supplied literals survive for candidates that matched only
    /// loosely. An empty payload is `MissingArguments`; no valid candidate
    /// is `NoMatchingType`.
    pub fn resolve(&self, arg: impl Into<TransactionArg<'a>>) -> TxnResult<Payload> {
        match arg.into() {
            TransactionArg::Instance(txn) => self.resolve_instance(txn),
            TransactionArg::Raw(payload) => self.resolve_raw(payload),
        }
    }

    fn resolve_instance(&self, txn: Transaction<'a>) -> TxnResult<Payload> {
        let accepted = self
            .candidates
            .iter()
            .any(|schema| std::ptr::eq(*schema, txn.schema()));
        if !accepted {
            return Err(TxnError::UnsupportedType {
                got: txn.schema().name().to_owned(),
                accepted: self.accepted_names(),
            });
        }

        txn.validate()?;
        tracing::debug!(schema = %txn.schema().name(), "dispatching instance");
        Ok(txn.to_mapping())
    }

    fn resolve_raw(&self, payload: Payload) -> TxnResult<Payload> {
        if payload.is_empty() {
            return Err(TxnError::MissingArguments);
        }

        for schema in &self.candidates {
            match Transaction::new(*schema, payload.clone()) {
                Ok(txn) if txn.is_valid() => {
                    tracing::debug!(schema = %schema.name(), "raw fields matched");
                    return Ok(payload);
                }
                Ok(_) => {
                    tracing::trace!(schema = %schema.name(), "candidate incomplete");
                }
                Err(TxnError::UnknownField { field, .. }) => {
                    tracing::trace!(
                        schema = %schema.name(),
                        field = %field,
                        "candidate does not declare field"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        Err(TxnError::NoMatchingType {
            accepted: self.accepted_names(),
        })
    }

    fn accepted_names(&self) -> String {
        self.candidates
            .iter()
            .map(|schema| schema.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::choices::CURRENCY_CHOICES;
    use crate::txn::field::FieldSpec;
    use crate::txn::value::Value;
    use std::sync::LazyLock;

    static CARD: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("CardTransaction")
            .field("amount", FieldSpec::amount().required())
            .field(
                "currency",
                FieldSpec::string().choices(CURRENCY_CHOICES.iter().copied()).required(),
            )
            .field("card_number", FieldSpec::string().max_length(20).required())
            .field("cvc2", FieldSpec::string().max_length(4).required())
            .build()
            .unwrap()
    });

    static TOKEN: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("TokenTransaction")
            .field("amount", FieldSpec::amount().required())
            .field(
                "currency",
                FieldSpec::string().choices(CURRENCY_CHOICES.iter().copied()).required(),
            )
            .field("billing_id", FieldSpec::string().max_length(32).required())
            .build()
            .unwrap()
    });

    static OUTSIDER: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Outsider")
            .field("txn_id", FieldSpec::string().required())
            .build()
            .unwrap()
    });

    fn dispatcher() -> Dispatcher<'static> {
        Dispatcher::new([&*CARD, &*TOKEN])
    }

    fn raw(pairs: &[(&str, Value)]) -> Payload {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_instance_path_forwards_coerced_mapping() {
        let txn = Transaction::new(
            &*TOKEN,
            [
                ("amount", Value::from("10.011")),
                ("currency", Value::from("NZD")),
                ("billing_id", Value::from("B1")),
            ],
        )
        .unwrap();

        let mapping = dispatcher().resolve(txn).unwrap();
        assert_eq!(
            mapping.get("amount"),
            Some(&Value::Amount("10.01".parse().unwrap()))
        );
    }

    #[test]
    fn test_instance_of_unaccepted_schema_rejected_even_if_valid() {
        let txn = Transaction::new(&*OUTSIDER, [("txn_id", "T1")]).unwrap();
        assert!(txn.is_valid());

        let err = dispatcher().resolve(txn).unwrap_err();
        assert_eq!(
            err,
            TxnError::UnsupportedType {
                got: "Outsider".into(),
                accepted: "CardTransaction, TokenTransaction".into(),
            }
        );
    }

    #[test]
    fn test_instance_validation_error_propagates() {
        let txn = Transaction::new(&*CARD, [("amount", "10.01")]).unwrap();
        let err = dispatcher().resolve(txn).unwrap_err();
        assert_eq!(err.code(), "PX_MISSING_REQUIRED_FIELDS");
    }

    #[test]
    fn test_raw_path_matches_second_candidate_and_forwards_literals() {
        let payload = raw(&[
            ("amount", Value::Float(10.01)),
            ("currency", Value::from("NZD")),
            ("billing_id", Value::from("B1")),
        ]);

        let forwarded = dispatcher().resolve(payload.clone()).unwrap();
        // The original literals come back, not the coerced instance values.
        assert_eq!(forwarded, payload);
    }

    #[test]
    fn test_raw_path_no_match() {
        let err = dispatcher()
            .resolve(raw(&[("amount", Value::Float(10.01))]))
            .unwrap_err();
        assert_eq!(
            err,
            TxnError::NoMatchingType {
                accepted: "CardTransaction, TokenTransaction".into(),
            }
        );
    }

    #[test]
    fn test_raw_path_unknown_field_skips_candidate() {
        // txn_id exists on neither candidate, so nothing matches, but the
        // unknown-field failures are not propagated as errors.
        let err = dispatcher()
            .resolve(raw(&[("txn_id", Value::from("T1"))]))
            .unwrap_err();
        assert_eq!(err.code(), "PX_NO_MATCHING_TXN_TYPE");
    }

    #[test]
    fn test_raw_path_constraint_violation_propagates() {
        let err = dispatcher()
            .resolve(raw(&[
                ("amount", Value::from("bogus")),
                ("currency", Value::from("NZD")),
                ("billing_id", Value::from("B1")),
            ]))
            .unwrap_err();
        assert_eq!(err.code(), "PX_CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_empty_call_is_missing_arguments() {
        let err = dispatcher().resolve(Payload::new()).unwrap_err();
        assert_eq!(err, TxnError::MissingArguments);
    }

    #[test]
    fn test_candidate_order_decides_first_match() {
        // A payload satisfying the card shape must not be claimed by the
        // token schema even though both are candidates.
        let payload = raw(&[
            ("amount", Value::from("5.00")),
            ("currency", Value::from("NZD")),
            ("card_number", Value::from("4111111111111111")),
            ("cvc2", Value::from("123")),
        ]);
        assert!(dispatcher().resolve(payload).is_ok());
    }
}
