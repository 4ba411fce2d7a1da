//! Transaction instances: a bag of field values bound to a schema.
//!
//! Every value moves through the owning field's coercion on the way in and
//! its presentation transform on the way out. Instances own their value map
//! outright — field definitions hold no per-instance state, so two
//! instances never interfere.

use indexmap::IndexMap;

use super::error::{TxnError, TxnResult};
use super::schema::Schema;
use super::value::Value;
use crate::wire::Payload;

/// A live binding of a [`Schema`] to concrete field values.
#[derive(Debug)]
pub struct Transaction<'a> {
    schema: &'a Schema,
    values: IndexMap<String, Value>,
}

impl<'a> Transaction<'a> {
    /// Constructs an instance, assigning each supplied pair through the
    /// field contract.
    ///
    /// Fails fast with `UnknownField` on any name the schema does not
    /// declare; nothing is partially constructed. Unsupplied fields stay
    /// unset and read as their defaults.
    pub fn new<I, K, V>(schema: &'a Schema, values: I) -> TxnResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut txn = Self {
            schema,
            values: IndexMap::new(),
        };
        for (name, value) in values {
            txn.set(&name.into(), value)?;
        }
        Ok(txn)
    }

    /// An instance with every field unset.
    pub fn empty(schema: &'a Schema) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Assigns one field through coercion and validation.
    ///
    /// Assigning `Null` stores an explicit null, which shadows the field's
    /// default until [`clear`](Self::clear) removes it. A failed assignment
    /// leaves every other field untouched.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> TxnResult<()> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| TxnError::UnknownField {
                schema: self.schema.name().to_owned(),
                field: name.to_owned(),
            })?;

        match field.coerce(value.into()) {
            Ok(stored) => {
                self.values.insert(name.to_owned(), stored);
                Ok(())
            }
            Err(violation) => Err(TxnError::Constraint {
                field: name.to_owned(),
                expected: violation.expected,
                actual: violation.actual,
            }),
        }
    }

    /// Removes any stored value so the field reads as its default again.
    pub fn clear(&mut self, name: &str) -> TxnResult<()> {
        if self.schema.field(name).is_none() {
            return Err(TxnError::UnknownField {
                schema: self.schema.name().to_owned(),
                field: name.to_owned(),
            });
        }
        self.values.shift_remove(name);
        Ok(())
    }

    /// Reads one field's presented value.
    ///
    /// An unset field falls back to the presented default; `None` means the
    /// field resolves to nothing (unset with no default, explicitly nulled,
    /// or an unknown name).
    pub fn get(&self, name: &str) -> Option<Value> {
        let field = self.schema.field(name)?;
        match self.values.get(name) {
            Some(Value::Null) => None,
            Some(stored) => Some(field.present(stored)),
            None => field.presented_default(),
        }
    }

    /// Fails with `MissingRequiredFields` listing every required name that
    /// resolves to unset.
    pub fn validate(&self) -> TxnResult<()> {
        let missing: Vec<String> = self
            .schema
            .required()
            .iter()
            .filter(|name| self.get(name).is_none())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TxnError::MissingRequiredFields {
                schema: self.schema.name().to_owned(),
                missing,
            })
        }
    }

    /// `validate` without the error.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Reduces the instance to a plain field mapping in schema declaration
    /// order, skipping unset fields. Defaulted fields are included because
    /// their value resolves, not because they were assigned.
    ///
    /// This is the only supported payload extraction.
    pub fn to_mapping(&self) -> Payload {
        self.schema
            .fields()
            .keys()
            .filter_map(|name| self.get(name).map(|value| (name.clone(), value)))
            .collect()
    }
}
