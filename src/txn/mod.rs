//! Transaction schema and validation subsystem.
//!
//! Declarative field definitions with coercion and constraint checking,
//! schema composition with inheritance, instance validation, and the
//! dual-mode dispatch that resolves raw field values against a set of
//! accepted schemas.
//!
//! # Design principles
//!
//! - Field definitions are immutable metadata; instances own their values
//! - Every declaration mistake fails schema registration, not first use
//! - Validation is synchronous, deterministic, and free of I/O
//! - Every failure is recoverable by the caller supplying corrected input

pub mod choices;
mod dispatch;
mod error;
mod field;
mod schema;
mod transaction;
mod value;

pub use dispatch::{Dispatcher, TransactionArg};
pub use error::{SchemaError, SchemaResult, TxnError, TxnResult};
pub use field::{FieldDef, FieldKind, FieldSpec, Violation};
pub use schema::{Schema, SchemaBuilder};
pub use transaction::Transaction;
pub use value::Value;

pub use rust_decimal::{Decimal, RoundingStrategy};
