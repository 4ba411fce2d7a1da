//! pxclient - transaction schema and validation core for the Payment
//! Express PxPost and PxFusion gateways.
//!
//! Callers assemble a [`txn::Transaction`] against one of the catalog
//! schemas (or hand raw field values to a [`txn::Dispatcher`]) and receive
//! back a validated, coerced [`wire::Payload`] ready for a transport layer
//! to serialize.

pub mod pxfusion;
pub mod pxpost;
pub mod txn;
pub mod wire;
