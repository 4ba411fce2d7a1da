//! Wire-mapping boundary helpers.
//!
//! A validated transaction reduces to a [`Payload`] — the plain
//! name-to-value mapping the (out-of-scope) transport serializes. Domain
//! field names are snake_case; the gateway's XML/SOAP elements are
//! UpperCamelCase. The helpers here convert between the two so a transport
//! layer never hand-maintains name tables.

use convert_case::{Boundary, Case, Casing, Converter};
use indexmap::IndexMap;

use crate::txn::Value;

/// Plain field mapping in schema declaration order.
pub type Payload = IndexMap<String, Value>;

/// Converts a domain field name to its wire element name.
///
/// `date_expiry` becomes `DateExpiry`.
pub fn wire_name(field: &str) -> String {
    field.to_case(Case::Pascal)
}

/// Converts a wire element name back to the domain field name.
///
/// `DpsTxnRef` becomes `dps_txn_ref`. Words split only on case changes,
/// never around digits, so `Cvc2` and `TxnData1` come back as the field
/// names the schemas declare (`cvc2`, `txn_data1`), not `cvc_2`.
pub fn field_name(element: &str) -> String {
    Converter::new()
        .set_boundaries(&[Boundary::LowerUpper, Boundary::Acronym])
        .to_case(Case::Snake)
        .convert(element)
}

/// Re-keys a payload with wire element names, for serialization.
pub fn wire_keys(payload: &Payload) -> Payload {
    payload
        .iter()
        .map(|(name, value)| (wire_name(name), value.clone()))
        .collect()
}

/// Re-keys a response mapping with domain field names.
pub fn field_keys(response: &Payload) -> Payload {
    response
        .iter()
        .map(|(name, value)| (field_name(name), value.clone()))
        .collect()
}
