//! PxFusion schema catalog.
//!
//! PxFusion splits a payment across two calls: the merchant requests a
//! transaction id server-side (without card data), the gateway collects the
//! card, and the merchant then queries or cancels by transaction id. The
//! get-transaction-id shape carries the optional airline passenger
//! itinerary block the gateway forwards to card schemes.

use crate::txn::Dispatcher;

/// Transaction-type tags for the get-transaction-id call.
pub const AUTHORIZE: &str = "Auth";
pub const PURCHASE: &str = "Purchase";

pub mod schemas {
    //! The PxFusion request shapes.

    use std::sync::LazyLock;

    use crate::txn::choices::{AVS_CHOICES, CURRENCY_CHOICES};
    use crate::txn::{FieldSpec, Schema};

    const MONTH_YEAR: &str = r"(0[1-9]|1[0-2])\d{2}";
    const DEPART_DATE: &str = r"\d{4}(0[1-9]|1[1-2])([0-2][1-9]|3[01])";

    static GET_TRANSACTION: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxFusionGetTransaction")
            .field("amount", FieldSpec::amount().required())
            .field(
                "currency",
                FieldSpec::string()
                    .choices(CURRENCY_CHOICES.iter().copied())
                    .required(),
            )
            .field("return_url", FieldSpec::string().max_length(255).required())
            .field("txn_ref", FieldSpec::string().max_length(16).required())
            .field("enable_add_bill_card", FieldSpec::boolean())
            .field(
                "avs_action",
                FieldSpec::integer().choices(AVS_CHOICES.iter().copied()),
            )
            .field("avs_post_code", FieldSpec::string().max_length(20))
            .field("avs_street_address", FieldSpec::string().max_length(60))
            .field("billing_id", FieldSpec::string().max_length(32))
            .field("date_start", FieldSpec::string().pattern(MONTH_YEAR))
            .field("enable_avs_data", FieldSpec::boolean())
            .field("enable_pax_info", FieldSpec::boolean())
            .field("merchant_reference", FieldSpec::string().max_length(64))
            .field("pax_carrier", FieldSpec::string().max_length(2))
            .field("pax_carrier_2", FieldSpec::string().max_length(2))
            .field("pax_carrier_3", FieldSpec::string().max_length(2))
            .field("pax_carrier_4", FieldSpec::string().max_length(2))
            .field("pax_class_1", FieldSpec::string().max_length(1))
            .field("pax_class_2", FieldSpec::string().max_length(1))
            .field("pax_class_3", FieldSpec::string().max_length(1))
            .field("pax_class_4", FieldSpec::string().max_length(1))
            .field("pax_date2", FieldSpec::string().max_length(20))
            .field("pax_date3", FieldSpec::string().max_length(20))
            .field("pax_date4", FieldSpec::string().max_length(20))
            .field("pax_date_depart", FieldSpec::string().pattern(DEPART_DATE))
            .field("pax_fare_basis1", FieldSpec::string().max_length(6))
            .field("pax_fare_basis2", FieldSpec::string().max_length(6))
            .field("pax_fare_basis3", FieldSpec::string().max_length(6))
            .field("pax_fare_basis4", FieldSpec::string().max_length(6))
            .field("pax_flight_number1", FieldSpec::string().max_length(6))
            .field("pax_flight_number2", FieldSpec::string().max_length(6))
            .field("pax_flight_number3", FieldSpec::string().max_length(6))
            .field("pax_flight_number4", FieldSpec::string().max_length(6))
            .field("pax_leg1", FieldSpec::string().max_length(3))
            .field("pax_leg2", FieldSpec::string().max_length(3))
            .field("pax_leg3", FieldSpec::string().max_length(3))
            .field("pax_leg4", FieldSpec::string().max_length(3))
            .field("pax_name", FieldSpec::string().max_length(20))
            .field("pax_origin", FieldSpec::string().max_length(3))
            .field("pax_stop_over_code1", FieldSpec::string().max_length(1))
            .field("pax_stop_over_code2", FieldSpec::string().max_length(1))
            .field("pax_stop_over_code3", FieldSpec::string().max_length(1))
            .field("pax_stop_over_code4", FieldSpec::string().max_length(1))
            .field("pax_ticket_number", FieldSpec::string().max_length(10))
            .field("pax_time1", FieldSpec::string().max_length(4))
            .field("pax_time2", FieldSpec::string().max_length(4))
            .field("pax_time3", FieldSpec::string().max_length(4))
            .field("pax_time4", FieldSpec::string().max_length(4))
            .field("pax_travel_agent_info", FieldSpec::string().max_length(25))
            .field("txn_data1", FieldSpec::string().max_length(255))
            .field("txn_data2", FieldSpec::string().max_length(255))
            .field("txn_data3", FieldSpec::string().max_length(255))
            .build()
            .expect("PxFusion get-transaction schema")
    });

    static CANCEL: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxFusionCancelTransaction")
            .field(
                "transaction_id",
                FieldSpec::string().max_length(32).required(),
            )
            .build()
            .expect("PxFusion cancel schema")
    });

    static STATUS: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxFusionStatusTransaction")
            .field(
                "transaction_id",
                FieldSpec::string().max_length(32).required(),
            )
            .build()
            .expect("PxFusion status schema")
    });

    /// The server-side GetTransactionId call. No card data ever appears
    /// here; the gateway collects it from the cardholder directly.
    pub fn get_transaction() -> &'static Schema {
        &GET_TRANSACTION
    }

    /// Cancels a pending session by transaction id.
    pub fn cancel() -> &'static Schema {
        &CANCEL
    }

    /// Queries the outcome after the cardholder returns.
    pub fn status() -> &'static Schema {
        &STATUS
    }
}

/// Authorization: amount reserved, no funds transferred.
pub fn authorize() -> Dispatcher<'static> {
    Dispatcher::new([schemas::get_transaction()])
}

/// Purchase: funds transfer immediately.
pub fn purchase() -> Dispatcher<'static> {
    Dispatcher::new([schemas::get_transaction()])
}

pub fn status() -> Dispatcher<'static> {
    Dispatcher::new([schemas::status()])
}

pub fn cancel() -> Dispatcher<'static> {
    Dispatcher::new([schemas::cancel()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::{Transaction, Value};

    #[test]
    fn test_get_transaction_required_set() {
        let schema = schemas::get_transaction();
        let required: Vec<_> = schema.required().iter().map(String::as_str).collect();
        assert_eq!(required, ["amount", "currency", "return_url", "txn_ref"]);
    }

    #[test]
    fn test_pax_constraints() {
        let mut txn = Transaction::empty(schemas::get_transaction());
        assert!(txn.set("pax_carrier", "NZ").is_ok());
        assert!(txn.set("pax_carrier", "NZL").is_err());
        assert!(txn.set("pax_date_depart", "20260215").is_ok());
        assert!(txn.set("pax_date_depart", "2026-02").is_err());
    }

    #[test]
    fn test_cancel_requires_transaction_id() {
        let txn = Transaction::empty(schemas::cancel());
        assert!(!txn.is_valid());

        let txn = Transaction::new(
            schemas::cancel(),
            [("transaction_id", Value::from("b0e648a3a7a5"))],
        )
        .unwrap();
        assert!(cancel().resolve(txn).is_ok());
    }
}
