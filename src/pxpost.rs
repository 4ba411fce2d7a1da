//! PxPost schema catalog.
//!
//! One schema per PxPost request shape, registered once at first use. The
//! dispatcher constructors mirror the accepted-shape sets of the gateway's
//! operations: the payment operations take any of the card, stored-token,
//! or custom-token shapes; completion, refund, and status each take exactly
//! one.

use crate::txn::Dispatcher;

/// Transaction-type tags the façade attaches before handing the payload to
/// a transport.
pub const AUTHORIZE: &str = "Auth";
pub const PURCHASE: &str = "Purchase";
pub const COMPLETE: &str = "Complete";
pub const REFUND: &str = "Refund";
pub const VALIDATE: &str = "Validate";
pub const STATUS: &str = "Status";

pub mod schemas {
    //! The PxPost request shapes.

    use std::sync::LazyLock;

    use crate::txn::choices::{AVS_CHOICES, CURRENCY_CHOICES, CVC2_CHOICES};
    use crate::txn::{FieldSpec, Schema};

    /// MMYY expiry-style dates.
    const MONTH_YEAR: &str = r"(0[1-9]|1[0-2])\d{2}";

    /// Fields common to every PxPost payment shape.
    static BASE: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostBaseTransaction")
            .field("amount", FieldSpec::amount().required())
            .field(
                "input_currency",
                FieldSpec::string()
                    .choices(CURRENCY_CHOICES.iter().copied())
                    .required(),
            )
            .field("dps_txn_ref", FieldSpec::string().max_length(16))
            .field("card_holder_name", FieldSpec::string().max_length(64))
            .field("card_number", FieldSpec::string().max_length(20))
            .field("date_expiry", FieldSpec::string().pattern(MONTH_YEAR))
            .field("cvc2", FieldSpec::string().max_length(4))
            .field("dps_billing_id", FieldSpec::string().max_length(16))
            .field("billing_id", FieldSpec::string().max_length(32))
            .field(
                "cvc2_presence",
                FieldSpec::integer().choices(CVC2_CHOICES.iter().copied()),
            )
            .field("enable_add_bill_card", FieldSpec::boolean())
            .field("merchant_reference", FieldSpec::string().max_length(64))
            .field("txn_data1", FieldSpec::string().max_length(255))
            .field("txn_data2", FieldSpec::string().max_length(255))
            .field("txn_data3", FieldSpec::string().max_length(255))
            .field("txn_id", FieldSpec::string().max_length(16))
            .field("enable_avs_data", FieldSpec::boolean())
            .field(
                "avs_action",
                FieldSpec::integer().choices(AVS_CHOICES.iter().copied()),
            )
            .field("avs_post_code", FieldSpec::string().max_length(20))
            .field("avs_street_address", FieldSpec::string().max_length(60))
            .field("issue_number", FieldSpec::integer())
            .field("date_start", FieldSpec::string().pattern(MONTH_YEAR))
            .field("track2", FieldSpec::string().max_length(37))
            .build()
            .expect("PxPost base schema")
    });

    static CARD: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostCardTransaction")
            .extends(&BASE)
            .field(
                "card_holder_name",
                FieldSpec::string().max_length(64).required(),
            )
            .field("card_number", FieldSpec::string().max_length(20).required())
            .field(
                "date_expiry",
                FieldSpec::string().pattern(MONTH_YEAR).required(),
            )
            .field("cvc2", FieldSpec::string().max_length(4).required())
            .build()
            .expect("PxPost card schema")
    });

    static DPS_BILLING: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostDpsBillingTransaction")
            .extends(&BASE)
            .field(
                "dps_billing_id",
                FieldSpec::string().max_length(16).required(),
            )
            .build()
            .expect("PxPost dps billing schema")
    });

    static BILLING: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostBillingTransaction")
            .extends(&BASE)
            .field("billing_id", FieldSpec::string().max_length(32).required())
            .build()
            .expect("PxPost billing schema")
    });

    static COMPLETE: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostCompleteTransaction")
            .field("dps_txn_ref", FieldSpec::string().max_length(16).required())
            .field("amount", FieldSpec::amount())
            .field(
                "input_currency",
                FieldSpec::string().choices(CURRENCY_CHOICES.iter().copied()),
            )
            .build()
            .expect("PxPost complete schema")
    });

    static REFUND: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostRefundTransaction")
            .field("amount", FieldSpec::amount().required())
            .field("dps_txn_ref", FieldSpec::string().max_length(16).required())
            .field("merchant_reference", FieldSpec::string().max_length(64))
            .build()
            .expect("PxPost refund schema")
    });

    static STATUS: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("PxPostStatusTransaction")
            .field("txn_id", FieldSpec::string().max_length(16).required())
            .build()
            .expect("PxPost status schema")
    });

    /// Payment with full card details.
    pub fn card() -> &'static Schema {
        &CARD
    }

    /// Payment with a gateway-issued billing token.
    pub fn dps_billing() -> &'static Schema {
        &DPS_BILLING
    }

    /// Payment with a merchant-supplied billing token.
    pub fn billing() -> &'static Schema {
        &BILLING
    }

    /// Settlement of a prior authorization.
    pub fn complete() -> &'static Schema {
        &COMPLETE
    }

    pub fn refund() -> &'static Schema {
        &REFUND
    }

    pub fn status() -> &'static Schema {
        &STATUS
    }
}

/// Accepts any payment shape. Authorizations must be completed within 7
/// days via [`complete`].
pub fn authorize() -> Dispatcher<'static> {
    Dispatcher::new([schemas::card(), schemas::dps_billing(), schemas::billing()])
}

/// Accepts any payment shape; funds transfer immediately.
pub fn purchase() -> Dispatcher<'static> {
    Dispatcher::new([schemas::card(), schemas::dps_billing(), schemas::billing()])
}

/// Accepts the completion shape (settles a pre-approved authorization).
pub fn complete() -> Dispatcher<'static> {
    Dispatcher::new([schemas::complete()])
}

pub fn refund() -> Dispatcher<'static> {
    Dispatcher::new([schemas::refund()])
}

/// Card validation ($1.00 authorization); card shape only.
pub fn validate() -> Dispatcher<'static> {
    Dispatcher::new([schemas::card()])
}

/// Status recovery for a transaction posted with a `txn_id`.
pub fn status() -> Dispatcher<'static> {
    Dispatcher::new([schemas::status()])
}
