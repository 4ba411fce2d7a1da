//! Closed value sets shared by the gateway schema catalogs.

/// ISO 4217 alpha codes the gateway settles in.
pub const CURRENCY_CHOICES: &[&str] = &[
    "AUD", "BND", "CAD", "CHF", "DKK", "EUR", "FJD", "GBP", "HKD", "INR", "JPY", "KWD", "MYR",
    "NOK", "NZD", "PGK", "PHP", "PKR", "SBD", "SEK", "SGD", "THB", "TOP", "TWD", "USD", "VUV",
    "WST", "ZAR",
];

/// CVC2 presence indicator values.
pub const CVC2_CHOICES: &[i64] = &[0, 1, 2, 9];

/// Address-verification action values.
pub const AVS_CHOICES: &[i64] = &[0, 1, 2, 3];
