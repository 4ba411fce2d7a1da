//! Field declarations and the compiled field contract.
//!
//! A [`FieldSpec`] is the declaration-time description of one attribute:
//! kind, constraints, default, choice set. `SchemaBuilder::build` compiles
//! specs into immutable [`FieldDef`]s, at which point patterns are compiled
//! and defaults are checked against the field's own constraints. Instances
//! hold values; a `FieldDef` holds metadata only.
//!
//! Kind semantics:
//! - string: optional inclusive `max_length`, optional `pattern` anchored at
//!   the start of the value (trailing input beyond the match is tolerated)
//! - boolean: strictly boolean on input, presented as 0/1 on read
//! - integer: whole numbers only, no coercion from numeric strings
//! - amount: any decimal-convertible input, coerced eagerly at assignment;
//!   presented quantized to 2 fractional digits on every read

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::value::Value;

/// A failed constraint check, without field-name context.
///
/// The schema and instance layers attach the field name when surfacing this
/// as a `TxnError::Constraint`.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub expected: String,
    pub actual: String,
}

impl Violation {
    fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTag {
    String,
    Boolean,
    Integer,
    Amount,
}

impl KindTag {
    fn name(self) -> &'static str {
        match self {
            KindTag::String => "string",
            KindTag::Boolean => "boolean",
            KindTag::Integer => "integer",
            KindTag::Amount => "amount",
        }
    }
}

/// Declaration-time field description. Compiled into a [`FieldDef`] by
/// `SchemaBuilder::build`.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    kind: KindTag,
    required: bool,
    default: Option<Value>,
    choices: Option<Vec<Value>>,
    max_length: Option<usize>,
    pattern: Option<String>,
    rounding: Option<RoundingStrategy>,
}

impl FieldSpec {
    fn new(kind: KindTag) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            choices: None,
            max_length: None,
            pattern: None,
            rounding: None,
        }
    }

    /// A text field.
    pub fn string() -> Self {
        Self::new(KindTag::String)
    }

    /// A strictly-boolean field, presented as 0/1 on read.
    pub fn boolean() -> Self {
        Self::new(KindTag::Boolean)
    }

    /// A whole-number field.
    pub fn integer() -> Self {
        Self::new(KindTag::Integer)
    }

    /// A fixed-point monetary field, banker's rounding to 2 digits.
    pub fn amount() -> Self {
        Self::new(KindTag::Amount)
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value returned when the field is unset. Checked against the
    /// field's own constraints at schema build.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts the field to a closed set of legal values.
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive maximum length, in characters. String fields only.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Pattern the value must match from its start. String fields only.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_owned());
        self
    }

    /// Overrides the rounding strategy used on read. Amount fields only.
    pub fn rounding(mut self, rounding: RoundingStrategy) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// Compiles the spec: checks constraint/kind fit, compiles the pattern,
    /// and coerces the default through the finished field.
    pub(crate) fn compile(self) -> Result<FieldDef, FieldIssue> {
        let misapplied = |constraint| FieldIssue::Misapplied {
            constraint,
            kind: self.kind.name(),
        };

        let kind = match self.kind {
            KindTag::String => {
                if self.rounding.is_some() {
                    return Err(misapplied("rounding"));
                }
                let pattern = match &self.pattern {
                    // Anchored so the value must match from its first
                    // character; trailing input is tolerated.
                    Some(pat) => Some(
                        Regex::new(&format!("^(?:{})", pat)).map_err(FieldIssue::Pattern)?,
                    ),
                    None => None,
                };
                FieldKind::String {
                    max_length: self.max_length,
                    pattern,
                }
            }
            tag => {
                if self.max_length.is_some() {
                    return Err(misapplied("max_length"));
                }
                if self.pattern.is_some() {
                    return Err(misapplied("pattern"));
                }
                match tag {
                    KindTag::Boolean => {
                        if self.rounding.is_some() {
                            return Err(misapplied("rounding"));
                        }
                        FieldKind::Boolean
                    }
                    KindTag::Integer => {
                        if self.rounding.is_some() {
                            return Err(misapplied("rounding"));
                        }
                        FieldKind::Integer
                    }
                    KindTag::Amount => FieldKind::Amount {
                        rounding: self
                            .rounding
                            .unwrap_or(RoundingStrategy::MidpointNearestEven),
                    },
                    KindTag::String => unreachable!(),
                }
            }
        };

        let mut def = FieldDef {
            kind,
            required: self.required,
            default: None,
            choices: self.choices,
        };

        if let Some(default) = self.default {
            if !default.is_null() {
                let coerced = def.coerce(default).map_err(FieldIssue::BadDefault)?;
                def.default = Some(coerced);
            }
        }

        Ok(def)
    }
}

/// Why a spec failed to compile. Wrapped with schema/field names by the
/// schema builder.
#[derive(Debug)]
pub(crate) enum FieldIssue {
    Pattern(regex::Error),
    Misapplied {
        constraint: &'static str,
        kind: &'static str,
    },
    BadDefault(Violation),
}

/// Compiled field kind with kind-specific constraints.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String {
        max_length: Option<usize>,
        pattern: Option<Regex>,
    },
    Boolean,
    Integer,
    Amount { rounding: RoundingStrategy },
}

/// Immutable, compiled field metadata. Holds no per-instance state.
#[derive(Debug, Clone)]
pub struct FieldDef {
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    choices: Option<Vec<Value>>,
}

impl FieldDef {
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The stored (already coerced) default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Checks a stored-form value against the field's constraints.
    ///
    /// Choice membership is checked first; `Null` is always valid apart
    /// from that.
    pub fn validate(&self, value: &Value) -> Result<(), Violation> {
        self.check_choices(value)?;

        if value.is_null() {
            return Ok(());
        }

        match &self.kind {
            FieldKind::String {
                max_length,
                pattern,
            } => {
                let s = match value {
                    Value::Str(s) => s,
                    other => return Err(Violation::new("a string", other.type_name())),
                };
                if let Some(max) = max_length {
                    if s.chars().count() > *max {
                        return Err(Violation::new(
                            format!("at most {} characters", max),
                            s.clone(),
                        ));
                    }
                }
                if let Some(pattern) = pattern {
                    if !pattern.is_match(s) {
                        return Err(Violation::new(
                            format!("a value matching {}", pattern.as_str()),
                            s.clone(),
                        ));
                    }
                }
            }
            FieldKind::Boolean => {
                if !matches!(value, Value::Bool(_)) {
                    return Err(Violation::new("a boolean", value.type_name()));
                }
            }
            FieldKind::Integer => {
                if !matches!(value, Value::Int(_)) {
                    return Err(Violation::new("a whole number", value.type_name()));
                }
            }
            FieldKind::Amount { .. } => {
                if !matches!(value, Value::Amount(_)) {
                    return Err(Violation::new("a decimal amount", value.type_name()));
                }
            }
        }

        Ok(())
    }

    /// Converts input into stored form and validates it.
    ///
    /// Amount input is converted to a decimal eagerly; input that cannot
    /// convert fails here, at assignment, never later. Choice membership is
    /// still judged on the raw input when conversion fails, so a choice
    /// violation wins over the conversion error.
    pub fn coerce(&self, value: Value) -> Result<Value, Violation> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let value = match &self.kind {
            FieldKind::Amount { .. } => match coerce_amount(value) {
                Ok(converted) => converted,
                Err((raw, violation)) => {
                    self.check_choices(&raw)?;
                    return Err(violation);
                }
            },
            _ => value,
        };

        self.validate(&value)?;
        Ok(value)
    }

    /// Presents a stored value for reading.
    ///
    /// Booleans re-expose as their integer form; amounts are quantized to
    /// exactly 2 fractional digits with the field's rounding strategy on
    /// every read, so repeated reads are idempotent and `1` renders as
    /// `1.00` on the wire.
    pub fn present(&self, value: &Value) -> Value {
        match (&self.kind, value) {
            (FieldKind::Boolean, Value::Bool(b)) => Value::Int(i64::from(*b)),
            (FieldKind::Amount { rounding }, Value::Amount(d)) => {
                let mut quantized = d.round_dp_with_strategy(2, *rounding);
                // Rounding only reduces scale; pad back out to d.dd.
                quantized.rescale(2);
                Value::Amount(quantized)
            }
            _ => value.clone(),
        }
    }

    /// The default as a caller would read it, or `None` when unset.
    pub fn presented_default(&self) -> Option<Value> {
        self.default.as_ref().map(|v| self.present(v))
    }

    fn check_choices(&self, value: &Value) -> Result<(), Violation> {
        if let Some(choices) = &self.choices {
            if !value.is_null() && !choices.contains(value) {
                return Err(Violation::new(
                    format!("one of [{}]", join_values(choices)),
                    value.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Converts amount input to a decimal, handing back the raw value alongside
/// the violation on failure so choice checks can still see the input.
fn coerce_amount(value: Value) -> Result<Value, (Value, Violation)> {
    let expected = "a decimal amount, number, or numeric string";
    match value {
        Value::Amount(d) => Ok(Value::Amount(d)),
        Value::Int(i) => Ok(Value::Amount(Decimal::from(i))),
        Value::Float(x) => match Decimal::from_f64(x) {
            Some(d) => Ok(Value::Amount(d)),
            None => {
                let violation = Violation::new(expected, x.to_string());
                Err((Value::Float(x), violation))
            }
        },
        Value::Str(s) => match s.parse::<Decimal>() {
            Ok(d) => Ok(Value::Amount(d)),
            Err(_) => {
                let violation = Violation::new(expected, s.clone());
                Err((Value::Str(s), violation))
            }
        },
        other => {
            let violation = Violation::new(expected, other.type_name());
            Err((other, violation))
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(spec: FieldSpec) -> FieldDef {
        spec.compile().unwrap()
    }

    #[test]
    fn test_choices() {
        let field = compiled(FieldSpec::string().choices(["choice1", "choice2"]));

        assert!(field.coerce("choice1".into()).is_ok());
        assert!(field.coerce("choice2".into()).is_ok());
        assert!(field.coerce("invalid choice".into()).is_err());
        // Null is exempt from choice checking.
        assert!(field.coerce(Value::Null).is_ok());
    }

    #[test]
    fn test_choices_checked_before_kind() {
        let field = compiled(FieldSpec::string().choices(["a"]));
        let violation = field.coerce(1.into()).unwrap_err();
        assert!(violation.expected.starts_with("one of"));
    }

    #[test]
    fn test_default_is_validated_at_compile() {
        assert!(FieldSpec::string()
            .max_length(3)
            .default("toolong")
            .compile()
            .is_err());

        let field = compiled(FieldSpec::string().default("initial"));
        assert_eq!(field.default_value(), Some(&Value::Str("initial".into())));
    }

    #[test]
    fn test_string_field() {
        let field = compiled(FieldSpec::string().max_length(5));

        assert_eq!(field.coerce("short".into()).unwrap(), Value::Str("short".into()));
        assert!(field.coerce(1.into()).is_err());
        assert!(field.coerce("toolong".into()).is_err());
    }

    #[test]
    fn test_string_pattern_is_anchored() {
        let field = compiled(FieldSpec::string().pattern(r"(0[1-9]|1[0-2])\d{2}"));

        assert!(field.coerce("0122".into()).is_ok());
        // Trailing characters beyond the matched prefix are tolerated.
        assert!(field.coerce("0122x".into()).is_ok());
        assert!(field.coerce("1322".into()).is_err());
        assert!(field.coerce("0022".into()).is_err());
        // Must match from the start, not merely somewhere in the value.
        assert!(field.coerce("x0122".into()).is_err());
    }

    #[test]
    fn test_boolean_field() {
        let field = compiled(FieldSpec::boolean());

        assert_eq!(field.coerce(true.into()).unwrap(), Value::Bool(true));
        assert_eq!(field.present(&Value::Bool(true)), Value::Int(1));
        assert_eq!(field.present(&Value::Bool(false)), Value::Int(0));

        // Numeric 0/1 are not booleans on input.
        assert!(field.coerce(1.into()).is_err());
        assert!(field.coerce("nonbool".into()).is_err());
        assert!(field.coerce(Value::Null).is_ok());
    }

    #[test]
    fn test_integer_field() {
        let field = compiled(FieldSpec::integer());

        assert_eq!(field.coerce(12345.into()).unwrap(), Value::Int(12345));
        assert!(field.coerce("nonint".into()).is_err());
        assert!(field.coerce("123".into()).is_err());
        assert!(field.coerce(Value::Null).is_ok());
    }

    #[test]
    fn test_amount_field_round_down() {
        let field = compiled(FieldSpec::amount().rounding(RoundingStrategy::ToZero));
        let expected: Decimal = "1.10".parse().unwrap();

        for input in [
            Value::Amount("1.105".parse().unwrap()),
            Value::Float(1.105),
            Value::Str("1.105".into()),
        ] {
            let stored = field.coerce(input).unwrap();
            assert_eq!(field.present(&stored), Value::Amount(expected));
        }

        let stored = field.coerce("1".into()).unwrap();
        assert_eq!(field.present(&stored).to_string(), "1.00");
    }

    #[test]
    fn test_amount_field_bankers_rounding_default() {
        let field = compiled(FieldSpec::amount());

        // Exact half rounds to even on the string-input path.
        let stored = field.coerce("1.105".into()).unwrap();
        assert_eq!(field.present(&stored).to_string(), "1.10");

        let stored = field.coerce("1.115".into()).unwrap();
        assert_eq!(field.present(&stored).to_string(), "1.12");
    }

    #[test]
    fn test_amount_field_rejects_bad_input_eagerly() {
        let field = compiled(FieldSpec::amount());
        assert!(field.coerce("invalid".into()).is_err());
        assert!(field.coerce(true.into()).is_err());
    }

    #[test]
    fn test_amount_presentation_pads_to_two_digits() {
        let field = compiled(FieldSpec::amount());
        for (input, expected) in [("1", "1.00"), ("1.1", "1.10"), ("10", "10.00")] {
            let stored = field.coerce(input.into()).unwrap();
            assert_eq!(field.present(&stored).to_string(), expected);
        }
    }

    #[test]
    fn test_amount_choices_checked_before_conversion() {
        let field = compiled(
            FieldSpec::amount().choices(["1.00".parse::<Decimal>().unwrap()]),
        );

        // A value failing both checks reports the choice violation.
        let violation = field.coerce("bogus".into()).unwrap_err();
        assert!(violation.expected.starts_with("one of"));

        // Convertible input is judged against the choices post-conversion.
        assert!(field.coerce("1.00".into()).is_ok());
        let violation = field.coerce("2.00".into()).unwrap_err();
        assert!(violation.expected.starts_with("one of"));
    }

    #[test]
    fn test_amount_presentation_is_idempotent() {
        let field = compiled(FieldSpec::amount());
        let stored = field.coerce("10.123".into()).unwrap();

        let once = field.present(&stored);
        let twice = field.present(&once);
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), "10.12");
    }

    #[test]
    fn test_two_fields_may_present_one_value_differently() {
        let bankers = compiled(FieldSpec::amount());
        let down = compiled(FieldSpec::amount().rounding(RoundingStrategy::ToZero));

        let stored = bankers.coerce("1.119".parse::<Decimal>().unwrap().into()).unwrap();
        assert_eq!(bankers.present(&stored).to_string(), "1.12");
        assert_eq!(down.present(&stored).to_string(), "1.11");
    }

    #[test]
    fn test_misapplied_constraints_fail_compile() {
        assert!(FieldSpec::integer().max_length(5).compile().is_err());
        assert!(FieldSpec::boolean().pattern("x").compile().is_err());
        assert!(FieldSpec::string().rounding(RoundingStrategy::ToZero).compile().is_err());
    }

    #[test]
    fn test_bad_pattern_fails_compile() {
        assert!(FieldSpec::string().pattern("(unclosed").compile().is_err());
    }
}
