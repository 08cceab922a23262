//! core types for trigger conditions

use std::fmt;

use serde::{Deserialize, Serialize};

/// comparison operators a rule can apply to its trigger value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    StartsWith,
    EndsWith,
    /// unrecognized name, compared with plain equality
    Other(String),
}

impl Operator {
    /// parse one of the nine camelCase operator names
    ///
    /// anything else, `gt` and `==` included, is unknown and the rule falls
    /// back to equality.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "equal" => Some(Operator::Equal),
            "notEqual" => Some(Operator::NotEqual),
            "greaterThan" => Some(Operator::GreaterThan),
            "lessThan" => Some(Operator::LessThan),
            "greaterThanOrEqual" => Some(Operator::GreaterThanOrEqual),
            "lessThanOrEqual" => Some(Operator::LessThanOrEqual),
            "contains" => Some(Operator::Contains),
            "startsWith" => Some(Operator::StartsWith),
            "endsWith" => Some(Operator::EndsWith),
            _ => None,
        }
    }

    /// canonical configuration name
    pub fn name(&self) -> &str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "notEqual",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Other(_))
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        Operator::parse(&s).unwrap_or(Operator::Other(s))
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Operator::parse(s).unwrap_or_else(|| Operator::Other(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Operator::from(String::deserialize(deserializer)?))
    }
}

/// a configured trigger value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerValue {
    Number(f64),
    String(String),
}

impl TriggerValue {
    /// numeric view: numbers as-is, strings through [`parse_float`]
    pub fn as_f64(&self) -> f64 {
        match self {
            TriggerValue::Number(n) => *n,
            TriggerValue::String(s) => parse_float(s),
        }
    }
}

impl From<&str> for TriggerValue {
    fn from(s: &str) -> Self {
        TriggerValue::String(s.to_string())
    }
}

impl From<String> for TriggerValue {
    fn from(s: String) -> Self {
        TriggerValue::String(s)
    }
}

impl From<f64> for TriggerValue {
    fn from(n: f64) -> Self {
        TriggerValue::Number(n)
    }
}

impl From<i64> for TriggerValue {
    fn from(n: i64) -> Self {
        TriggerValue::Number(n as f64)
    }
}

impl From<i32> for TriggerValue {
    fn from(n: i32) -> Self {
        TriggerValue::Number(f64::from(n))
    }
}

/// strings print raw, numbers print the way a browser stringifies them
/// (`3`, `2.5`, `NaN`, `Infinity`, `1e+21`, `1.5e-7`)
impl fmt::Display for TriggerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerValue::String(s) => write!(f, "{}", s),
            TriggerValue::Number(n) if n.is_nan() => write!(f, "NaN"),
            TriggerValue::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            // -0 prints as 0
            TriggerValue::Number(n) if *n == 0.0 => write!(f, "0"),
            // exponent form outside [1e-6, 1e21), with an explicit `+`
            TriggerValue::Number(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => {
                let formatted = format!("{:e}", n);
                match formatted.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{}e+{}", mantissa, exp)
                    }
                    _ => write!(f, "{}", formatted),
                }
            }
            TriggerValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// one configured value or a list of them; always read as a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerValues {
    One(TriggerValue),
    Many(Vec<TriggerValue>),
}

impl TriggerValues {
    pub fn into_vec(self) -> Vec<TriggerValue> {
        match self {
            TriggerValues::One(v) => vec![v],
            TriggerValues::Many(v) => v,
        }
    }

    pub fn to_vec(&self) -> Vec<TriggerValue> {
        self.clone().into_vec()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TriggerValues::Many(v) if v.is_empty())
    }
}

impl From<TriggerValue> for TriggerValues {
    fn from(v: TriggerValue) -> Self {
        TriggerValues::One(v)
    }
}

impl From<Vec<TriggerValue>> for TriggerValues {
    fn from(v: Vec<TriggerValue>) -> Self {
        TriggerValues::Many(v)
    }
}

impl From<&str> for TriggerValues {
    fn from(v: &str) -> Self {
        TriggerValues::One(v.into())
    }
}

impl From<f64> for TriggerValues {
    fn from(v: f64) -> Self {
        TriggerValues::One(v.into())
    }
}

impl From<i32> for TriggerValues {
    fn from(v: i32) -> Self {
        TriggerValues::One(v.into())
    }
}

impl From<&[&str]> for TriggerValues {
    fn from(v: &[&str]) -> Self {
        TriggerValues::Many(v.iter().map(|s| TriggerValue::from(*s)).collect())
    }
}

/// lenient float parsing: the longest numeric prefix after leading whitespace
///
/// `"12px"` → 12, `" -3.5e2x"` → -350, `"Infinity"` → ∞, `"abc"` → NaN.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}
