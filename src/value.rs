use std::fmt;

use serde::ser::{Serialize, Serializer};

/// A single field value.
///
/// Untyped parses only produce `Value::String`. With the `typed` option,
/// the parser runs every field through `infer_type`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text, stored verbatim.
    String(String),
    /// The exact literals `true` or `false`.
    Bool(bool),
    /// A signed decimal integer that fits in an `i64`.
    Int(i64),
    /// A finite decimal number with a fractional point or an exponent.
    Float(f64),
}

/// Infer the type of a raw field.
///
/// The grammar is strict so that inference never changes text that merely
/// looks numeric:
///
/// * `true` and `false`, exactly, are booleans.
/// * An optional `+` or `-` followed by one or more digits is an integer,
///   provided it fits in an `i64`.
/// * An optional `+` or `-`, then digits with at most one `.` (either side
///   of the point may be empty, but not both), then an optional exponent
///   (`e` or `E`, an optional sign and one or more digits) is a float,
///   provided it has a point or an exponent and is finite as an `f64`.
///
/// Every float the writer produces, including exponent forms like `1e-7`,
/// reads back as the same float.
///
/// Everything else, including the empty string, surrounding whitespace,
/// `inf`, `NaN` and numbers too large for an `f64`, is returned as a string.
/// This function never fails.
///
/// # Example
///
/// ```
/// use csv_table::{infer_type, Value};
///
/// assert_eq!(infer_type("false"), Value::Bool(false));
/// assert_eq!(infer_type("-12"), Value::Int(-12));
/// assert_eq!(infer_type("2.5"), Value::Float(2.5));
/// assert_eq!(infer_type("1e-7"), Value::Float(0.0000001));
/// assert_eq!(infer_type("1e999"), Value::from("1e999"));
/// ```
pub fn infer_type(raw: &str) -> Value {
    Value::infer(raw.to_string())
}

impl Value {
    /// Infer the type of a raw field, reusing its allocation when the result
    /// is a string. See `infer_type` for the grammar.
    pub fn infer(raw: String) -> Value {
        match raw.as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        match Number::classify(&raw) {
            Some(Number::Float) => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Float(n),
                _ => Value::String(raw),
            },
            Some(Number::Int) => match raw.parse() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::String(raw),
            },
            None => Value::String(raw),
        }
    }

    pub(crate) fn from_field(raw: String, typed: bool) -> Value {
        if typed {
            Value::infer(raw)
        } else {
            Value::String(raw)
        }
    }

    /// Returns the text if this is a `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the integer if this is a `Value::Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the number if this is a `Value::Int` or `Value::Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(n) => Some(n as f64),
            Value::Float(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if this is a `Value::String`.
    pub fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    /// Convert this value into its field text.
    ///
    /// Strings are returned as is. Other values are formatted the same way
    /// the writer formats them.
    pub fn into_string(self) -> String {
        match self {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => itoa::Buffer::new().format(n).to_string(),
            Value::Float(n) => ryu::Buffer::new().format(n).to_string(),
        }
    }
}

/// The numeric shapes recognized by `infer_type`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Number {
    Int,
    Float,
}

impl Number {
    fn classify(raw: &str) -> Option<Number> {
        let bytes = unsigned(raw.as_bytes());
        let (mantissa, exponent) =
            match bytes.iter().position(|&b| b == b'e' || b == b'E') {
                Some(i) => (&bytes[..i], Some(unsigned(&bytes[i + 1..]))),
                None => (bytes, None),
            };
        let mut digits = 0;
        let mut points = 0;
        for &b in mantissa {
            match b {
                b'0'..=b'9' => digits += 1,
                b'.' => points += 1,
                _ => return None,
            }
        }
        if digits == 0 || points > 1 {
            return None;
        }
        match exponent {
            Some(exp) if exp.is_empty() => None,
            Some(exp) if !exp.iter().all(u8::is_ascii_digit) => None,
            Some(_) => Some(Number::Float),
            None if points == 0 => Some(Number::Int),
            None => Some(Number::Float),
        }
    }
}

fn unsigned(bytes: &[u8]) -> &[u8] {
    match bytes.first() {
        Some(b'+') | Some(b'-') => &bytes[1..],
        _ => bytes,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::String(ref s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => f.write_str(itoa::Buffer::new().format(n)),
            Value::Float(n) => f.write_str(ryu::Buffer::new().format(n)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::String(ref v) => s.serialize_str(v),
            Value::Bool(v) => s.serialize_bool(v),
            Value::Int(v) => s.serialize_i64(v),
            Value::Float(v) => s.serialize_f64(v),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl<'a> PartialEq<&'a str> for Value {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::{infer_type, Value};

    macro_rules! infers {
        ($name:ident, $raw:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(infer_type($raw), $expected);
            }
        };
    }

    infers!(bool_true, "true", Value::Bool(true));
    infers!(bool_false, "false", Value::Bool(false));
    infers!(bool_case_sensitive, "True", Value::from("True"));
    infers!(int, "3", Value::Int(3));
    infers!(int_negative, "-42", Value::Int(-42));
    infers!(int_plus, "+7", Value::Int(7));
    infers!(int_leading_zeros, "007", Value::Int(7));
    infers!(int_overflow, "99999999999999999999", Value::from("99999999999999999999"));
    infers!(float, "2.5", Value::Float(2.5));
    infers!(float_negative, "-0.25", Value::Float(-0.25));
    infers!(float_no_fraction, "5.", Value::Float(5.0));
    infers!(float_no_integer, ".5", Value::Float(0.5));
    infers!(lone_point, ".", Value::from("."));
    infers!(two_points, "1.2.3", Value::from("1.2.3"));
    infers!(exponent, "1e5", Value::Float(100000.0));
    infers!(exponent_negative, "1e-7", Value::Float(0.0000001));
    infers!(exponent_fraction, "-1.5E+3", Value::Float(-1500.0));
    infers!(exponent_empty, "1e", Value::from("1e"));
    infers!(exponent_sign_only, "1e-", Value::from("1e-"));
    infers!(exponent_no_mantissa, "e5", Value::from("e5"));
    infers!(exponent_fraction_digits, "1e2.5", Value::from("1e2.5"));
    infers!(float_overflow, "1e999", Value::from("1e999"));
    infers!(padded, "  3", Value::from("  3"));
    infers!(sign_only, "-", Value::from("-"));
    infers!(empty, "", Value::from(""));
    infers!(nan, "NaN", Value::from("NaN"));
    infers!(inf, "inf", Value::from("inf"));
    infers!(text, "hi", Value::from("hi"));

    #[test]
    fn display_matches_writer_format() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("a,b").to_string(), "a,b");
    }

    #[test]
    fn written_floats_infer_back() {
        let raws = [
            "0.0000001",
            "123456789012345678901234.0",
            "-0.000000000123",
            "1.7976931348623157e308",
            "5e-324",
            "2.5",
        ];
        for raw in &raws {
            let value = infer_type(raw);
            assert!(value.as_f64().is_some(), "{}", raw);
            assert_eq!(infer_type(&value.to_string()), value, "{}", raw);
        }
        assert_eq!(Value::Float(0.0000001).to_string(), "1e-7");
    }

    #[test]
    fn into_string() {
        assert_eq!(Value::Float(3.0).into_string(), "3.0");
        assert_eq!(Value::from("x").into_string(), "x");
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(2.5).as_i64(), None);
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert!(Value::from("x").is_string());
        assert!(Value::from("x") == "x");
    }

    #[test]
    fn serializes_as_scalar() {
        let got = serde_json::to_string(&vec![
            Value::from("a"),
            Value::Bool(true),
            Value::Int(1),
            Value::Float(0.5),
        ])
        .unwrap();
        assert_eq!(got, r#"["a",true,1,0.5]"#);
    }
}
