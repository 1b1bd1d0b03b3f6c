use std::fmt;

use serde::{Serialize, Serializer};

/// A YAML number.
///
/// Integers and floats are stored apart, but floats render in their shortest
/// `%g`-style form, so a whole float such as `1.0` renders, serializes to
/// canonical YAML, and compares exactly like the integer `1`.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for `i64`.
    UInt(u64),
    /// IEEE-754 double, including the YAML special values `.inf` and `.nan`.
    Float(f64),
}

impl Number {
    /// Converts a decoded YAML number, preferring the narrowest integer form.
    ///
    /// ```
    /// # use yamldiff_core::Number;
    /// let n = Number::from_yaml(&serde_yaml::Number::from(7));
    /// assert_eq!(n, Number::Int(7));
    /// ```
    #[must_use]
    pub fn from_yaml(number: &serde_yaml::Number) -> Self {
        if let Some(int) = number.as_i64() {
            Self::Int(int)
        } else if let Some(uint) = number.as_u64() {
            Self::UInt(uint)
        } else {
            Self::Float(number.as_f64().unwrap_or(f64::NAN))
        }
    }

    /// Converts back into the serde YAML representation.
    ///
    /// Floats whose shortest form is an integer are emitted as integers.
    ///
    /// ```
    /// # use yamldiff_core::Number;
    /// assert_eq!(Number::Float(3.0).to_yaml(), serde_yaml::Number::from(3));
    /// ```
    #[must_use]
    pub fn to_yaml(self) -> serde_yaml::Number {
        match self {
            Self::Int(v) => serde_yaml::Number::from(v),
            Self::UInt(v) => serde_yaml::Number::from(v),
            Self::Float(v) => {
                let text = self.to_string();
                match text.parse::<i64>() {
                    Ok(int) if text != "-0" => serde_yaml::Number::from(int),
                    _ => serde_yaml::Number::from(v),
                }
            }
        }
    }

    /// Returns `true` for any zero value.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(v) => v == 0,
            Self::UInt(v) => v == 0,
            Self::Float(v) => v == 0.0,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            // Bitwise so that `.nan` compares equal to itself.
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) if v.is_nan() => f.write_str(".nan"),
            Self::Float(v) if v.is_infinite() => {
                f.write_str(if v.is_sign_negative() { "-.inf" } else { ".inf" })
            }
            Self::Float(v) => f.write_str(&shortest_float(*v)),
        }
    }
}

/// Formats a finite float like Go's `strconv.FormatFloat(v, 'g', -1, 64)`:
/// shortest round-trip digits, exponent notation below `1e-4` or from `1e6`.
fn shortest_float(v: f64) -> String {
    // `{:e}` yields the shortest round-trip digits, e.g. `1.25e3` or `5e-1`.
    let scientific = format!("{:e}", v.abs());
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::new();
    if v.is_sign_negative() {
        out.push('-');
    }
    if !(-4..6).contains(&exp) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", exp.unsigned_abs()));
    } else if exp < 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat(exp.unsigned_abs() as usize - 1));
        out.push_str(&digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(&digits);
            out.push_str(&"0".repeat(int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
    out
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::Int(v) => serializer.serialize_i64(v),
            Self::UInt(v) => serializer.serialize_u64(v),
            Self::Float(v) => serializer.serialize_f64(v),
        }
    }
}
