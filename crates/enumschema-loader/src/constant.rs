//! Constant values and the arithmetic used to fold them.
//!
//! Integers are exact within 128 bits, which covers every value a 64-bit
//! typed constant can hold plus the headroom intermediate untyped
//! expressions need. Results that do not fit are reported as overflow.

use crate::token::Op;
use std::fmt;

/// Value of a checked constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Boolean constant
    Bool(bool),
    /// Integer or rune constant
    Int(i128),
    /// Floating-point constant
    Float(f64),
    /// String constant
    String(String),
}

impl ConstValue {
    /// Integer value, accepting floats with no fractional part.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn to_int(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(f) if f.is_finite() && f.trunc() == *f && f.abs() < 1.7e38 => {
                Some(*f as i128)
            }
            _ => None,
        }
    }

    /// Floating-point value of a numeric constant.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn to_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether this is an integer constant.
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Parses the text of an integer literal.
///
/// # Errors
///
/// Returns a message for invalid digits or values beyond 128 bits.
///
/// # Examples
///
/// ```
/// use enumschema_loader::constant::parse_int_literal;
///
/// assert_eq!(parse_int_literal("0x_FF").unwrap(), 255);
/// assert_eq!(parse_int_literal("017").unwrap(), 15);
/// assert_eq!(parse_int_literal("1_000").unwrap(), 1000);
/// assert!(parse_int_literal("09").is_err());
/// ```
pub fn parse_int_literal(text: &str) -> Result<i128, String> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();

    let (digits, radix, base_name) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16, "hexadecimal")
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2, "binary")
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8, "octal")
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8, "octal")
    } else {
        (lower.as_str(), 10, "decimal")
    };

    if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix)) {
        return Err(format!("invalid digit {bad:?} in {base_name} literal"));
    }
    if digits.is_empty() {
        return Err(format!("{base_name} literal has no digits"));
    }

    i128::from_str_radix(digits, radix).map_err(|_| format!("integer constant {text} overflows"))
}

/// Parses the text of a floating-point literal, hexadecimal forms included.
///
/// # Errors
///
/// Returns a message when the literal is malformed.
pub fn parse_float_literal(text: &str) -> Result<f64, String> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();

    let Some(hex) = lower.strip_prefix("0x") else {
        return clean
            .parse::<f64>()
            .map_err(|_| format!("malformed floating-point constant {text}"));
    };

    let (mantissa, exponent) = hex
        .split_once('p')
        .ok_or_else(|| format!("hexadecimal mantissa requires a 'p' exponent: {text}"))?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| format!("malformed exponent in {text}"))?;

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut value = 0.0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = c
            .to_digit(16)
            .ok_or_else(|| format!("invalid digit {c:?} in hexadecimal literal"))?;
        value = value.mul_add(16.0, f64::from(digit));
    }
    let frac_digits =
        i32::try_from(frac_part.len()).map_err(|_| format!("literal too long: {text}"))?;
    Ok(value * 2f64.powi(exponent - 4 * frac_digits))
}

/// Applies an arithmetic or bitwise operator to two integers.
///
/// # Errors
///
/// Returns a message on division by zero or when the exact result does not
/// fit in 128 bits.
pub fn int_binary(op: Op, lhs: i128, rhs: i128) -> Result<i128, String> {
    let overflow = || "constant overflow".to_string();
    match op {
        Op::Add => lhs.checked_add(rhs).ok_or_else(overflow),
        Op::Sub => lhs.checked_sub(rhs).ok_or_else(overflow),
        Op::Mul => lhs.checked_mul(rhs).ok_or_else(overflow),
        Op::Quo | Op::Rem if rhs == 0 => Err("division by zero".to_string()),
        Op::Quo => lhs.checked_div(rhs).ok_or_else(overflow),
        Op::Rem => lhs.checked_rem(rhs).ok_or_else(overflow),
        Op::And => Ok(lhs & rhs),
        Op::Or => Ok(lhs | rhs),
        Op::Xor => Ok(lhs ^ rhs),
        Op::AndNot => Ok(lhs & !rhs),
        Op::Shl => shift_left(lhs, rhs),
        Op::Shr => shift_right(lhs, rhs),
        _ => Err(format!("operator {op} not defined on integers")),
    }
}

/// Applies an arithmetic operator to two floats.
///
/// # Errors
///
/// Returns a message on division by zero or for operators floats lack.
pub fn float_binary(op: Op, lhs: f64, rhs: f64) -> Result<f64, String> {
    match op {
        Op::Add => Ok(lhs + rhs),
        Op::Sub => Ok(lhs - rhs),
        Op::Mul => Ok(lhs * rhs),
        Op::Quo if rhs == 0.0 => Err("division by zero".to_string()),
        Op::Quo => Ok(lhs / rhs),
        _ => Err(format!("operator {op} not defined on untyped float")),
    }
}

/// Evaluates a comparison operator.
#[must_use]
pub fn compare<T: PartialOrd>(op: Op, lhs: &T, rhs: &T) -> Option<bool> {
    Some(match op {
        Op::Eql => lhs == rhs,
        Op::Neq => lhs != rhs,
        Op::Lss => lhs < rhs,
        Op::Leq => lhs <= rhs,
        Op::Gtr => lhs > rhs,
        Op::Geq => lhs >= rhs,
        _ => return None,
    })
}

fn shift_count(count: i128) -> Result<u32, String> {
    if count < 0 {
        return Err(format!("invalid shift count {count} (negative)"));
    }
    u32::try_from(count).map_err(|_| format!("invalid shift count {count}"))
}

fn shift_left(lhs: i128, count: i128) -> Result<i128, String> {
    let count = shift_count(count)?;
    if lhs == 0 {
        return Ok(0);
    }
    if count >= 127 {
        return Err("constant shift overflow".to_string());
    }
    let shifted = lhs << count;
    if shifted >> count == lhs {
        Ok(shifted)
    } else {
        Err("constant shift overflow".to_string())
    }
}

fn shift_right(lhs: i128, count: i128) -> Result<i128, String> {
    let count = shift_count(count)?;
    Ok(lhs >> count.min(127))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefixes() {
        assert_eq!(parse_int_literal("42").unwrap(), 42);
        assert_eq!(parse_int_literal("0").unwrap(), 0);
        assert_eq!(parse_int_literal("0b1010").unwrap(), 10);
        assert_eq!(parse_int_literal("0o17").unwrap(), 15);
        assert_eq!(parse_int_literal("0XfF").unwrap(), 255);
        assert_eq!(
            parse_int_literal("0xFFFFFFFFFFFFFFFF").unwrap(),
            i128::from(u64::MAX)
        );
    }

    #[test]
    fn test_parse_int_errors() {
        assert!(parse_int_literal("0b102").unwrap_err().contains("binary"));
        assert!(
            parse_int_literal("0x1_0000_0000_0000_0000_0000_0000_0000_0000")
                .unwrap_err()
                .contains("overflows")
        );
    }

    #[test]
    fn test_parse_float_forms() {
        assert!((parse_float_literal("1.5").unwrap() - 1.5).abs() < f64::EPSILON);
        assert!((parse_float_literal("1e3").unwrap() - 1000.0).abs() < f64::EPSILON);
        assert!((parse_float_literal(".25").unwrap() - 0.25).abs() < f64::EPSILON);
        assert!((parse_float_literal("0x1p-2").unwrap() - 0.25).abs() < f64::EPSILON);
        assert!((parse_float_literal("0x1.8p1").unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_int_binary_ops() {
        assert_eq!(int_binary(Op::Add, 2, 3).unwrap(), 5);
        assert_eq!(int_binary(Op::Quo, -7, 2).unwrap(), -3);
        assert_eq!(int_binary(Op::Rem, -7, 2).unwrap(), -1);
        assert_eq!(int_binary(Op::AndNot, 0b1111, 0b0101).unwrap(), 0b1010);
        assert_eq!(int_binary(Op::Shl, 1, 63).unwrap(), 1i128 << 63);
        assert_eq!(int_binary(Op::Shr, -8, 1).unwrap(), -4);
    }

    #[test]
    fn test_int_binary_errors() {
        assert_eq!(int_binary(Op::Quo, 1, 0).unwrap_err(), "division by zero");
        assert!(int_binary(Op::Shl, 1, 200).is_err());
        assert!(int_binary(Op::Shl, 1, -1).unwrap_err().contains("negative"));
        assert!(int_binary(Op::Mul, i128::MAX, 2).is_err());
    }

    #[test]
    fn test_to_int_accepts_integral_floats() {
        assert_eq!(ConstValue::Float(3.0).to_int(), Some(3));
        assert_eq!(ConstValue::Float(3.5).to_int(), None);
        assert_eq!(ConstValue::String("x".into()).to_int(), None);
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(Op::Lss, &1, &2), Some(true));
        assert_eq!(compare(Op::Add, &1, &2), None);
    }
}
