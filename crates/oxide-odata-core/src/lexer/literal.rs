//! Interpretation of literal token bodies into typed values.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{LiteralToken, LiteralType};
use crate::ast::{DateTimeValue, IsoDuration, Literal};
use crate::error::LexErrorKind;

impl LiteralToken {
    /// Interprets the token body as a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`LexErrorKind::MalformedLiteral`] if the body does not fit
    /// the declared type.
    pub fn value(&self) -> Result<Literal, LexErrorKind> {
        let text = self.text();
        let literal_type = self.literal_type();
        let malformed = |reason: &dyn ToString| LexErrorKind::MalformedLiteral {
            literal_type,
            text: text.to_owned(),
            reason: reason.to_string(),
        };

        match literal_type {
            LiteralType::Null => Ok(Literal::Null),
            LiteralType::String => Ok(Literal::String(text.to_owned())),
            LiteralType::Boolean => match text {
                "true" => Ok(Literal::Boolean(true)),
                "false" => Ok(Literal::Boolean(false)),
                _ => Err(malformed(&"expected true or false")),
            },
            LiteralType::Int => text.parse().map(Literal::Int).map_err(|e| malformed(&e)),
            LiteralType::Long => text.parse().map(Literal::Long).map_err(|e| malformed(&e)),
            LiteralType::Single => match special_float(text) {
                #[allow(clippy::cast_possible_truncation)]
                Some(v) => Ok(Literal::Single(v as f32)),
                None => match text.parse::<f32>() {
                    Ok(v) if v.is_finite() => Ok(Literal::Single(v)),
                    Ok(_) => Err(malformed(&"single out of range")),
                    Err(e) => Err(malformed(&e)),
                },
            },
            LiteralType::Double => match special_float(text) {
                Some(v) => Ok(Literal::Double(v)),
                None => match text.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Literal::Double(v)),
                    Ok(_) => Err(malformed(&"double out of range")),
                    Err(e) => Err(malformed(&e)),
                },
            },
            LiteralType::Decimal => parse_decimal(text)
                .map(Literal::Decimal)
                .ok_or_else(|| malformed(&"not a decimal number")),
            LiteralType::Binary => decode_binary(text)
                .map(Literal::Binary)
                .ok_or_else(|| malformed(&"expected hex or base64 data")),
            LiteralType::DateTime => DateTimeValue::parse(text)
                .map(Literal::DateTime)
                .ok_or_else(|| malformed(&"expected an ISO 8601 date or time")),
            LiteralType::Guid => Uuid::parse_str(text)
                .map(Literal::Guid)
                .map_err(|e| malformed(&e)),
            LiteralType::Duration => IsoDuration::from_str(text)
                .map(Literal::Duration)
                .map_err(|e| malformed(&e)),
        }
    }
}

fn special_float(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

/// Hex is tried first; `binary'...'` bodies that are not hex are read as
/// standard base64.
fn decode_binary(text: &str) -> Option<Vec<u8>> {
    hex::decode(text).ok().or_else(|| STANDARD.decode(text).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str, literal_type: LiteralType) -> Literal {
        LiteralToken::new(text, literal_type).value().unwrap()
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(value("42", LiteralType::Int), Literal::Int(42));
        assert_eq!(value("-7", LiteralType::Long), Literal::Long(-7));
        assert_eq!(value("2.5", LiteralType::Double), Literal::Double(2.5));
        assert_eq!(value("2.5", LiteralType::Single), Literal::Single(2.5));
        assert_eq!(
            value("1.25", LiteralType::Decimal),
            Literal::Decimal(Decimal::new(125, 2))
        );
        assert_eq!(
            value("1e2", LiteralType::Decimal),
            Literal::Decimal(Decimal::new(100, 0))
        );
    }

    #[test]
    fn test_special_floats() {
        assert!(matches!(
            LiteralToken::NAN.value(),
            Ok(Literal::Double(v)) if v.is_nan()
        ));
        assert_eq!(
            LiteralToken::NEGATIVE_INFINITY.value(),
            Ok(Literal::Double(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_binary_values() {
        assert_eq!(
            value("48454C4C4F", LiteralType::Binary),
            Literal::Binary(b"HELLO".to_vec())
        );
        assert_eq!(
            value("SGVsbG8=", LiteralType::Binary),
            Literal::Binary(b"Hello".to_vec())
        );
    }

    #[test]
    fn test_malformed_values() {
        let err = LiteralToken::new("12x", LiteralType::Int).value().unwrap_err();
        assert!(matches!(
            err,
            LexErrorKind::MalformedLiteral {
                literal_type: LiteralType::Int,
                ..
            }
        ));
        assert!(LiteralToken::new("not-a-guid", LiteralType::Guid)
            .value()
            .is_err());
        assert!(LiteralToken::new("P", LiteralType::Duration)
            .value()
            .is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(LiteralToken::TRUE.value(), Ok(Literal::Boolean(true)));
        assert_eq!(LiteralToken::NULL.value(), Ok(Literal::Null));
    }
}
