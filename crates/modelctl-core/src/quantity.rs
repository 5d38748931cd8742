//! Kubernetes-style resource quantities (`"2"`, `"500m"`, `"1Gi"`, `"1e3"`).

use crate::errors::{ConfigResult, ErrorKind};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::sync::LazyLock;

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))([a-zA-Z]*|[eE][+-]?[0-9]+)$")
        .expect("quantity pattern is valid")
});

/// A parsed quantity. Keeps the text it was parsed from for display.
#[derive(Debug, Clone)]
pub struct Quantity {
    raw: String,
    value: f64,
}

fn suffix_multiplier(suffix: &str) -> Option<f64> {
    let m = match suffix {
        "" => 1.0,
        "n" => 1e-9,
        "u" => 1e-6,
        "m" => 1e-3,
        "k" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        "P" => 1e15,
        "E" => 1e18,
        "Ki" => 1024f64,
        "Mi" => 1024f64.powi(2),
        "Gi" => 1024f64.powi(3),
        "Ti" => 1024f64.powi(4),
        "Pi" => 1024f64.powi(5),
        "Ei" => 1024f64.powi(6),
        exp if exp.starts_with(['e', 'E']) => {
            let power: i32 = exp[1..].parse().ok()?;
            10f64.powi(power)
        }
        _ => return None,
    };
    Some(m)
}

impl Quantity {
    pub fn parse(s: &str) -> ConfigResult<Quantity> {
        let invalid = || ErrorKind::InvalidQuantity {
            quantity: s.to_string(),
        };

        let trimmed = s.trim();
        let caps = QUANTITY.captures(trimmed).ok_or_else(invalid)?;
        let number: f64 = caps[1].parse().map_err(|_| invalid())?;
        let multiplier = suffix_multiplier(&caps[2]).ok_or_else(invalid)?;

        let value = number * multiplier;
        if !value.is_finite() {
            return Err(invalid().into());
        }

        Ok(Quantity {
            raw: trimmed.to_string(),
            value,
        })
    }

    pub fn zero() -> Quantity {
        Quantity {
            raw: "0".to_string(),
            value: 0.0,
        }
    }

    /// Value in base units (cores, bytes).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value in thousandths of a base unit, rounded to the nearest.
    pub fn milli_value(&self) -> i64 {
        (self.value * 1000.0).round() as i64
    }

    pub fn is_integer(&self) -> bool {
        self.milli_value() % 1000 == 0
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for Quantity {
    type Err = crate::errors::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Constraints applied after a quantity string is parsed.
#[derive(Debug, Clone, Default)]
pub struct QuantityValidation {
    pub min: Option<Quantity>,
    pub int: bool,
}

impl QuantityValidation {
    pub fn check(&self, raw: &str) -> ConfigResult<Quantity> {
        let quantity = Quantity::parse(raw)?;

        if self.int && !quantity.is_integer() {
            return Err(ErrorKind::QuantityMustBeInt {
                quantity: raw.to_string(),
            }
            .into());
        }

        if let Some(min) = &self.min
            && quantity < *min
        {
            return Err(ErrorKind::MustBeGreaterThanOrEqualTo {
                bound: min.to_string(),
                got: quantity.to_string(),
            }
            .into());
        }

        Ok(quantity)
    }
}

/// Parser for optional quantity strings, for use with
/// [`Parsed`](crate::reader::fields::Parsed).
pub fn quantity_parser(
    validation: QuantityValidation,
) -> impl Fn(Option<String>) -> ConfigResult<Option<Quantity>> {
    move |raw| raw.map(|s| validation.check(&s)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_decimal_suffixes() {
        assert_eq!(Quantity::parse("2").unwrap().value(), 2.0);
        assert_eq!(Quantity::parse("500m").unwrap().milli_value(), 500);
        assert_eq!(Quantity::parse("1.5").unwrap().milli_value(), 1500);
        assert_eq!(Quantity::parse("2k").unwrap().value(), 2000.0);
        assert_eq!(Quantity::parse("0.5").unwrap().milli_value(), 500);
    }

    #[test]
    fn test_parse_binary_suffixes_and_exponents() {
        assert_eq!(Quantity::parse("1Ki").unwrap().value(), 1024.0);
        assert_eq!(
            Quantity::parse("1Gi").unwrap().value(),
            1024.0 * 1024.0 * 1024.0
        );
        assert_eq!(Quantity::parse("1e3").unwrap().value(), 1000.0);
        assert_eq!(Quantity::parse("1E").unwrap().value(), 1e18);
    }

    #[test]
    fn test_parse_rejects_out_of_range_exponents() {
        for s in ["0e400", "1e400", "-1e400"] {
            let err = Quantity::parse(s).unwrap_err();
            assert_eq!(
                err.kind(),
                &ErrorKind::InvalidQuantity {
                    quantity: s.to_string()
                }
            );
        }
        assert_eq!(Quantity::parse("1e-400").unwrap().value(), 0.0);
    }

    #[test]
    fn test_parse_invalid() {
        for s in ["", "abc", "1Xi", "1.2.3", "Gi", "1 Gi"] {
            let err = Quantity::parse(s).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::InvalidQuantity { .. }),
                "expected invalid quantity for {:?}",
                s
            );
        }
    }

    #[test]
    fn test_comparison() {
        assert!(Quantity::parse("500m").unwrap() < Quantity::parse("1").unwrap());
        assert!(Quantity::parse("1Gi").unwrap() > Quantity::parse("1G").unwrap());
        assert_eq!(Quantity::parse("1000m").unwrap(), Quantity::parse("1").unwrap());
    }

    #[test]
    fn test_validation_min() {
        let v = QuantityValidation {
            min: Some(Quantity::zero()),
            int: false,
        };
        assert!(v.check("0").is_ok());
        let err = v.check("-1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "must be greater than or equal to 0 (got -1)"
        );
    }

    #[test]
    fn test_validation_int() {
        let v = QuantityValidation {
            min: None,
            int: true,
        };
        assert!(v.check("2").is_ok());
        let err = v.check("500m").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::QuantityMustBeInt { quantity } if quantity == "500m"));
    }

    #[test]
    fn test_quantity_parser() {
        let parse = quantity_parser(QuantityValidation::default());
        assert_eq!(parse(None).unwrap(), None);
        assert_eq!(
            parse(Some("250m".to_string())).unwrap().unwrap().as_str(),
            "250m"
        );
        assert!(parse(Some("lots".to_string())).is_err());
    }

    #[test]
    fn test_serialize_as_raw_string() {
        let q = Quantity::parse("1Gi").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"1Gi\"");
    }
}
