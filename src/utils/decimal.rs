use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};

pub trait BigDecimalHelpers {
    /// Count of significant fractional digits (trailing zeros ignored).
    fn decimal_places(&self) -> i64;

    /// True when the value fits a `NUMERIC(max_digits, places)` column
    /// without rounding.
    fn fits_numeric(&self, max_digits: u32, places: u32) -> bool;

    /// Fixes the scale at `places` fractional digits.
    fn to_money_scale(&self, places: u32) -> BigDecimal;
}

impl BigDecimalHelpers for BigDecimal {
    fn decimal_places(&self) -> i64 {
        let (_, exponent) = self.normalized().as_bigint_and_exponent();
        exponent.max(0)
    }

    fn fits_numeric(&self, max_digits: u32, places: u32) -> bool {
        if self.decimal_places() > i64::from(places) {
            return false;
        }

        let integer_digits = max_digits.saturating_sub(places);
        let limit = BigDecimal::from(10u64.pow(integer_digits));
        self.abs() < limit
    }

    fn to_money_scale(&self, places: u32) -> BigDecimal {
        self.with_scale(i64::from(places))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts `"1234.56"` as well as a bare JSON number. Numbers are parsed from
/// their shortest textual form, so `1234.56` stays exactly `1234.56`.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match DecimalInput::deserialize(deserializer)? {
        DecimalInput::Text(text) => text,
        DecimalInput::Number(number) => number.to_string(),
    };

    BigDecimal::from_str(text.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn counts_significant_fraction_digits() {
        assert_eq!(dec("100000").decimal_places(), 0);
        assert_eq!(dec("100000.00").decimal_places(), 0);
        assert_eq!(dec("12.5").decimal_places(), 1);
        assert_eq!(dec("12.345").decimal_places(), 3);
    }

    #[test]
    fn price_column_bounds() {
        assert!(dec("99999999.99").fits_numeric(10, 2));
        assert!(dec("0.01").fits_numeric(10, 2));
        assert!(!dec("100000000").fits_numeric(10, 2));
        assert!(!dec("10.001").fits_numeric(10, 2));
    }

    #[test]
    fn area_column_bounds() {
        assert!(dec("9999.99").fits_numeric(6, 2));
        assert!(!dec("10000").fits_numeric(6, 2));
    }

    #[test]
    fn money_scale_keeps_value() {
        let scaled = dec("100000").to_money_scale(2);
        assert_eq!(scaled.to_string(), "100000.00");
        assert_eq!(scaled, dec("100000"));
    }

    #[derive(Debug, Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "deserialize_decimal")]
        price: BigDecimal,
    }

    fn price_of(body: &str) -> Result<BigDecimal, serde_json::Error> {
        serde_json::from_str::<Priced>(body).map(|p| p.price)
    }

    #[test]
    fn json_numbers_keep_their_written_digits() {
        let price = price_of(r#"{"price": 1234.56}"#).unwrap();
        assert_eq!(price, dec("1234.56"));
        assert!(price.fits_numeric(10, 2));

        assert_eq!(price_of(r#"{"price": 100000}"#).unwrap(), dec("100000"));
        assert_eq!(price_of(r#"{"price": "99.90"}"#).unwrap(), dec("99.9"));
    }

    #[test]
    fn non_numeric_decimals_are_rejected() {
        assert!(price_of(r#"{"price": "cheap"}"#).is_err());
        assert!(price_of(r#"{"price": true}"#).is_err());
    }
}
