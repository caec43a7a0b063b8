//! Price type with Indian-format display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Indian rupees.
///
/// The backend quotes every amount in INR, so the currency is implicit.
/// Display uses the Indian digit grouping (`₹12,34,567`), matching how
/// prices appear everywhere on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_inr(self.0))
    }
}

/// Format a decimal amount as rupees with Indian digit grouping.
///
/// The last three integer digits form one group, every group before that has
/// two digits: `1234567` formats as `₹12,34,567`. Trailing fractional zeros
/// are dropped.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_owned(), Some(f.to_owned())),
        None => (text, None),
    };

    let grouped = group_indian_digits(&int_part);
    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{sign}₹{grouped}.{frac}"),
        None => format!("{sign}₹{grouped}"),
    }
}

/// Format an amount in the compact crore/lakh notation used on listing
/// cards: `₹1.50 Cr`, `₹75.00 Lac`, or the full grouped figure below one
/// lakh.
#[must_use]
pub fn format_inr_compact(amount: Decimal) -> String {
    const CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);
    const LAKH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

    if amount >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.2} Lac", amount / LAKH)
    } else {
        format_inr(amount)
    }
}

/// Insert commas in Indian positions: after the leading group, every two
/// digits, then the final three.
fn group_indian_digits(digits: &str) -> String {
    let count = digits.chars().count();
    if count <= 3 {
        return digits.to_owned();
    }

    let mut out = String::with_capacity(count + count / 2);
    for (i, c) in digits.chars().enumerate() {
        out.push(c);
        let remaining = count - i - 1;
        let at_boundary = remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0);
        if at_boundary {
            out.push(',');
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_small_amounts_have_no_grouping() {
        assert_eq!(format_inr(dec("0")), "₹0");
        assert_eq!(format_inr(dec("999")), "₹999");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_inr(dec("1234")), "₹1,234");
        assert_eq!(format_inr(dec("12345")), "₹12,345");
    }

    #[test]
    fn test_lakh_grouping() {
        assert_eq!(format_inr(dec("123456")), "₹1,23,456");
        assert_eq!(format_inr(dec("1234567")), "₹12,34,567");
    }

    #[test]
    fn test_crore_grouping() {
        assert_eq!(format_inr(dec("12345678")), "₹1,23,45,678");
        assert_eq!(format_inr(dec("123456789")), "₹12,34,56,789");
    }

    #[test]
    fn test_fraction_kept_trailing_zeros_dropped() {
        assert_eq!(format_inr(dec("1234567.50")), "₹12,34,567.5");
        assert_eq!(format_inr(dec("4500000.00")), "₹45,00,000");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_inr(dec("-1234567")), "-₹12,34,567");
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(dec("7500000")).to_string(), "₹75,00,000");
    }

    #[test]
    fn test_compact_crore_and_lakh_notation() {
        assert_eq!(format_inr_compact(dec("15000000")), "₹1.50 Cr");
        assert_eq!(format_inr_compact(dec("7500000")), "₹75.00 Lac");
        assert_eq!(format_inr_compact(dec("99999")), "₹99,999");
    }

    #[test]
    fn test_price_serde_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("4500000.00").unwrap();
        let from_string: Price = serde_json::from_str("\"4500000.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), dec("4500000.00"));
    }
}
