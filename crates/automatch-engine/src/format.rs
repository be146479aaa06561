//! Formatting helpers for match-reason sentences.

use rust_decimal::Decimal;

/// Whole-dollar amount with thousands separators, e.g. `$12,500,000`.
#[must_use]
pub fn dollars(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Percentage with trailing zeros stripped, e.g. `32.5%`.
#[must_use]
pub fn percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_groups_thousands() {
        assert_eq!(dollars(Decimal::new(12_500_000, 0)), "$12,500,000");
        assert_eq!(dollars(Decimal::new(999, 0)), "$999");
        assert_eq!(dollars(Decimal::new(1_000, 0)), "$1,000");
        assert_eq!(dollars(Decimal::ZERO), "$0");
    }

    #[test]
    fn dollars_rounds_cents() {
        assert_eq!(dollars(Decimal::new(123_456_789, 2)), "$1,234,568");
    }

    #[test]
    fn percent_strips_zeros() {
        assert_eq!(percent(Decimal::new(3250, 2)), "32.5%");
        assert_eq!(percent(Decimal::new(30, 0)), "30%");
    }
}
